use common::util::parse_data_size;
use fio::MetricRecord;
use itertools::Itertools;
use regex::Regex;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint<'a> {
    /// The swept parameter, KiB for block size sweeps and depth for queue depth sweeps
    pub key: u64,
    pub record: &'a MetricRecord,
}

/// Records whose filename carries a block size token, keyed by size in KiB
pub fn block_size_sweep<'a>(records: &'a [MetricRecord], pattern: &Regex) -> Vec<SweepPoint<'a>> {
    sweep(records, pattern, |token| {
        parse_data_size(token).map(|bytes| bytes / 1024).ok()
    })
}

/// Records whose filename carries a queue depth token, keyed by depth
pub fn queue_depth_sweep<'a>(records: &'a [MetricRecord], pattern: &Regex) -> Vec<SweepPoint<'a>> {
    sweep(records, pattern, |token| token.parse::<u64>().ok())
}

fn sweep<'a, F>(records: &'a [MetricRecord], pattern: &Regex, parse: F) -> Vec<SweepPoint<'a>>
where
    F: Fn(&str) -> Option<u64>,
{
    records
        .iter()
        .filter_map(|record| {
            let token = pattern.captures(&record.file)?.get(1)?.as_str();
            match parse(token) {
                Some(key) => Some(SweepPoint { key, record }),
                None => {
                    debug!("Ignoring {}, cannot parse sweep value {token}", record.file);
                    None
                }
            }
        })
        .sorted_by(|a, b| {
            a.key
                .cmp(&b.key)
                .then_with(|| a.record.file.cmp(&b.record.file))
        })
        .collect()
}
