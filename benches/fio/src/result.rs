//! Tolerant model of a fio `--output-format=json` document.
//!
//! Only the fields the summary needs are modeled and every one of them is
//! optional; anything else in the document is ignored.

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
pub struct FioResult {
    pub jobs: Option<Vec<Option<Job>>>,
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
pub struct Job {
    pub jobname: Option<String>,
    pub read: Option<Stats>,
    pub write: Option<Stats>,
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
pub struct Stats {
    pub io_bytes: Option<f64>,
    pub bw_bytes: Option<f64>,
    pub iops: Option<f64>,
    pub clat: Option<LatencyStats>,
    pub lat: Option<LatencyStats>,
    pub lat_ns: Option<MeanStats>,
    pub lat_us: Option<MeanStats>,
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct LatencyStats {
    pub mean: Option<f64>,
    pub percentile: Option<Vec<PercentileEntry>>,
    /// Number of keys in the source object, modeled or not
    pub keys: usize,
}

/// One `{percentile, value}` pair, anything non-numeric reads as absent
#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct PercentileEntry {
    pub percentile: Option<f64>,
    pub value: Option<f64>,
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
pub struct MeanStats {
    pub mean: Option<f64>,
}

impl FioResult {
    /// The first job entry, `None` if the job list is missing, empty or starts with `null`
    pub fn first_job(&self) -> Option<&Job> {
        self.jobs.as_ref()?.first()?.as_ref()
    }
}

impl Stats {
    pub fn has_io(&self) -> bool {
        self.io_bytes.is_some_and(|x| x > 0.0)
    }
}

impl LatencyStats {
    /// True for `{}`, a block carrying no keys at all
    pub fn is_empty(&self) -> bool {
        self.keys == 0
    }
}

impl TryFrom<Map<String, Value>> for LatencyStats {
    type Error = serde_json::Error;

    fn try_from(mut map: Map<String, Value>) -> Result<Self, Self::Error> {
        let keys = map.len();
        let mean = map
            .remove("mean")
            .map(serde_json::from_value::<Option<f64>>)
            .transpose()?
            .flatten();
        let percentile = map
            .remove("percentile")
            .map(serde_json::from_value::<Option<Vec<PercentileEntry>>>)
            .transpose()?
            .flatten();
        Ok(Self {
            mean,
            percentile,
            keys,
        })
    }
}

impl From<Value> for PercentileEntry {
    fn from(entry: Value) -> Self {
        Self {
            percentile: entry.get("percentile").and_then(Value::as_f64),
            value: entry.get("value").and_then(Value::as_f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_unknown_fields() {
        let doc: FioResult = serde_json::from_str(
            r#"{"fio version": "fio-3.36", "jobs": [{"jobname": "a", "groupid": 0,
                "read": {"io_bytes": 10, "runtime": 5, "clat_ns": {"mean": 1.0}}}]}"#,
        )
        .unwrap();
        let job = doc.first_job().unwrap();
        assert_eq!(job.jobname.as_deref(), Some("a"));
        assert_eq!(job.read.as_ref().unwrap().io_bytes, Some(10.0));
        assert!(job.write.is_none());
    }

    #[test]
    fn first_job_handles_missing_empty_and_null() {
        for text in [r#"{}"#, r#"{"jobs": []}"#, r#"{"jobs": [null]}"#, r#"{"jobs": null}"#] {
            let doc: FioResult = serde_json::from_str(text).unwrap();
            assert!(doc.first_job().is_none(), "{text}");
        }
    }

    #[test]
    fn latency_block_emptiness() {
        let empty: LatencyStats = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
        let unknown_only: LatencyStats = serde_json::from_str(r#"{"min": 3}"#).unwrap();
        assert!(!unknown_only.is_empty());
        assert_eq!(unknown_only.mean, None);
        let null_mean: LatencyStats = serde_json::from_str(r#"{"mean": null}"#).unwrap();
        assert!(!null_mean.is_empty());
    }

    #[test]
    fn mistyped_latency_fields_are_malformed() {
        assert!(serde_json::from_str::<LatencyStats>(r#"{"mean": "fast"}"#).is_err());
        assert!(serde_json::from_str::<LatencyStats>(r#"{"percentile": 99}"#).is_err());
    }

    #[test]
    fn odd_percentile_entries_read_as_absent() {
        let block: LatencyStats = serde_json::from_str(
            r#"{"percentile": [{"percentile": "p50", "value": 1}, 7, null,
                {"percentile": 95.0, "value": "x"}, {"percentile": 99, "value": 3}]}"#,
        )
        .unwrap();
        let entries = block.percentile.unwrap();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0], PercentileEntry { percentile: None, value: Some(1.0) });
        assert_eq!(entries[1], PercentileEntry::default());
        assert_eq!(entries[2], PercentileEntry::default());
        assert_eq!(entries[3], PercentileEntry { percentile: Some(95.0), value: None });
        assert_eq!(entries[4], PercentileEntry { percentile: Some(99.0), value: Some(3.0) });
    }
}
