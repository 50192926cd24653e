pub mod config;
pub mod plot;
pub mod util;

pub const BYTES_PER_MIB: f64 = 1_048_576.0;
