pub mod conversions;

pub use conversions::{safe_f64_to_usize, safe_u64_to_usize};
