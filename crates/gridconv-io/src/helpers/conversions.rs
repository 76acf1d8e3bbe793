//! Checked numeric conversions for values read from case files.
//!
//! Bus numbers, counts and status codes arrive as floats (MATPOWER blocks,
//! CSV cells, JSON numbers). A bare `as` cast would silently saturate NaN or
//! negative values, so every such read goes through these helpers.

use anyhow::{anyhow, Result};

/// Convert f64 to usize, rejecting NaN, infinities, negatives, fractions
/// and overflow.
///
/// ```
/// use gridconv_io::helpers::safe_f64_to_usize;
///
/// assert_eq!(safe_f64_to_usize(14.0).unwrap(), 14);
/// assert!(safe_f64_to_usize(2.7).is_err());
/// assert!(safe_f64_to_usize(-1.0).is_err());
/// assert!(safe_f64_to_usize(f64::NAN).is_err());
/// ```
pub fn safe_f64_to_usize(value: f64) -> Result<usize> {
    if !value.is_finite() {
        return Err(anyhow!("expected a finite index, got {}", value));
    }
    if value < 0.0 {
        return Err(anyhow!("expected a non-negative index, got {}", value));
    }
    if value.fract() != 0.0 {
        return Err(anyhow!("expected a whole index, got {}", value));
    }
    if value > usize::MAX as f64 {
        return Err(anyhow!("index {} exceeds {}", value, usize::MAX));
    }
    Ok(value as usize)
}

/// Convert u64 to usize; only fails on 32-bit targets.
pub fn safe_u64_to_usize(value: u64) -> Result<usize> {
    usize::try_from(value).map_err(|_| anyhow!("index {} exceeds {}", value, usize::MAX))
}
