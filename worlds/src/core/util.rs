use ahash::RandomState;
use std::collections::HashMap as StdHashMap;

use super::error::{Result, WorldsError};

pub type HashMap<K, V> = StdHashMap<K, V, RandomState>;

/// Rejects NaN, infinities, zero and negative values with a descriptive
/// [`WorldsError::InvalidLayoutParameter`].
pub fn ensure_finite_positive(name: &'static str, value: f32) -> Result<f32> {
    if !value.is_finite() {
        return Err(WorldsError::invalid(
            name,
            format!("must be finite, got {}", value),
        ));
    }
    if value <= 0.0 {
        return Err(WorldsError::invalid(
            name,
            format!("must be greater than zero, got {}", value),
        ));
    }
    Ok(value)
}
