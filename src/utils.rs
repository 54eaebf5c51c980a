//! Utility functions for the Castle Escape crate

/// Index of the largest value, ties broken toward the lowest index.
///
/// Returns 0 for an empty slice.
///
/// # Examples
///
/// ```
/// use castle_escape::utils::argmax;
///
/// assert_eq!(argmax(&[0.0, 2.0, 2.0, 1.0]), 1);
/// assert_eq!(argmax(&[0.0; 6]), 0);
/// ```
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = i;
        }
    }
    best
}

/// Largest value in the slice (negative infinity for an empty slice).
pub fn max_value(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Geometric epsilon decay clamped to a floor.
///
/// # Examples
///
/// ```
/// use castle_escape::utils::decayed_epsilon;
///
/// assert_eq!(decayed_epsilon(0.02, 0.1, 0.01), 0.01);
/// assert!((decayed_epsilon(1.0, 0.995, 0.01) - 0.995).abs() < 1e-12);
/// ```
pub fn decayed_epsilon(epsilon: f64, decay: f64, floor: f64) -> f64 {
    (epsilon * decay).max(floor)
}
