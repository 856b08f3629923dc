//! Integer percentage helpers shared by every metric

/// `round(numerator / denominator * 100)`; 0 when the denominator is 0
pub fn percent(numerator: usize, denominator: usize) -> u8 {
    if denominator == 0 {
        return 0;
    }
    ratio_to_percent(numerator as f64 / denominator as f64)
}

/// Convert a 0.0-1.0 ratio to a rounded, clamped percentage
pub fn ratio_to_percent(ratio: f64) -> u8 {
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Rounded mean of percentages; `None` for an empty slice
pub fn mean_percent(values: &[u8]) -> Option<u8> {
    if values.is_empty() {
        return None;
    }
    let sum: u32 = values.iter().map(|&v| u32::from(v)).sum();
    Some((f64::from(sum) / values.len() as f64).round() as u8)
}
