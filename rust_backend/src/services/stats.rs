use serde::Serialize;

use crate::core::domain::Separations;

/// Summary statistics over every gap in a set of separations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeparationStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl SeparationStats {
    /// Statistics over the union of the gap-before and gap-after columns.
    pub fn from_separations(separations: &Separations) -> Self {
        let values: Vec<f64> = separations.all_gaps().collect();
        compute_stats(&values)
    }
}

/// Compute statistics for a set of values.
/// Calculates mean, median, std dev, min and max; all zero for empty input.
pub fn compute_stats(values: &[f64]) -> SeparationStats {
    if values.is_empty() {
        return SeparationStats {
            count: 0,
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
            min: 0.0,
            max: 0.0,
        };
    }

    let count = values.len();
    let sum: f64 = values.iter().sum();
    let mean = sum / count as f64;

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let median = if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    };

    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / count as f64;

    SeparationStats {
        count,
        mean,
        median,
        std_dev: variance.sqrt(),
        min: sorted[0],
        max: sorted[count - 1],
    }
}
