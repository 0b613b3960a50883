use crate::models::RankedUnit;

pub const DEFAULT_SCOPE: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreSummary {
    pub mean: f64,
    pub std_dev: f64,
}

impl ScoreSummary {
    pub fn of(scores: &[f64]) -> Self {
        if scores.is_empty() {
            return Self {
                mean: 0.0,
                std_dev: 0.0,
            };
        }

        let count = scores.len() as f64;
        let mean = scores.iter().sum::<f64>() / count;
        let variance = scores
            .iter()
            .map(|score| (score - mean).powi(2))
            .sum::<f64>()
            / count;

        Self {
            mean,
            std_dev: variance.sqrt(),
        }
    }

    pub fn threshold(&self, scope: f64) -> f64 {
        self.mean + scope * self.std_dev
    }
}

/// Keeps entries scoring strictly above `mean + scope * stddev`, in input order.
pub fn filter_outliers(ranked: &[RankedUnit], scope: f64) -> Vec<RankedUnit> {
    let scores: Vec<f64> = ranked.iter().map(|item| item.score).collect();
    let threshold = ScoreSummary::of(&scores).threshold(scope);

    ranked
        .iter()
        .filter(|item| item.score > threshold)
        .cloned()
        .collect()
}
