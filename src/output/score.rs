//! SEO score calculation
//!
//! A pure function of aggregated metrics. The score starts at 100 and each
//! structural problem subtracts a capped penalty; ratios are relative to the
//! number of visited pages.

use serde::Serialize;
use std::fmt;

/// Metric values the score is computed from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreInputs {
    pub total_pages: usize,
    pub orphan_pages: usize,
    pub broken_links: usize,
    pub redirect_links: usize,
    /// Outgoing link count of every page
    pub outgoing_counts: Vec<usize>,
    /// Incoming link count of every page
    pub incoming_counts: Vec<usize>,
    pub max_depth_seen: u32,
    pub average_load_time_ms: f64,
}

/// Individual penalty values, each already capped
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Penalties {
    pub orphan: f64,
    pub broken: f64,
    pub redirect: f64,
    pub link_balance: f64,
    pub depth: f64,
    pub performance: f64,
    pub incoming: f64,
}

impl Penalties {
    pub fn total(&self) -> f64 {
        self.orphan
            + self.broken
            + self.redirect
            + self.link_balance
            + self.depth
            + self.performance
            + self.incoming
    }
}

/// Human-readable score band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ScoreCategory {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl ScoreCategory {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Self::Excellent,
            80..=89 => Self::Good,
            70..=79 => Self::Fair,
            60..=69 => Self::Poor,
            _ => Self::Critical,
        }
    }
}

impl fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Final score with its breakdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoScore {
    pub score: u8,
    pub category: ScoreCategory,
    pub penalties: Penalties,
}

fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

fn mean(values: &[usize]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<usize>() as f64 / values.len() as f64)
    }
}

/// Computes the penalties for the given metrics
pub fn calculate_penalties(inputs: &ScoreInputs) -> Penalties {
    let total = inputs.total_pages;

    let orphan = (ratio(inputs.orphan_pages, total) * 100.0).min(25.0);
    let broken = (ratio(inputs.broken_links, total) * 50.0).min(20.0);
    let redirect = (ratio(inputs.redirect_links, total) * 30.0).min(15.0);

    let link_balance = match mean(&inputs.outgoing_counts) {
        Some(avg_outgoing) => {
            let unbalanced = inputs
                .outgoing_counts
                .iter()
                .filter(|&&count| count as f64 > 3.0 * avg_outgoing || count == 0)
                .count();
            (ratio(unbalanced, total) * 30.0).min(15.0)
        }
        None => 0.0,
    };

    let depth = if inputs.max_depth_seen > 4 {
        (f64::from(inputs.max_depth_seen - 4) * 3.0).min(10.0)
    } else {
        0.0
    };

    let performance = if inputs.average_load_time_ms > 3000.0 {
        ((inputs.average_load_time_ms - 3000.0) / 100.0).min(10.0)
    } else {
        0.0
    };

    let incoming = match mean(&inputs.incoming_counts) {
        Some(avg_incoming) if avg_incoming < 2.0 => ((2.0 - avg_incoming) * 2.0).min(5.0),
        _ => 0.0,
    };

    Penalties {
        orphan,
        broken,
        redirect,
        link_balance,
        depth,
        performance,
        incoming,
    }
}

/// Computes the 0-100 score and its category
///
/// # Example
///
/// ```
/// use linkscope::output::{calculate_score, ScoreCategory, ScoreInputs};
///
/// let inputs = ScoreInputs {
///     total_pages: 4,
///     outgoing_counts: vec![3, 3, 3, 3],
///     incoming_counts: vec![3, 3, 3, 3],
///     ..ScoreInputs::default()
/// };
/// let result = calculate_score(&inputs);
/// assert_eq!(result.score, 100);
/// assert_eq!(result.category, ScoreCategory::Excellent);
/// ```
pub fn calculate_score(inputs: &ScoreInputs) -> SeoScore {
    let penalties = calculate_penalties(inputs);
    let raw = (100.0 - penalties.total()).round();
    let score = if raw.is_nan() {
        0
    } else {
        raw.clamp(0.0, 100.0) as u8
    };

    SeoScore {
        score,
        category: ScoreCategory::from_score(score),
        penalties,
    }
}
