//! Fallback chains for counts and earnings

use rust_decimal::Decimal;
use serde::Serialize;

use super::{compute_earnings, engagement_rate};
use crate::entities::{Metrics, Submission};

/// Tier that produced a resolved value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Stored value that overrides computation
    Override,
    /// Satellite metrics record
    Metrics,
    /// The submission's own field
    Submission,
    /// Derived from the formula
    Computed,
    /// Nothing available
    Default,
}

/// A value together with the tier it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolved<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: Source) -> Self {
        Self { value, source }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedCounts {
    pub views: Resolved<u64>,
    pub likes: Resolved<u64>,
}

fn resolve_count(from_metrics: Option<u64>, from_submission: Option<u64>) -> Resolved<u64> {
    match (from_metrics, from_submission) {
        (Some(v), _) => Resolved::new(v, Source::Metrics),
        (None, Some(v)) => Resolved::new(v, Source::Submission),
        (None, None) => Resolved::new(0, Source::Default),
    }
}

/// Views and likes, each field falling back independently
pub fn resolve_views_and_likes(submission: &Submission, metrics: Option<&Metrics>) -> ResolvedCounts {
    ResolvedCounts {
        views: resolve_count(metrics.and_then(|m| m.views), submission.views),
        likes: resolve_count(metrics.and_then(|m| m.likes), submission.likes),
    }
}

/// Stored earnings when present, otherwise `computed`
pub fn resolve_earnings(submission: &Submission, computed: Decimal) -> Resolved<Decimal> {
    match submission.earnings {
        Some(stored) => Resolved::new(stored, Source::Override),
        None => Resolved::new(computed, Source::Computed),
    }
}

/// Every derived number for one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub views: Resolved<u64>,
    pub likes: Resolved<u64>,
    pub earnings: Resolved<Decimal>,
    pub engagement_rate: Decimal,
}

/// Apply the full precedence chain for a submission at `reward_rate`
pub fn resolve(
    submission: &Submission,
    metrics: Option<&Metrics>,
    reward_rate: Decimal,
) -> Resolution {
    let ResolvedCounts { views, likes } = resolve_views_and_likes(submission, metrics);
    let earnings = resolve_earnings(submission, compute_earnings(views.value, reward_rate));

    Resolution {
        views,
        likes,
        earnings,
        engagement_rate: engagement_rate(views.value, likes.value),
    }
}
