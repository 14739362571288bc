//! Lookup maps built fresh for each derivation

use std::collections::HashMap;

use reel_core::{Campaign, Metrics, RecordId, User};

/// Id-keyed views over one set of snapshots
pub struct Lookups<'a> {
    campaigns: HashMap<&'a RecordId, &'a Campaign>,
    users: HashMap<&'a RecordId, &'a User>,
    metrics: HashMap<&'a RecordId, &'a Metrics>,
}

impl<'a> Lookups<'a> {
    pub fn build(campaigns: &'a [Campaign], users: &'a [User], metrics: &'a [Metrics]) -> Self {
        let mut by_submission: HashMap<&'a RecordId, &'a Metrics> = HashMap::new();
        for record in metrics {
            by_submission
                .entry(&record.submission_id)
                .and_modify(|current| {
                    if record.is_newer_than(current) {
                        *current = record;
                    }
                })
                .or_insert(record);
        }

        Self {
            campaigns: campaigns.iter().map(|c| (&c.id, c)).collect(),
            users: users.iter().map(|u| (&u.id, u)).collect(),
            metrics: by_submission,
        }
    }

    #[inline]
    pub fn campaign(&self, id: &RecordId) -> Option<&'a Campaign> {
        self.campaigns.get(id).copied()
    }

    #[inline]
    pub fn user(&self, id: &RecordId) -> Option<&'a User> {
        self.users.get(id).copied()
    }

    /// Newest metrics record naming the submission
    #[inline]
    pub fn metrics(&self, submission_id: &RecordId) -> Option<&'a Metrics> {
        self.metrics.get(submission_id).copied()
    }
}
