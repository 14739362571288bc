//! Collections held by the record store

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four record collections the dashboards read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Campaigns,
    Submissions,
    Metrics,
    Users,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Campaigns,
        Collection::Submissions,
        Collection::Metrics,
        Collection::Users,
    ];

    /// Collection name as used by the store
    pub fn name(&self) -> &'static str {
        match self {
            Self::Campaigns => "campaigns",
            Self::Submissions => "submissions",
            Self::Metrics => "metrics",
            Self::Users => "users",
        }
    }

    /// Look up a collection by its store name
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
