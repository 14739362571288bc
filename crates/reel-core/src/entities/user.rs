//! User entity - directory entry for any actor

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::RecordId;

/// Role a user acts in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Restaurant,
    Influencer,
    Admin,
}

impl UserRole {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "restaurant" => Some(Self::Restaurant),
            "influencer" => Some(Self::Influencer),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Influencer => "influencer",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: RecordId,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub role: Option<UserRole>,
}

impl User {
    pub fn new(id: RecordId, role: UserRole) -> Self {
        Self {
            id,
            email: None,
            display_name: None,
            username: None,
            role: Some(role),
        }
    }

    /// Best available label: display name, username, email, then raw id
    pub fn label(&self) -> String {
        self.display_name
            .as_deref()
            .or(self.username.as_deref())
            .or(self.email.as_deref())
            .map_or_else(|| self.id.to_string(), str::to_string)
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Some(UserRole::Admin)
    }
}
