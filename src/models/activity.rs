//! Entries in the activity (audit) log.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Error;

/// Database identifier for an activity record.
pub type ActivityId = i64;

/// What kind of action was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityKind {
    /// A record was created.
    Create,
    /// A record was edited.
    Update,
    /// A record was deleted.
    Delete,
    /// A user logged in.
    Login,
}

impl ActivityKind {
    /// The code stored in the database.
    pub fn code(&self) -> &'static str {
        match self {
            ActivityKind::Create => "CREATE",
            ActivityKind::Update => "UPDATE",
            ActivityKind::Delete => "DELETE",
            ActivityKind::Login => "LOGIN",
        }
    }
}

impl FromStr for ActivityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CREATE" => Ok(ActivityKind::Create),
            "UPDATE" => Ok(ActivityKind::Update),
            "DELETE" => Ok(ActivityKind::Delete),
            "LOGIN" => Ok(ActivityKind::Login),
            _ => Err(Error::InvalidKind(s.to_owned())),
        }
    }
}

impl Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A stored activity log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// The ID assigned by the store.
    pub id: ActivityId,
    /// Who performed the action.
    pub username: String,
    /// What kind of action it was.
    pub kind: ActivityKind,
    /// When the action was recorded, in UTC.
    pub recorded_at: OffsetDateTime,
    /// A human readable summary, e.g. "Deleted transaction ID: 3".
    pub description: String,
}

/// An activity log entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    /// Who performed the action.
    pub username: String,
    /// What kind of action it was.
    pub kind: ActivityKind,
    /// When the action happened.
    pub recorded_at: OffsetDateTime,
    /// A human readable summary.
    pub description: String,
}
