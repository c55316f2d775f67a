//! Defines the activity log store trait.

use crate::{
    Error,
    models::{ActivityKind, ActivityRecord, NewActivity},
};

/// Appends to and reads from the activity log.
pub trait ActivityStore {
    /// Append an entry to the log.
    fn append(&self, activity: NewActivity) -> Result<ActivityRecord, Error>;

    /// Get every entry, newest first.
    fn get_all(&self) -> Result<Vec<ActivityRecord>, Error>;

    /// Get the entries recorded for `username`, newest first.
    fn get_by_username(&self, username: &str) -> Result<Vec<ActivityRecord>, Error>;

    /// Get the entries of one kind, newest first.
    fn get_by_kind(&self, kind: ActivityKind) -> Result<Vec<ActivityRecord>, Error>;
}
