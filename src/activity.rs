//! Records who did what to the ledger.

use time::OffsetDateTime;

use crate::{
    models::{ActivityKind, NewActivity},
    stores::ActivityStore,
};

/// Appends entries to the activity log.
///
/// Recording is best effort: a failure to write an entry is logged and then
/// dropped, so it never undoes or fails the action being recorded.
#[derive(Debug, Clone)]
pub struct ActivityLog<H>
where
    H: ActivityStore,
{
    store: H,
}

impl<H> ActivityLog<H>
where
    H: ActivityStore,
{
    /// Create an activity log that writes to `store`.
    pub fn new(store: H) -> Self {
        Self { store }
    }

    /// The store the log writes to.
    pub fn store(&self) -> &H {
        &self.store
    }

    /// Record that `username` performed an action of `kind`, stamped with the
    /// current UTC time.
    pub fn record(&self, username: &str, kind: ActivityKind, description: impl Into<String>) {
        let activity = NewActivity {
            username: username.to_owned(),
            kind,
            recorded_at: OffsetDateTime::now_utc(),
            description: description.into(),
        };

        if let Err(error) = self.store.append(activity) {
            tracing::warn!("could not record {kind} activity for {username}: {error}");
        }
    }
}

#[cfg(test)]
mod activity_log_tests {
    use std::cell::Cell;

    use crate::{
        Error,
        models::{ActivityKind, ActivityRecord, NewActivity},
        stores::ActivityStore,
    };

    use super::ActivityLog;

    /// Counts append attempts and fails every one of them.
    #[derive(Default)]
    struct FailingStore {
        attempts: Cell<usize>,
        last_description: Cell<Option<String>>,
    }

    impl ActivityStore for FailingStore {
        fn append(&self, activity: NewActivity) -> Result<ActivityRecord, Error> {
            self.attempts.set(self.attempts.get() + 1);
            self.last_description.set(Some(activity.description));

            Err(Error::DatabaseLockError)
        }

        fn get_all(&self) -> Result<Vec<ActivityRecord>, Error> {
            Ok(vec![])
        }

        fn get_by_username(&self, _username: &str) -> Result<Vec<ActivityRecord>, Error> {
            Ok(vec![])
        }

        fn get_by_kind(&self, _kind: ActivityKind) -> Result<Vec<ActivityRecord>, Error> {
            Ok(vec![])
        }
    }

    #[test]
    fn record_swallows_store_errors() {
        let log = ActivityLog::new(FailingStore::default());

        log.record("an", ActivityKind::Create, "Created transaction ID: 1");
        log.record("an", ActivityKind::Delete, "Deleted transaction ID: 1");

        assert_eq!(log.store().attempts.get(), 2);
        assert_eq!(
            log.store().last_description.take().as_deref(),
            Some("Deleted transaction ID: 1")
        );
    }
}
