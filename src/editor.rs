//! Record-level edit protocol.
//!
//! A record is either displayed or being edited. `begin` snapshots the six
//! editable attributes into a mutable draft; `commit` writes the draft back
//! over the record unconditionally and ends the session. Sessions are
//! independent per record, so several may be open at once. There is no
//! cancel operation: dropping an uncommitted session leaves the store
//! untouched, and the original design had no cancel path either.

use crate::store::Store;
use crate::task::TaskDraft;

/// An open edit on one record, identified by its list position.
#[derive(Debug, Clone)]
pub struct EditSession {
    index: usize,
    pub draft: TaskDraft,
}

impl EditSession {
    /// Transition the record at `index` from display to editing, with the
    /// draft pre-populated from its current values. None when the position
    /// does not exist.
    pub fn begin(store: &Store, index: usize) -> Option<Self> {
        let task = store.get(index)?;
        Some(EditSession {
            index,
            draft: TaskDraft::from_task(task),
        })
    }

    /// The position this session edits.
    pub fn index(&self) -> usize {
        self.index
    }

    /// End the session, overwriting all six fields of the record with the
    /// draft. Deliberately unvalidated: an edit may blank the title, unlike
    /// creation. The completion flag is untouched. Returns false when the
    /// record no longer exists.
    pub fn commit(self, store: &mut Store) -> bool {
        store.apply_edit(self.index, self.draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Category, Priority};
    use chrono::{NaiveDate, NaiveTime};

    fn store_with_one_task() -> Store {
        let mut store = Store::default();
        store
            .add(TaskDraft {
                title: "Original".into(),
                description: "before".into(),
                priority: Priority::Low,
                due_date: None,
                due_time: None,
                category: Category::Work,
            })
            .unwrap();
        store
    }

    #[test]
    fn begin_snapshots_current_values() {
        let store = store_with_one_task();
        let session = EditSession::begin(&store, 0).unwrap();
        assert_eq!(session.draft.title, "Original");
        assert_eq!(session.draft.description, "before");
        assert_eq!(session.draft.priority, Priority::Low);
        assert_eq!(session.draft.category, Category::Work);
    }

    #[test]
    fn begin_on_missing_record_is_none() {
        let store = store_with_one_task();
        assert!(EditSession::begin(&store, 3).is_none());
    }

    #[test]
    fn commit_overwrites_all_six_fields_and_keeps_completed() {
        let mut store = store_with_one_task();
        store.toggle_complete(0);

        let mut session = EditSession::begin(&store, 0).unwrap();
        session.draft = TaskDraft {
            title: "Rewritten".into(),
            description: "after".into(),
            priority: Priority::High,
            due_date: NaiveDate::from_ymd_opt(2025, 1, 2),
            due_time: NaiveTime::from_hms_opt(18, 0, 0),
            category: Category::Urgent,
        };
        assert!(session.commit(&mut store));

        let task = store.get(0).unwrap();
        assert_eq!(task.title, "Rewritten");
        assert_eq!(task.description, "after");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2025, 1, 2));
        assert_eq!(task.due_time, NaiveTime::from_hms_opt(18, 0, 0));
        assert_eq!(task.category, Category::Urgent);
        assert!(task.completed);
    }

    #[test]
    fn commit_accepts_blank_title() {
        // Creation validates the title; an edit does not. Both policies are
        // intentional and kept distinct.
        let mut store = store_with_one_task();
        let mut session = EditSession::begin(&store, 0).unwrap();
        session.draft.title = "   ".into();
        assert!(session.commit(&mut store));
        assert_eq!(store.get(0).unwrap().title, "   ");
    }

    #[test]
    fn dropping_a_session_changes_nothing() {
        let store = store_with_one_task();
        {
            let mut session = EditSession::begin(&store, 0).unwrap();
            session.draft.title = "Discarded".into();
        }
        assert_eq!(store.get(0).unwrap().title, "Original");
    }

    #[test]
    fn sessions_on_different_records_are_independent() {
        let mut store = store_with_one_task();
        store
            .add(TaskDraft {
                title: "Second".into(),
                description: String::new(),
                priority: Priority::Medium,
                due_date: None,
                due_time: None,
                category: Category::Personal,
            })
            .unwrap();

        let mut first = EditSession::begin(&store, 0).unwrap();
        let mut second = EditSession::begin(&store, 1).unwrap();
        first.draft.title = "First edited".into();
        second.draft.title = "Second edited".into();

        assert!(second.commit(&mut store));
        assert!(first.commit(&mut store));
        assert_eq!(store.get(0).unwrap().title, "First edited");
        assert_eq!(store.get(1).unwrap().title, "Second edited");
    }
}
