//! The canonical task collection and its persistence round-trip.
//!
//! `Store` owns the ordered in-memory list of task records. Presentation
//! layers (CLI and TUI) render from it and never read data back out of what
//! they display. Every mutation is followed by `save_all`, which re-encodes
//! the whole collection into the `tasks` storage key; there is no diffing
//! and no partial write.

use std::fmt;

use crate::fields::{CategoryFilter, ProgressBand};
use crate::storage::{Storage, TASKS_KEY};
use crate::task::{Task, TaskDraft};

/// Creation failure. The only validation the store performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddError {
    EmptyTitle,
}

impl fmt::Display for AddError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddError::EmptyTitle => write!(f, "Please enter a task."),
        }
    }
}

/// Ordered collection of task records.
#[derive(Debug, Default)]
pub struct Store {
    tasks: Vec<Task>,
}

impl Store {
    /// Build a store from the persisted `tasks` value. An absent key or a
    /// non-parseable value degrades to the empty collection; a load never
    /// raises a user-visible error.
    pub fn load(storage: &Storage) -> Self {
        let tasks = storage
            .get(TASKS_KEY)
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default();
        Store { tasks }
    }

    /// Serialize the full collection into storage and flush it to disk,
    /// overwriting any prior value. Called after every mutation.
    pub fn save_all(&self, storage: &mut Storage) -> std::io::Result<()> {
        let encoded = serde_json::to_string(&self.tasks).map_err(std::io::Error::other)?;
        storage.set(TASKS_KEY, encoded);
        storage.save()
    }

    /// All records in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Get a record by position.
    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    /// Create a record from a draft and append it. The title is trimmed and
    /// must be non-empty; everything else is taken as given. `completed`
    /// starts false.
    pub fn add(&mut self, draft: TaskDraft) -> Result<(), AddError> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(AddError::EmptyTitle);
        }
        self.tasks.push(Task {
            title,
            description: draft.description,
            priority: draft.priority,
            due_date: draft.due_date,
            due_time: draft.due_time,
            category: draft.category,
            completed: false,
        });
        Ok(())
    }

    /// Flip the completion flag of the record at `index`. Returns the new
    /// flag value, or None when out of range.
    pub fn toggle_complete(&mut self, index: usize) -> Option<bool> {
        let task = self.tasks.get_mut(index)?;
        task.completed = !task.completed;
        Some(task.completed)
    }

    /// Remove the record at `index`, preserving the relative order of the
    /// rest. Returns the removed record, or None when out of range.
    pub fn delete(&mut self, index: usize) -> Option<Task> {
        if index < self.tasks.len() {
            Some(self.tasks.remove(index))
        } else {
            None
        }
    }

    /// Overwrite all six editable fields of the record at `index` with the
    /// draft, unconditionally. Unlike `add`, a blank title passes: edits are
    /// not validated. `completed` is left untouched.
    pub fn apply_edit(&mut self, index: usize, draft: TaskDraft) -> bool {
        match self.tasks.get_mut(index) {
            Some(task) => {
                task.title = draft.title;
                task.description = draft.description;
                task.priority = draft.priority;
                task.due_date = draft.due_date;
                task.due_time = draft.due_time;
                task.category = draft.category;
                true
            }
            None => false,
        }
    }

    /// Completion percentage, rounded to the nearest integer. Empty
    /// collection is 0.
    pub fn progress(&self) -> u8 {
        if self.tasks.is_empty() {
            return 0;
        }
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        ((completed as f64 / self.tasks.len() as f64) * 100.0).round() as u8
    }

    /// Band for a progress percentage: below 40 low, below 70 medium,
    /// otherwise high.
    pub fn progress_band(percent: u8) -> ProgressBand {
        if percent < 40 {
            ProgressBand::Low
        } else if percent < 70 {
            ProgressBand::Medium
        } else {
            ProgressBand::High
        }
    }

    /// Positions of the records visible under `filter`, in insertion order.
    pub fn visible_indices(&self, filter: CategoryFilter) -> Vec<usize> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| filter.matches(t.category))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Category, Priority};
    use crate::storage::Storage;
    use chrono::{NaiveDate, NaiveTime};
    use tempfile::tempdir;

    fn draft(title: &str, category: Category) -> TaskDraft {
        TaskDraft {
            title: title.into(),
            description: String::new(),
            priority: Priority::Medium,
            due_date: None,
            due_time: None,
            category,
        }
    }

    #[test]
    fn add_rejects_empty_and_whitespace_titles() {
        let mut store = Store::default();
        assert_eq!(store.add(draft("", Category::Work)), Err(AddError::EmptyTitle));
        assert_eq!(store.add(draft("   ", Category::Work)), Err(AddError::EmptyTitle));
        assert!(store.is_empty());
    }

    #[test]
    fn add_trims_title_and_starts_incomplete() {
        let mut store = Store::default();
        store.add(draft("  buy milk  ", Category::Personal)).unwrap();
        assert_eq!(store.get(0).unwrap().title, "buy milk");
        assert!(!store.get(0).unwrap().completed);
    }

    #[test]
    fn add_persist_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let mut storage = Storage::open(&path);

        let mut store = Store::default();
        store
            .add(TaskDraft {
                title: "Write report".into(),
                description: "Quarterly numbers".into(),
                priority: Priority::High,
                due_date: NaiveDate::from_ymd_opt(2024, 6, 1),
                due_time: NaiveTime::from_hms_opt(9, 30, 0),
                category: Category::Work,
            })
            .unwrap();
        store.save_all(&mut storage).unwrap();

        let reloaded = Store::load(&Storage::open(&path));
        assert_eq!(reloaded.len(), 1);
        let task = reloaded.get(0).unwrap();
        assert_eq!(task.title, "Write report");
        assert_eq!(task.description, "Quarterly numbers");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(task.due_time, NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(task.category, Category::Work);
        assert!(!task.completed);
    }

    #[test]
    fn load_with_malformed_tasks_value_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let mut storage = Storage::open(&path);
        storage.set(TASKS_KEY, "this is not json".into());
        assert!(Store::load(&storage).is_empty());
    }

    #[test]
    fn load_with_absent_key_is_empty() {
        let dir = tempdir().unwrap();
        let storage = Storage::open(&dir.path().join("storage.json"));
        assert!(Store::load(&storage).is_empty());
    }

    #[test]
    fn toggle_twice_restores_original_flag() {
        let mut store = Store::default();
        store.add(draft("a", Category::Work)).unwrap();
        assert_eq!(store.toggle_complete(0), Some(true));
        assert_eq!(store.toggle_complete(0), Some(false));
        assert!(!store.get(0).unwrap().completed);
    }

    #[test]
    fn delete_removes_exactly_one_preserving_order() {
        let mut store = Store::default();
        for title in ["a", "b", "c", "d"] {
            store.add(draft(title, Category::Work)).unwrap();
        }
        let removed = store.delete(1).unwrap();
        assert_eq!(removed.title, "b");
        assert_eq!(store.len(), 3);
        let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["a", "c", "d"]);
    }

    #[test]
    fn delete_out_of_range_is_none() {
        let mut store = Store::default();
        store.add(draft("a", Category::Work)).unwrap();
        assert!(store.delete(5).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn progress_rounds_and_handles_empty() {
        let mut store = Store::default();
        assert_eq!(store.progress(), 0);
        for title in ["a", "b", "c", "d", "e"] {
            store.add(draft(title, Category::Work)).unwrap();
        }
        store.toggle_complete(0);
        store.toggle_complete(1);
        assert_eq!(store.progress(), 40);
        store.toggle_complete(2);
        assert_eq!(store.progress(), 60);
        // 1 of 3 completed rounds 33.33 to 33
        let mut small = Store::default();
        for title in ["a", "b", "c"] {
            small.add(draft(title, Category::Work)).unwrap();
        }
        small.toggle_complete(0);
        assert_eq!(small.progress(), 33);
    }

    #[test]
    fn progress_band_thresholds() {
        assert_eq!(Store::progress_band(0), ProgressBand::Low);
        assert_eq!(Store::progress_band(39), ProgressBand::Low);
        assert_eq!(Store::progress_band(40), ProgressBand::Medium);
        assert_eq!(Store::progress_band(69), ProgressBand::Medium);
        assert_eq!(Store::progress_band(70), ProgressBand::High);
        assert_eq!(Store::progress_band(100), ProgressBand::High);
    }

    #[test]
    fn visible_indices_follow_filter() {
        let mut store = Store::default();
        store.add(draft("w", Category::Work)).unwrap();
        store.add(draft("p", Category::Personal)).unwrap();
        store.add(draft("u", Category::Urgent)).unwrap();
        store.add(draft("w2", Category::Work)).unwrap();

        assert_eq!(store.visible_indices(CategoryFilter::All), vec![0, 1, 2, 3]);
        assert_eq!(
            store.visible_indices(CategoryFilter::Only(Category::Work)),
            vec![0, 3]
        );
        assert_eq!(
            store.visible_indices(CategoryFilter::Only(Category::Urgent)),
            vec![2]
        );
    }

    #[test]
    fn insertion_order_survives_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let mut storage = Storage::open(&path);

        let mut store = Store::default();
        for title in ["first", "second", "third"] {
            store.add(draft(title, Category::Personal)).unwrap();
        }
        store.save_all(&mut storage).unwrap();

        let reloaded = Store::load(&Storage::open(&path));
        let titles: Vec<&str> = reloaded.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["first", "second", "third"]);
    }
}
