//! Task form handling for the terminal user interface.
//!
//! One form serves both adding and editing. Its six fields mirror the record
//! exactly: title, description, priority, due date, due time, category.
//! Text fields carry their own cursor; priority and category are cycled
//! selectors. `to_draft` turns the form back into field values for the
//! store.

use chrono::{NaiveDate, NaiveTime};

use crate::fields::{Category, Priority};
use crate::task::{Task, TaskDraft};
use crate::tui::input::InputField;

/// Field order in the form.
pub const TITLE_FIELD: usize = 0;
pub const DESCRIPTION_FIELD: usize = 1;
pub const PRIORITY_FIELD: usize = 2;
pub const DATE_FIELD: usize = 3;
pub const TIME_FIELD: usize = 4;
pub const CATEGORY_FIELD: usize = 5;

const FIELD_COUNT: usize = 6;

/// Form state for creating or editing one task.
pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub date: InputField,
    pub time: InputField,
    pub priority: usize,
    pub category: usize,
    pub current_field: usize,
    pub priorities: Vec<Priority>,
    pub categories: Vec<Category>,
}

impl TaskForm {
    /// Create an empty form. Priority and category have no enforced default;
    /// the selectors simply start on the first entry.
    pub fn new() -> Self {
        Self {
            title: InputField::new(),
            description: InputField::new(),
            date: InputField::new(),
            time: InputField::new(),
            priority: 0,
            category: 0,
            current_field: 0,
            priorities: vec![Priority::Low, Priority::Medium, Priority::High],
            categories: vec![Category::Work, Category::Personal, Category::Urgent],
        }
    }

    /// Create a form pre-populated from an existing task (begin-edit).
    pub fn from_task(task: &Task) -> Self {
        let mut form = Self::new();
        form.title = InputField::with_value(&task.title);
        form.description = InputField::with_value(&task.description);
        form.date = InputField::with_value(
            &task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        );
        form.time = InputField::with_value(
            &task
                .due_time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
        );
        form.priority = form
            .priorities
            .iter()
            .position(|&p| p == task.priority)
            .unwrap_or(0);
        form.category = form
            .categories
            .iter()
            .position(|&c| c == task.category)
            .unwrap_or(0);
        form
    }

    /// Turn the form into field values. Date and time may be left blank;
    /// non-blank values must parse.
    pub fn to_draft(&self) -> Result<TaskDraft, String> {
        let date_raw = self.date.value.trim();
        let due_date = if date_raw.is_empty() {
            None
        } else {
            Some(
                NaiveDate::parse_from_str(date_raw, "%Y-%m-%d")
                    .map_err(|_| format!("Invalid date '{}': expected YYYY-MM-DD", date_raw))?,
            )
        };
        let time_raw = self.time.value.trim();
        let due_time = if time_raw.is_empty() {
            None
        } else {
            Some(
                NaiveTime::parse_from_str(time_raw, "%H:%M")
                    .or_else(|_| NaiveTime::parse_from_str(time_raw, "%H:%M:%S"))
                    .map_err(|_| format!("Invalid time '{}': expected HH:MM", time_raw))?,
            )
        };
        Ok(TaskDraft {
            title: self.title.value.clone(),
            description: self.description.value.clone(),
            priority: self.priorities[self.priority],
            due_date,
            due_time,
            category: self.categories[self.category],
        })
    }

    /// Move to the next field in the form.
    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
        self.update_active_field();
    }

    /// Move to the previous field in the form.
    pub fn prev_field(&mut self) {
        self.current_field = if self.current_field == 0 {
            FIELD_COUNT - 1
        } else {
            self.current_field - 1
        };
        self.update_active_field();
    }

    /// Update which text field is active for cursor display.
    pub fn update_active_field(&mut self) {
        self.title.active = self.current_field == TITLE_FIELD;
        self.description.active = self.current_field == DESCRIPTION_FIELD;
        self.date.active = self.current_field == DATE_FIELD;
        self.time.active = self.current_field == TIME_FIELD;
    }

    /// Route character input to the active text field.
    pub fn handle_char(&mut self, c: char) {
        match self.current_field {
            TITLE_FIELD => self.title.handle_char(c),
            DESCRIPTION_FIELD => self.description.handle_char(c),
            DATE_FIELD => self.date.handle_char(c),
            TIME_FIELD => self.time.handle_char(c),
            _ => {}
        }
    }

    /// Route backspace to the active text field.
    pub fn handle_backspace(&mut self) {
        match self.current_field {
            TITLE_FIELD => self.title.handle_backspace(),
            DESCRIPTION_FIELD => self.description.handle_backspace(),
            DATE_FIELD => self.date.handle_backspace(),
            TIME_FIELD => self.time.handle_backspace(),
            _ => {}
        }
    }

    /// Left/right arrows: cursor movement in text fields, cycling in the
    /// priority and category selectors.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            TITLE_FIELD => {
                if right {
                    self.title.move_cursor_right()
                } else {
                    self.title.move_cursor_left()
                }
            }
            DESCRIPTION_FIELD => {
                if right {
                    self.description.move_cursor_right()
                } else {
                    self.description.move_cursor_left()
                }
            }
            DATE_FIELD => {
                if right {
                    self.date.move_cursor_right()
                } else {
                    self.date.move_cursor_left()
                }
            }
            TIME_FIELD => {
                if right {
                    self.time.move_cursor_right()
                } else {
                    self.time.move_cursor_left()
                }
            }
            PRIORITY_FIELD => {
                if right {
                    self.priority = (self.priority + 1) % self.priorities.len();
                } else {
                    self.priority = if self.priority == 0 {
                        self.priorities.len() - 1
                    } else {
                        self.priority - 1
                    };
                }
            }
            CATEGORY_FIELD => {
                if right {
                    self.category = (self.category + 1) % self.categories.len();
                } else {
                    self.category = if self.category == 0 {
                        self.categories.len() - 1
                    } else {
                        self.category - 1
                    };
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        Task {
            title: "Clean garage".into(),
            description: "Weekend job".into(),
            priority: Priority::Medium,
            due_date: NaiveDate::from_ymd_opt(2024, 7, 13),
            due_time: None,
            category: Category::Personal,
            completed: false,
        }
    }

    #[test]
    fn from_task_pre_populates_every_field() {
        let form = TaskForm::from_task(&sample_task());
        assert_eq!(form.title.value, "Clean garage");
        assert_eq!(form.description.value, "Weekend job");
        assert_eq!(form.date.value, "2024-07-13");
        assert_eq!(form.time.value, "");
        assert_eq!(form.priorities[form.priority], Priority::Medium);
        assert_eq!(form.categories[form.category], Category::Personal);
    }

    #[test]
    fn to_draft_round_trips_through_the_form() {
        let task = sample_task();
        let draft = TaskForm::from_task(&task).to_draft().unwrap();
        assert_eq!(draft, TaskDraft::from_task(&task));
    }

    #[test]
    fn to_draft_rejects_malformed_date() {
        let mut form = TaskForm::new();
        form.date = InputField::with_value("13/07/2024");
        assert!(form.to_draft().is_err());
    }

    #[test]
    fn blank_date_and_time_are_none() {
        let mut form = TaskForm::new();
        form.title = InputField::with_value("x");
        let draft = form.to_draft().unwrap();
        assert_eq!(draft.due_date, None);
        assert_eq!(draft.due_time, None);
    }

    #[test]
    fn field_navigation_wraps() {
        let mut form = TaskForm::new();
        for _ in 0..6 {
            form.next_field();
        }
        assert_eq!(form.current_field, TITLE_FIELD);
        form.prev_field();
        assert_eq!(form.current_field, CATEGORY_FIELD);
    }

    #[test]
    fn selector_cycles_both_directions() {
        let mut form = TaskForm::new();
        form.current_field = PRIORITY_FIELD;
        form.handle_left_right(false);
        assert_eq!(form.priorities[form.priority], Priority::High);
        form.handle_left_right(true);
        assert_eq!(form.priorities[form.priority], Priority::Low);
    }
}
