//! Command implementations for the CLI interface.
//!
//! Each subcommand maps to one user action on the task collection: add,
//! list with a category filter, toggle completion, delete, edit, report
//! progress, manage theme settings, or launch the TUI. Every mutating
//! command persists the full collection before returning.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use chrono::{NaiveDate, NaiveTime};

use crate::editor::EditSession;
use crate::fields::*;
use crate::storage::{Storage, THEME_KEY, THEME_STYLE_KEY};
use crate::store::Store;
use crate::task::{format_due, TaskDraft};
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI interface.
    Ui,

    /// Add a new task.
    Add {
        /// Short title for the task. Must be non-empty after trimming.
        title: String,
        /// Optional longer description.
        #[arg(long, default_value = "")]
        desc: String,
        /// Priority: low | medium | high.
        #[arg(long, value_enum)]
        priority: Priority,
        /// Due date: YYYY-MM-DD.
        #[arg(long)]
        date: Option<String>,
        /// Due time: HH:MM.
        #[arg(long)]
        time: Option<String>,
        /// Category: work | personal | urgent.
        #[arg(long, value_enum)]
        category: Category,
    },

    /// List tasks, optionally filtered by category.
    List {
        /// Category filter: work | personal | urgent | all.
        #[arg(long, value_enum, default_value_t = CategoryArg::All)]
        category: CategoryArg,
        /// Show only completed tasks.
        #[arg(long, conflicts_with = "pending_only")]
        completed_only: bool,
        /// Show only pending tasks.
        #[arg(long)]
        pending_only: bool,
    },

    /// Toggle completion of a task by its list position.
    Done {
        /// Position as shown by `list` (1-based).
        pos: usize,
    },

    /// Delete a task by its list position.
    Delete {
        /// Position as shown by `list` (1-based).
        pos: usize,
    },

    /// Edit a task: unspecified fields keep their current values, the
    /// commit overwrites the whole record.
    Edit {
        /// Position as shown by `list` (1-based).
        pos: usize,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Due date: YYYY-MM-DD.
        #[arg(long)]
        date: Option<String>,
        /// Due time: HH:MM.
        #[arg(long)]
        time: Option<String>,
        #[arg(long, value_enum)]
        category: Option<Category>,
        /// Clear the due date.
        #[arg(long, conflicts_with = "date")]
        clear_date: bool,
        /// Clear the due time.
        #[arg(long, conflicts_with = "time")]
        clear_time: bool,
    },

    /// Show the completion percentage.
    Progress,

    /// Show or change theme settings.
    Theme {
        /// Mode: light | dark.
        #[arg(value_enum)]
        mode: Option<Theme>,
        /// Color scheme: modern | nature | neon.
        #[arg(long, value_enum)]
        style: Option<ThemeStyle>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Category filter argument, including the `all` sentinel.
#[derive(Debug, Clone, Copy, clap::ValueEnum, PartialEq, Eq)]
pub enum CategoryArg {
    All,
    Work,
    Personal,
    Urgent,
}

impl From<CategoryArg> for CategoryFilter {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::All => CategoryFilter::All,
            CategoryArg::Work => CategoryFilter::Only(Category::Work),
            CategoryArg::Personal => CategoryFilter::Only(Category::Personal),
            CategoryArg::Urgent => CategoryFilter::Only(Category::Urgent),
        }
    }
}

/// Launch the terminal user interface.
pub fn cmd_ui(storage_path: &std::path::Path) {
    if let Err(e) = run_tui(storage_path) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

fn parse_date_arg(s: &str) -> NaiveDate {
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(d) => d,
        Err(_) => {
            eprintln!("Invalid date '{}': expected YYYY-MM-DD.", s);
            std::process::exit(1);
        }
    }
}

fn parse_time_arg(s: &str) -> NaiveTime {
    match NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
    {
        Ok(t) => t,
        Err(_) => {
            eprintln!("Invalid time '{}': expected HH:MM.", s);
            std::process::exit(1);
        }
    }
}

/// Resolve a 1-based list position to an index, or exit with a message.
fn resolve_pos(store: &Store, pos: usize) -> usize {
    if pos == 0 || pos > store.len() {
        eprintln!("No task at position {} ({} tasks).", pos, store.len());
        std::process::exit(1);
    }
    pos - 1
}

fn persist(store: &Store, storage: &mut Storage) {
    if let Err(e) = store.save_all(storage) {
        eprintln!("Failed to save storage: {e}");
        std::process::exit(1);
    }
}

/// Add a new task to the collection.
pub fn cmd_add(
    store: &mut Store,
    storage: &mut Storage,
    title: String,
    desc: String,
    priority: Priority,
    date: Option<String>,
    time: Option<String>,
    category: Category,
) {
    let draft = TaskDraft {
        title,
        description: desc,
        priority,
        due_date: date.as_deref().map(parse_date_arg),
        due_time: time.as_deref().map(parse_time_arg),
        category,
    };
    match store.add(draft) {
        Ok(()) => {
            persist(store, storage);
            println!("Task inserted!");
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// List tasks in a formatted table.
pub fn cmd_list(store: &Store, category: CategoryArg, completed_only: bool, pending_only: bool) {
    let filter: CategoryFilter = category.into();
    let visible = store.visible_indices(filter);

    println!(
        "{:<4} {:<4} {:<8} {:<17} {:<9} {}",
        "Pos", "Done", "Pri", "Due", "Category", "Title"
    );
    let mut shown = 0usize;
    for index in visible {
        let task = match store.get(index) {
            Some(t) => t,
            None => continue,
        };
        if completed_only && !task.completed {
            continue;
        }
        if pending_only && task.completed {
            continue;
        }
        shown += 1;
        println!(
            "{:<4} {:<4} {:<8} {:<17} {:<9} {}",
            index + 1,
            if task.completed { "[x]" } else { "[ ]" },
            format_priority(task.priority),
            format_due(task.due_date, task.due_time),
            format_category(task.category),
            task.title
        );
        if !task.description.is_empty() {
            println!("{:<47}{}", "", task.description);
        }
    }
    if shown == 0 {
        println!("No tasks.");
    }
}

/// Toggle completion of the task at `pos` (1-based).
pub fn cmd_done(store: &mut Store, storage: &mut Storage, pos: usize) {
    let index = resolve_pos(store, pos);
    // resolve_pos guarantees the index is in range.
    let completed = store.toggle_complete(index).unwrap_or(false);
    persist(store, storage);
    if completed {
        println!("Task completed!");
    } else {
        println!("Task reopened.");
    }
}

/// Delete the task at `pos` (1-based).
pub fn cmd_delete(store: &mut Store, storage: &mut Storage, pos: usize) {
    let index = resolve_pos(store, pos);
    store.delete(index);
    persist(store, storage);
    println!("Task deleted!");
}

/// Edit the task at `pos` (1-based): begin a session pre-populated with the
/// current values, overlay the provided flags, and commit all six fields.
pub fn cmd_edit(
    store: &mut Store,
    storage: &mut Storage,
    pos: usize,
    title: Option<String>,
    desc: Option<String>,
    priority: Option<Priority>,
    date: Option<String>,
    time: Option<String>,
    category: Option<Category>,
    clear_date: bool,
    clear_time: bool,
) {
    let index = resolve_pos(store, pos);
    let mut session = match EditSession::begin(store, index) {
        Some(s) => s,
        None => {
            eprintln!("No task at position {}.", pos);
            std::process::exit(1);
        }
    };

    if let Some(t) = title {
        session.draft.title = t;
    }
    if let Some(d) = desc {
        session.draft.description = d;
    }
    if let Some(p) = priority {
        session.draft.priority = p;
    }
    if let Some(d) = date {
        session.draft.due_date = Some(parse_date_arg(&d));
    }
    if let Some(t) = time {
        session.draft.due_time = Some(parse_time_arg(&t));
    }
    if let Some(c) = category {
        session.draft.category = c;
    }
    if clear_date {
        session.draft.due_date = None;
    }
    if clear_time {
        session.draft.due_time = None;
    }

    session.commit(store);
    persist(store, storage);
    println!("Task updated!");
}

/// Print the completion percentage and its band.
pub fn cmd_progress(store: &Store) {
    let percent = store.progress();
    let band = match Store::progress_band(percent) {
        ProgressBand::Low => "low",
        ProgressBand::Medium => "medium",
        ProgressBand::High => "high",
    };
    println!("Progress: {}% ({})", percent, band);
}

/// Show or change the persisted theme settings.
pub fn cmd_theme(storage: &mut Storage, mode: Option<Theme>, style: Option<ThemeStyle>) {
    if mode.is_none() && style.is_none() {
        let theme = storage.get(THEME_KEY).map(parse_theme).unwrap_or_default();
        let scheme = storage
            .get(THEME_STYLE_KEY)
            .map(parse_theme_style)
            .unwrap_or_default();
        println!("Theme: {}", format_theme(theme));
        println!("Style: {}", format_theme_style(scheme));
        return;
    }
    if let Some(m) = mode {
        storage.set(THEME_KEY, format_theme(m).to_string());
    }
    if let Some(s) = style {
        storage.set(THEME_STYLE_KEY, format_theme_style(s).to_string());
    }
    if let Err(e) = storage.save() {
        eprintln!("Failed to save storage: {e}");
        std::process::exit(1);
    }
    println!("Theme updated.");
}

/// Generate shell completion scripts to stdout.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    let mut cmd = crate::cli::Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
