//! # todo - file-backed to-do list manager
//!
//! A small command-line to-do list with an optional terminal user
//! interface (TUI).
//!
//! ## Key Features
//!
//! - **Flat task records**: title, description, priority, due date/time,
//!   category, completion flag
//! - **Category filtering**: Work / Personal / Urgent, or all
//! - **Progress tracking**: completion percentage with low/medium/high bands
//! - **Two interfaces**: a scriptable CLI plus an interactive TUI
//! - **Single-file storage**: one JSON key-value file, rewritten in full
//!   after every change
//! - **Themes**: light/dark mode and three color schemes, persisted
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a task
//! todo add "Write report" --priority high --category work --date 2024-06-01
//!
//! # List tasks
//! todo list --category work
//!
//! # Toggle completion of the second task
//! todo done 2
//!
//! # Launch the TUI
//! todo ui
//! ```
//!
//! Data is stored in `~/.todo/storage.json`; pass `--store <path>` to use a
//! different file.

use std::path::PathBuf;

use clap::Parser;

pub mod cli;
pub mod cmd;
pub mod editor;
pub mod fields;
pub mod storage;
pub mod store;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod input;
    pub mod run;
    pub mod task_form;
}

use cli::Cli;
use cmd::*;
use storage::Storage;
use store::Store;

fn main() {
    let cli = Cli::parse();

    // Completions never touch storage.
    if let Commands::Completions { shell } = &cli.command {
        cmd_completions(*shell);
        return;
    }

    let storage_path = cli.store.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let todo_dir = PathBuf::from(home).join(".todo");
        if let Err(e) = std::fs::create_dir_all(&todo_dir) {
            eprintln!("Failed to create todo directory {}: {}", todo_dir.display(), e);
            std::process::exit(1);
        }
        todo_dir.join("storage.json")
    });

    if let Commands::Ui = cli.command {
        cmd_ui(&storage_path);
        return;
    }

    let mut storage = Storage::open(&storage_path);
    let mut store = Store::load(&storage);

    match cli.command {
        Commands::Ui | Commands::Completions { .. } => unreachable!("handled above"),

        Commands::Add { title, desc, priority, date, time, category } =>
            cmd_add(&mut store, &mut storage, title, desc, priority, date, time, category),

        Commands::List { category, completed_only, pending_only } =>
            cmd_list(&store, category, completed_only, pending_only),

        Commands::Done { pos } => cmd_done(&mut store, &mut storage, pos),

        Commands::Delete { pos } => cmd_delete(&mut store, &mut storage, pos),

        Commands::Edit { pos, title, desc, priority, date, time, category, clear_date, clear_time } =>
            cmd_edit(&mut store, &mut storage, pos, title, desc, priority, date, time,
                     category, clear_date, clear_time),

        Commands::Progress => cmd_progress(&store),

        Commands::Theme { mode, style } => cmd_theme(&mut storage, mode, style),
    }
}
