//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which manages the TUI state,
//! handles user input, renders the interface, and coordinates between the
//! task table, the add/edit form, and the confirmation dialog. The store is
//! the single source of truth; every screen renders from it and every
//! mutation persists the full collection immediately.

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::editor::EditSession;
use crate::fields::*;
use crate::storage::{Storage, THEME_KEY, THEME_STYLE_KEY};
use crate::store::Store;
use crate::task::format_due;
use crate::tui::colors::{Palette, BAND_HIGH, BAND_LOW, BAND_MEDIUM};
use crate::tui::task_form::{
    TaskForm, CATEGORY_FIELD, DATE_FIELD, DESCRIPTION_FIELD, PRIORITY_FIELD, TIME_FIELD,
    TITLE_FIELD,
};

/// Screens of the terminal user interface.
#[derive(Clone, Copy, PartialEq)]
enum AppState {
    TaskList,
    AddTask,
    EditTask,
    Confirm,
    Help,
}

/// Main application state for the terminal user interface.
pub struct App {
    state: AppState,
    store: Store,
    storage: Storage,
    table_state: TableState,
    /// Store positions of the rows currently visible under the filter.
    visible: Vec<usize>,
    form: TaskForm,
    /// Store position being edited; None while adding.
    editing: Option<usize>,
    filter: CategoryFilter,
    theme: Theme,
    style: ThemeStyle,
    status_message: String,
    confirm_index: Option<usize>,
}

impl App {
    /// Create a new App instance, loading tasks and theme settings from the
    /// storage file.
    pub fn new(storage_path: &Path) -> io::Result<Self> {
        let storage = Storage::open(storage_path);
        let store = Store::load(&storage);
        let theme = storage.get(THEME_KEY).map(parse_theme).unwrap_or_default();
        let style = storage
            .get(THEME_STYLE_KEY)
            .map(parse_theme_style)
            .unwrap_or_default();

        let mut app = App {
            state: AppState::TaskList,
            store,
            storage,
            table_state: TableState::default(),
            visible: Vec::new(),
            form: TaskForm::new(),
            editing: None,
            filter: CategoryFilter::All,
            theme,
            style,
            status_message: String::new(),
            confirm_index: None,
        };
        app.update_visible();
        Ok(app)
    }

    fn palette(&self) -> Palette {
        Palette::for_settings(self.style, self.theme)
    }

    /// Recompute visible rows for the active filter, keeping the selection
    /// on the same record when possible.
    fn update_visible(&mut self) {
        let old_selected = self
            .table_state
            .selected()
            .and_then(|row| self.visible.get(row))
            .copied();

        self.visible = self.store.visible_indices(self.filter);

        if let Some(old_index) = old_selected {
            if let Some(row) = self.visible.iter().position(|&i| i == old_index) {
                self.table_state.select(Some(row));
                return;
            }
        }
        self.table_state
            .select(if self.visible.is_empty() { None } else { Some(0) });
    }

    /// Store position of the selected row, if any.
    fn selected_index(&self) -> Option<usize> {
        self.table_state
            .selected()
            .and_then(|row| self.visible.get(row))
            .copied()
    }

    /// Persist the full collection, reporting a write failure in the status
    /// bar instead of crashing the UI.
    fn persist(&mut self) {
        if let Err(e) = self.store.save_all(&mut self.storage) {
            self.status_message = format!("Error saving: {e}");
        }
        self.update_visible();
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Persist theme settings under their own keys.
    fn persist_theme(&mut self) {
        self.storage
            .set(THEME_KEY, format_theme(self.theme).to_string());
        self.storage
            .set(THEME_STYLE_KEY, format_theme_style(self.style).to_string());
        if let Err(e) = self.storage.save() {
            self.status_message = format!("Error saving: {e}");
        }
    }

    /// Handle keyboard input when in the task list view.
    ///
    /// Returns true if the application should quit.
    fn handle_task_list_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Up => {
                if let Some(selected) = self.table_state.selected() {
                    if selected > 0 {
                        self.table_state.select(Some(selected - 1));
                    }
                } else if !self.visible.is_empty() {
                    self.table_state.select(Some(0));
                }
            }
            KeyCode::Down => {
                if let Some(selected) = self.table_state.selected() {
                    if selected + 1 < self.visible.len() {
                        self.table_state.select(Some(selected + 1));
                    }
                } else if !self.visible.is_empty() {
                    self.table_state.select(Some(0));
                }
            }
            KeyCode::Char('a') => {
                self.form = TaskForm::new();
                self.form.update_active_field();
                self.editing = None;
                self.state = AppState::AddTask;
                self.status_message.clear();
            }
            KeyCode::Char('e') => {
                if let Some(index) = self.selected_index() {
                    if let Some(task) = self.store.get(index) {
                        self.form = TaskForm::from_task(task);
                        self.form.update_active_field();
                        self.editing = Some(index);
                        self.state = AppState::EditTask;
                        self.status_message.clear();
                    }
                }
            }
            KeyCode::Char('c') | KeyCode::Char(' ') => {
                if let Some(index) = self.selected_index() {
                    if let Some(completed) = self.store.toggle_complete(index) {
                        self.persist();
                        self.set_status(if completed {
                            "Task completed!"
                        } else {
                            "Task reopened."
                        });
                    }
                }
            }
            KeyCode::Char('d') => {
                if let Some(index) = self.selected_index() {
                    self.confirm_index = Some(index);
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char('f') => {
                self.filter = self.filter.next();
                self.update_visible();
                self.set_status(format!(
                    "Filter: {} ({} visible)",
                    format_filter(self.filter),
                    self.visible.len()
                ));
            }
            KeyCode::Char('t') => {
                self.theme = match self.theme {
                    Theme::Light => Theme::Dark,
                    Theme::Dark => Theme::Light,
                };
                self.persist_theme();
                self.set_status(format!("Theme: {}", format_theme(self.theme)));
            }
            KeyCode::Char('y') => {
                self.style = match self.style {
                    ThemeStyle::Modern => ThemeStyle::Nature,
                    ThemeStyle::Nature => ThemeStyle::Neon,
                    ThemeStyle::Neon => ThemeStyle::Modern,
                };
                self.persist_theme();
                self.set_status(format!("Style: {}", format_theme_style(self.style)));
            }
            KeyCode::Char('h') => {
                self.state = AppState::Help;
            }
            _ => {}
        }
        false
    }

    /// Handle keyboard input for the add/edit form.
    fn handle_form_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                // Discard the draft. The store was never touched.
                self.state = AppState::TaskList;
                self.editing = None;
                self.status_message.clear();
            }
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.prev_field(),
            KeyCode::Left => self.form.handle_left_right(false),
            KeyCode::Right => self.form.handle_left_right(true),
            KeyCode::Backspace => self.form.handle_backspace(),
            KeyCode::Enter => self.commit_form(),
            KeyCode::Char(c) => self.form.handle_char(c),
            _ => {}
        }
    }

    /// Commit the form: add a new record or overwrite the edited one, then
    /// persist. Stays in the form when the input cannot be committed.
    fn commit_form(&mut self) {
        let draft = match self.form.to_draft() {
            Ok(d) => d,
            Err(msg) => {
                self.set_status(msg);
                return;
            }
        };

        match self.editing {
            None => match self.store.add(draft) {
                Ok(()) => {
                    self.persist();
                    self.state = AppState::TaskList;
                    self.set_status("Task inserted!");
                }
                Err(e) => {
                    // Creation validates the title; the edit path does not.
                    self.set_status(e.to_string());
                }
            },
            Some(index) => {
                if let Some(mut session) = EditSession::begin(&self.store, index) {
                    session.draft = draft;
                    session.commit(&mut self.store);
                    self.persist();
                    self.set_status("Task updated!");
                } else {
                    self.set_status("Task no longer exists.");
                }
                self.editing = None;
                self.state = AppState::TaskList;
            }
        }
    }

    /// Handle keyboard input for the delete confirmation dialog.
    fn handle_confirm_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some(index) = self.confirm_index.take() {
                    self.store.delete(index);
                    self.persist();
                    self.set_status("Task deleted!");
                }
                self.state = AppState::TaskList;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_index = None;
                self.state = AppState::TaskList;
                self.status_message.clear();
            }
            _ => {}
        }
    }

    /// Process one input event. Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if !event::poll(Duration::from_millis(200))? {
            return Ok(false);
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                return Ok(false);
            }
            match self.state {
                AppState::TaskList => {
                    return Ok(self.handle_task_list_input(key.code, key.modifiers))
                }
                AppState::AddTask | AppState::EditTask => self.handle_form_input(key.code),
                AppState::Confirm => self.handle_confirm_input(key.code),
                AppState::Help => {
                    self.state = AppState::TaskList;
                }
            }
        }
        Ok(false)
    }

    /// Render the header: app title, active filter and theme, and the
    /// progress gauge coloured by band.
    fn render_header(&mut self, f: &mut Frame, area: Rect) {
        let palette = self.palette();
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(30), Constraint::Length(34)])
            .split(area);

        let context = format!(
            "Filter: {}  Theme: {}/{}",
            format_filter(self.filter),
            format_theme(self.theme),
            format_theme_style(self.style)
        );
        let header_text = vec![Line::from(vec![
            Span::styled("TO-DO LIST", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                context,
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::ITALIC),
            ),
        ])];
        let header = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Left);
        f.render_widget(header, chunks[0]);

        let percent = self.store.progress();
        let band_color = match Store::progress_band(percent) {
            ProgressBand::Low => BAND_LOW,
            ProgressBand::Medium => BAND_MEDIUM,
            ProgressBand::High => BAND_HIGH,
        };
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Progress"))
            .gauge_style(Style::default().fg(band_color))
            .percent(percent as u16)
            .label(format!("{}%", percent));
        f.render_widget(gauge, chunks[1]);
    }

    /// Render the task table.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let palette = self.palette();

        let header_cells = ["Pos", "Done", "Priority", "Due", "Category", "Title", "Description"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells)
            .style(Style::default().bg(palette.accent).fg(palette.header_fg))
            .height(1);

        let rows: Vec<Row> = self
            .visible
            .iter()
            .filter_map(|&index| self.store.get(index).map(|t| (index, t)))
            .map(|(index, task)| {
                let priority_color = match task.priority {
                    Priority::High => palette.priority_high,
                    Priority::Medium => palette.priority_medium,
                    Priority::Low => palette.priority_low,
                };
                let style = if task.completed {
                    Style::default()
                        .fg(palette.dim)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default().fg(palette.text)
                };
                Row::new(vec![
                    Cell::from((index + 1).to_string()),
                    Cell::from(if task.completed { "[x]" } else { "[ ]" }),
                    Cell::from(format_priority(task.priority))
                        .style(style.fg(priority_color)),
                    Cell::from(format_due(task.due_date, task.due_time)),
                    Cell::from(format_category(task.category)),
                    Cell::from(task.title.clone()),
                    Cell::from(task.description.clone()),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(4),  // Pos
            Constraint::Length(5),  // Done
            Constraint::Length(9),  // Priority
            Constraint::Length(17), // Due
            Constraint::Length(9),  // Category
            Constraint::Min(18),    // Title
            Constraint::Min(18),    // Description
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Tasks ({}/{}) - Press 'h' for help",
                self.visible.len(),
                self.store.len()
            )))
            .row_highlight_style(
                Style::default()
                    .bg(palette.selection_bg)
                    .fg(palette.selection_fg),
            )
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    /// Render the add/edit form.
    fn render_form(&mut self, f: &mut Frame, area: Rect, is_edit: bool) {
        let palette = self.palette();
        let title = if is_edit { "Edit Task" } else { "Add Task" };
        let outer = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(palette.accent));
        let inner = outer.inner(area);
        f.render_widget(outer, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // title
                Constraint::Length(3), // description
                Constraint::Length(3), // priority
                Constraint::Length(3), // date
                Constraint::Length(3), // time
                Constraint::Length(3), // category
                Constraint::Min(1),    // hint
            ])
            .split(inner);

        let text_fields = [
            (TITLE_FIELD, "Title", &self.form.title),
            (DESCRIPTION_FIELD, "Description", &self.form.description),
            (DATE_FIELD, "Due date (YYYY-MM-DD)", &self.form.date),
            (TIME_FIELD, "Due time (HH:MM)", &self.form.time),
        ];
        for (field, label, input) in text_fields {
            let chunk = match field {
                TITLE_FIELD => chunks[0],
                DESCRIPTION_FIELD => chunks[1],
                DATE_FIELD => chunks[3],
                _ => chunks[4],
            };
            let active = self.form.current_field == field;
            let border_style = if active {
                Style::default().fg(palette.accent)
            } else {
                Style::default().fg(palette.dim)
            };
            let widget = Paragraph::new(input.value.as_str()).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(label)
                    .border_style(border_style),
            );
            f.render_widget(widget, chunk);
            if active {
                // Place the terminal cursor inside the active field.
                let x = chunk.x + 1 + input.cursor.min(chunk.width.saturating_sub(2) as usize) as u16;
                f.set_cursor_position((x, chunk.y + 1));
            }
        }

        let selectors = [
            (
                PRIORITY_FIELD,
                "Priority",
                format_priority(self.form.priorities[self.form.priority]),
                chunks[2],
            ),
            (
                CATEGORY_FIELD,
                "Category",
                format_category(self.form.categories[self.form.category]),
                chunks[5],
            ),
        ];
        for (field, label, value, chunk) in selectors {
            let active = self.form.current_field == field;
            let border_style = if active {
                Style::default().fg(palette.accent)
            } else {
                Style::default().fg(palette.dim)
            };
            let widget = Paragraph::new(format!("< {} >", value)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(label)
                    .border_style(border_style),
            );
            f.render_widget(widget, chunk);
        }

        let hint = Paragraph::new(
            "Tab/Shift+Tab move - Left/Right cycle - Enter save - Esc discard",
        )
        .style(Style::default().fg(palette.dim))
        .alignment(Alignment::Center);
        f.render_widget(hint, chunks[6]);
    }

    /// Render the delete confirmation dialog over the task list.
    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let title = self
            .confirm_index
            .and_then(|i| self.store.get(i))
            .map(|t| t.title.clone())
            .unwrap_or_default();

        let block = Block::default()
            .title("Confirm Delete")
            .borders(Borders::ALL)
            .style(Style::default().bg(Color::Rgb(114, 0, 0)).fg(Color::White));

        let area = centered_rect(50, 20, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Delete this task?",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(title),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    /// Render the help screen.
    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let palette = self.palette();
        let lines = vec![
            Line::from(""),
            Line::from("Up/Down      select task"),
            Line::from("a            add task"),
            Line::from("e            edit selected task"),
            Line::from("c / Space    toggle completion"),
            Line::from("d            delete selected task"),
            Line::from("f            cycle category filter (All/Work/Personal/Urgent)"),
            Line::from("t            toggle light/dark theme"),
            Line::from("y            cycle color scheme (modern/nature/neon)"),
            Line::from("h            this help"),
            Line::from("q / Esc      quit"),
            Line::from(""),
            Line::from("Press any key to return"),
        ];
        let help = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help")
                    .border_style(Style::default().fg(palette.accent)),
            )
            .alignment(Alignment::Left);
        f.render_widget(help, area);
    }

    /// Render the status bar at the bottom of the screen. Confirmation
    /// messages after each action take the place of the original's toasts.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let palette = self.palette();
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::TaskList => format!(
                    "Tasks: {} | a add, e edit, c toggle, d delete, f filter, h help",
                    self.visible.len()
                ),
                AppState::AddTask => "Add Task".to_string(),
                AppState::EditTask => "Edit Task".to_string(),
                AppState::Confirm => "Confirm Delete".to_string(),
                AppState::Help => "Help".to_string(),
            }
        };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(palette.accent).fg(palette.header_fg))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function that dispatches to appropriate view renderers.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);

        match self.state {
            AppState::TaskList => self.render_task_list(f, chunks[1]),
            AppState::AddTask => self.render_form(f, chunks[1], false),
            AppState::EditTask => self.render_form(f, chunks[1], true),
            AppState::Confirm => {
                self.render_task_list(f, chunks[1]);
                self.render_confirm(f, chunks[1]);
            }
            AppState::Help => self.render_help(f, chunks[1]),
        }

        self.render_status_bar(f, chunks[2]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering and input processing until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

/// Rect centred in `r`, sized as a percentage of it.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
