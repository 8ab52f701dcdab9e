//! Enumerations and field types for task records.
//!
//! This module defines the structured value types a task carries (priority,
//! category) plus the presentation-side enums for category filtering and
//! theme settings.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Task priority. Stored lowercase on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Task category. Stored capitalised on the wire, matching the original
/// storage layout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub enum Category {
    Work,
    Personal,
    Urgent,
}

/// Category filter for list views: a literal category or the `all` sentinel.
/// Pure presentation; never touches stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Membership test: `task.category == filter || filter == all`.
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }

    /// Cycle to the next filter value (All -> Work -> Personal -> Urgent -> All).
    pub fn next(&self) -> Self {
        match self {
            CategoryFilter::All => CategoryFilter::Only(Category::Work),
            CategoryFilter::Only(Category::Work) => CategoryFilter::Only(Category::Personal),
            CategoryFilter::Only(Category::Personal) => CategoryFilter::Only(Category::Urgent),
            CategoryFilter::Only(Category::Urgent) => CategoryFilter::All,
        }
    }
}

/// Light/dark mode. Persisted under the `theme` key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Color scheme. Persisted under the `themeStyle` key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeStyle {
    #[default]
    Modern,
    Nature,
    Neon,
}

/// Progress band, driving the progress indicator colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressBand {
    Low,
    Medium,
    High,
}

/// Format a priority for display.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::Low => "Low",
        Priority::Medium => "Medium",
        Priority::High => "High",
    }
}

/// Format a category for display. Matches the wire spelling.
pub fn format_category(c: Category) -> &'static str {
    match c {
        Category::Work => "Work",
        Category::Personal => "Personal",
        Category::Urgent => "Urgent",
    }
}

/// Format a category filter for display.
pub fn format_filter(f: CategoryFilter) -> &'static str {
    match f {
        CategoryFilter::All => "All",
        CategoryFilter::Only(c) => format_category(c),
    }
}

/// Format a theme for display and persistence.
pub fn format_theme(t: Theme) -> &'static str {
    match t {
        Theme::Light => "light",
        Theme::Dark => "dark",
    }
}

/// Format a theme style for display and persistence.
pub fn format_theme_style(s: ThemeStyle) -> &'static str {
    match s {
        ThemeStyle::Modern => "modern",
        ThemeStyle::Nature => "nature",
        ThemeStyle::Neon => "neon",
    }
}

/// Parse a persisted theme value. Unknown values fall back to light.
pub fn parse_theme(s: &str) -> Theme {
    match s {
        "dark" => Theme::Dark,
        _ => Theme::Light,
    }
}

/// Parse a persisted theme style value. Unknown values fall back to modern.
pub fn parse_theme_style(s: &str) -> ThemeStyle {
    match s.to_lowercase().as_str() {
        "nature" => ThemeStyle::Nature,
        "neon" => ThemeStyle::Neon,
        _ => ThemeStyle::Modern,
    }
}
