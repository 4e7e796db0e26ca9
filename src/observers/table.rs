//! Table observer for pretty-printing unique visitors per page.
//!
//! This module provides [`TableObserver`], which renders a
//! [`VisitsSnapshot`] as a formatted table using the `tabled` crate.
//!
//! # Feature Flag
//!
//! This module requires the `table` feature:
//!
//! ```toml
//! [dependencies]
//! visitatori = { version = "0.1", features = ["table"] }
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use visitatori::observers::table::{TableObserver, TableStyle};
//!
//! let observer = TableObserver::new().with_style(TableStyle::Rounded);
//! println!("{}", observer.render(&snapshot));
//! // ╭────────┬─────────────────╮
//! // │ Page   │ Unique visitors │
//! // ├────────┼─────────────────┤
//! // │ /home  │ 120             │
//! // │ /about │ 7               │
//! // ╰────────┴─────────────────╯
//! ```

use tabled::settings::object::Rows;
use tabled::settings::{Remove, Style};
use tabled::{Table, Tabled};

use crate::snapshot::VisitsSnapshot;

/// Available table styles for rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableStyle {
    /// ASCII table with simple characters: +, -, |
    Ascii,
    /// Modern rounded corners (default)
    #[default]
    Rounded,
    /// Sharp corners with box-drawing characters
    Sharp,
    /// Modern style with clean lines
    Modern,
    /// GitHub-flavored Markdown table
    Markdown,
    /// Dots for borders
    Dots,
    /// No borders, just spacing
    Blank,
}

/// Configuration for the table observer.
#[derive(Debug, Clone)]
pub struct TableConfig {
    pub style: TableStyle,
    /// Whether to show the header row.
    pub show_header: bool,
    /// Custom title printed above the table.
    pub title: Option<String>,
    /// Whether to append a row with the sum over all pages.
    pub show_total: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            style: TableStyle::default(),
            show_header: true,
            title: None,
            show_total: false,
        }
    }
}

#[derive(Tabled)]
struct PageRow {
    #[tabled(rename = "Page")]
    page: String,
    #[tabled(rename = "Unique visitors")]
    unique_visitors: String,
}

/// An observer that renders unique visitors per page as a table.
#[derive(Debug, Clone, Default)]
pub struct TableObserver {
    config: TableConfig,
}

impl TableObserver {
    /// Creates a new table observer with default settings.
    ///
    /// Default style is [`TableStyle::Rounded`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TableConfig) -> Self {
        Self { config }
    }

    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.config.style = style;
        self
    }

    pub fn with_header(mut self, show: bool) -> Self {
        self.config.show_header = show;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    pub fn with_total(mut self, show: bool) -> Self {
        self.config.show_total = show;
        self
    }

    fn apply_style(&self, table: &mut Table) {
        match self.config.style {
            TableStyle::Ascii => table.with(Style::ascii()),
            TableStyle::Rounded => table.with(Style::rounded()),
            TableStyle::Sharp => table.with(Style::sharp()),
            TableStyle::Modern => table.with(Style::modern()),
            TableStyle::Markdown => table.with(Style::markdown()),
            TableStyle::Dots => table.with(Style::dots()),
            TableStyle::Blank => table.with(Style::blank()),
        };
    }

    /// Renders `snapshot` as a table string.
    pub fn render(&self, snapshot: &VisitsSnapshot) -> String {
        let mut rows: Vec<PageRow> = snapshot
            .pages
            .iter()
            .map(|p| PageRow {
                page: p.page.clone(),
                unique_visitors: p.unique_visitors.to_string(),
            })
            .collect();

        if self.config.show_total {
            rows.push(PageRow {
                page: "(total)".to_string(),
                unique_visitors: snapshot.total().to_string(),
            });
        }

        let mut table = Table::new(&rows);
        self.apply_style(&mut table);

        if !self.config.show_header {
            table.with(Remove::row(Rows::first()));
        }

        match &self.config.title {
            Some(title) => format!("{}\n{}", title, table),
            None => table.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::PageSnapshot;

    fn snapshot() -> VisitsSnapshot {
        VisitsSnapshot::new(vec![
            PageSnapshot::new("/home", 120),
            PageSnapshot::new("/about", 7),
        ])
    }

    #[test]
    fn test_render_contains_rows() {
        let output = TableObserver::new().render(&snapshot());
        assert!(output.contains("Page"));
        assert!(output.contains("Unique visitors"));
        assert!(output.contains("/home"));
        assert!(output.contains("120"));
        assert!(output.contains("/about"));
    }

    #[test]
    fn test_render_without_header() {
        let output = TableObserver::new().with_header(false).render(&snapshot());
        assert!(!output.contains("Unique visitors"));
        assert!(output.contains("/home"));
    }

    #[test]
    fn test_render_title_and_total() {
        let output = TableObserver::new()
            .with_style(TableStyle::Ascii)
            .with_title("Visitors")
            .with_total(true)
            .render(&snapshot());
        assert!(output.starts_with("Visitors\n+"));
        assert!(output.contains("(total)"));
        assert!(output.contains("127"));
    }

    #[test]
    fn test_markdown_style() {
        let output = TableObserver::new()
            .with_style(TableStyle::Markdown)
            .render(&snapshot());
        assert!(output.contains("| Page"));
    }
}
