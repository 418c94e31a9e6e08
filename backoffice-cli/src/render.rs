//! Plain-text rendering of table pages and notifications

use std::fmt::Write;

use backoffice_lib::service::Notifier;
use backoffice_lib::service::Severity;
use backoffice_lib::table::PageItem;
use backoffice_lib::table::SortIndicator;
use backoffice_lib::table::TableEngine;

/// Prints notifications to stderr and mirrors them into the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, severity: Severity, title: &str, detail: &str) {
        let marker = match severity {
            Severity::Success => "ok",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        eprintln!("[{}] {}: {}", marker, title, detail);
        backoffice_lib::service::LogNotifier.notify(severity, title, detail);
    }
}

/// Renders the current page with headers, sort markers and a separator.
pub fn page(table: &TableEngine) -> String {
    let headers: Vec<String> = table
        .headers()
        .into_iter()
        .map(|header| match header.sort {
            SortIndicator::Unsorted => header.label,
            SortIndicator::Ascending => format!("{} ^", header.label),
            SortIndicator::Descending => format!("{} v", header.label),
        })
        .collect();
    if headers.is_empty() {
        return String::from("(no columns)\n");
    }

    let rows: Vec<Vec<String>> = table
        .rendered_page()
        .iter()
        .map(|cells| cells.iter().map(|cell| cell.plain()).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, &headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    if rows.is_empty() {
        out.push_str("(no rows)\n");
    }
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = width))
        .collect();
    let _ = writeln!(out, "{}", line.join(" | ").trim_end());
}

/// Pager line, e.g. `1 ... 4 [5] 6 ... 10`.
pub fn pager(table: &TableEngine) -> String {
    let current = table.state().page;
    table
        .page_items()
        .into_iter()
        .map(|item| match item {
            PageItem::Page(n) if n == current => format!("[{}]", n),
            PageItem::Page(n) => n.to_string(),
            PageItem::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Footer such as `Showing 10 of 42 rows (filtered from 50)`.
pub fn summary(table: &TableEngine) -> String {
    let summary = table.summary();
    let mut line = format!("Showing {} of {} rows", summary.visible, summary.filtered);
    if summary.filtered != summary.total {
        let _ = write!(line, " (filtered from {})", summary.total);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_lib::model::ColumnDescriptor;
    use backoffice_lib::model::Row;
    use backoffice_lib::model::TableData;

    fn table() -> TableEngine {
        let rows = (1..=12)
            .map(|i| Row::new().set("name", format!("Item {:02}", i)).set("is_active", i % 2 == 0))
            .collect();
        TableEngine::new(TableData::new(
            vec![
                ColumnDescriptor::new("name", "Name", "CharField"),
                ColumnDescriptor::new("is_active", "Active", "BooleanField"),
            ],
            rows,
        ))
    }

    #[test]
    fn test_page_layout() {
        let mut table = table();
        table.set_sort("name");
        let text = page(&table);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Name ^  | Active");
        assert_eq!(lines[1], "------- | ------");
        assert_eq!(lines[2], "Item 01 | No");
        assert_eq!(lines.len(), 12);
    }

    #[test]
    fn test_pager_marks_current_page() {
        let mut table = table();
        table.set_page(2);
        assert_eq!(pager(&table), "1 [2]");
    }

    #[test]
    fn test_summary_mentions_filter() {
        let mut table = table();
        assert_eq!(summary(&table), "Showing 10 of 12 rows");
        table.set_search("item 1");
        assert_eq!(summary(&table), "Showing 3 of 3 rows (filtered from 12)");
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(page(&TableEngine::empty()), "(no columns)\n");
    }
}
