//! Schema-driven table engine

use crate::columns::Cell;
use crate::columns::ColumnResolver;
use crate::columns::ColumnRule;
use crate::columns::Locale;
use crate::model::ColumnDescriptor;
use crate::model::Row;
use crate::model::TableData;

use super::PageItem;
use super::SortDirection;
use super::SortIndicator;
use super::ViewState;
use super::page_items;

/// A column descriptor together with its resolved presentation rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumn {
    pub descriptor: ColumnDescriptor,
    pub rule: ColumnRule,
}

/// Header metadata for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    pub field: String,
    pub label: String,
    pub width: Option<u16>,
    pub sort: SortIndicator,
}

/// Counts for the table footer ("showing 10 of 42").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSummary {
    /// Rows on the current page.
    pub visible: usize,
    /// Rows matching the search.
    pub filtered: usize,
    /// All loaded rows.
    pub total: usize,
    /// Selected rows on the current page.
    pub selected: usize,
    /// Current page, 1-based.
    pub page: usize,
    /// Number of pages.
    pub total_pages: usize,
}

/// Searchable, sortable, paginated, selectable view over rows it knows only
/// through their column descriptors.
///
/// Every operation recomputes the derived row order synchronously:
/// filter, then stable sort, then slice the current page. Operations never
/// fail; out-of-range pages clamp and unknown positions are ignored.
///
/// # Example
///
/// ```
/// use backoffice_lib::model::{ColumnDescriptor, Row, TableData};
/// use backoffice_lib::table::TableEngine;
///
/// let data = TableData::new(
///     vec![ColumnDescriptor::new("name", "Name", "CharField")],
///     vec![Row::new().set("name", "Globex"), Row::new().set("name", "Acme")],
/// );
/// let mut table = TableEngine::new(data);
/// table.set_sort("name");
///
/// let names: Vec<_> = table
///     .visible_rows()
///     .iter()
///     .map(|row| row.get("name").to_display_string())
///     .collect();
/// assert_eq!(names, ["Acme", "Globex"]);
/// ```
#[derive(Debug, Clone)]
pub struct TableEngine {
    columns: Vec<ResolvedColumn>,
    rows: Vec<Row>,
    state: ViewState,
    /// Indices into `rows` after filtering and sorting.
    order: Vec<usize>,
    resolver: ColumnResolver,
    locale: Locale,
}

impl TableEngine {
    /// Creates an engine over a table payload with default settings.
    pub fn new(data: TableData) -> Self {
        Self::with_options(data, ColumnResolver::new(), Locale::default(), ViewState::default())
    }

    /// Creates an empty engine.
    pub fn empty() -> Self {
        Self::new(TableData::default())
    }

    /// Creates an engine with an explicit resolver, locale and initial state.
    pub fn with_options(
        data: TableData,
        resolver: ColumnResolver,
        locale: Locale,
        state: ViewState,
    ) -> Self {
        let mut engine = Self {
            columns: Vec::new(),
            rows: data.rows,
            state,
            order: Vec::new(),
            resolver,
            locale,
        };
        engine.columns = engine.resolve_columns(data.columns);
        engine.state.page_size = engine.state.page_size.max(1);
        engine.state.selected.clear();
        engine.recompute();
        engine
    }

    fn resolve_columns(&self, descriptors: Vec<ColumnDescriptor>) -> Vec<ResolvedColumn> {
        descriptors
            .into_iter()
            .map(|descriptor| ResolvedColumn {
                rule: self.resolver.resolve(&descriptor.column_type, &descriptor.field),
                descriptor,
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Data
    // -------------------------------------------------------------------------

    /// Replaces columns and rows, e.g. after a reload.
    ///
    /// Search and sort are kept, the page is clamped and the selection is
    /// cleared.
    pub fn set_data(&mut self, data: TableData) {
        log::debug!(
            "table data replaced: {} columns, {} rows",
            data.columns.len(),
            data.rows.len()
        );
        self.columns = self.resolve_columns(data.columns);
        self.rows = data.rows;
        self.state.selected.clear();
        self.recompute();
    }

    /// Drops all columns and rows (empty state after a failed read).
    pub fn clear(&mut self) {
        self.set_data(TableData::default());
    }

    /// Inserts a freshly created row at the top of the data set.
    pub fn prepend_row(&mut self, row: Row) {
        self.rows.insert(0, row);
        self.state.selected.clear();
        self.recompute();
    }

    /// All loaded rows, in load order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Resolved columns, in display order.
    pub fn columns(&self) -> &[ResolvedColumn] {
        &self.columns
    }

    /// Current view state.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Formatting locale.
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    // -------------------------------------------------------------------------
    // View operations
    // -------------------------------------------------------------------------

    /// Sets the search text and returns to the first page.
    pub fn set_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.update(|state| {
            state.search_text = text;
            state.page = 1;
        });
    }

    /// Sorts by `field`, toggling the direction if it is already the sort
    /// field and starting ascending otherwise.
    pub fn set_sort(&mut self, field: &str) {
        self.update(|state| {
            if state.sort_field.as_deref() == Some(field) {
                state.sort_direction = state.sort_direction.toggled();
            } else {
                state.sort_field = Some(field.to_string());
                state.sort_direction = SortDirection::Ascending;
            }
        });
    }

    /// Removes any sort, restoring load order.
    pub fn clear_sort(&mut self) {
        self.update(|state| {
            state.sort_field = None;
            state.sort_direction = SortDirection::Ascending;
        });
    }

    /// Moves to page `page`, clamped to `[1, total_pages]`.
    pub fn set_page(&mut self, page: usize) {
        self.update(|state| state.page = page);
    }

    /// Moves one page forward, staying on the last page.
    pub fn next_page(&mut self) {
        self.set_page(self.state.page.saturating_add(1));
    }

    /// Moves one page back, staying on the first page.
    pub fn previous_page(&mut self) {
        self.set_page(self.state.page.saturating_sub(1));
    }

    /// Sets rows per page (at least 1) and returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.update(|state| {
            state.page_size = page_size.max(1);
            state.page = 1;
        });
    }

    /// Selects every visible row, or clears the selection.
    pub fn toggle_select_all(&mut self, checked: bool) {
        if checked {
            self.state.selected = (0..self.visible_indices().len()).collect();
        } else {
            self.state.selected.clear();
        }
    }

    /// Selects or deselects one position of the current page.
    ///
    /// Positions outside the page are ignored.
    pub fn toggle_select_row(&mut self, index: usize, checked: bool) {
        if index >= self.visible_indices().len() {
            return;
        }
        if checked {
            self.state.selected.insert(index);
        } else {
            self.state.selected.remove(&index);
        }
    }

    /// Applies a state change, recomputes, and clears the selection when the
    /// visible rows changed.
    fn update(&mut self, change: impl FnOnce(&mut ViewState)) {
        let before = self.visible_indices().to_vec();
        change(&mut self.state);
        self.recompute();
        if self.visible_indices() != before.as_slice() {
            self.state.selected.clear();
        }
    }

    fn recompute(&mut self) {
        let needle = self.state.search_text.to_lowercase();
        let mut order: Vec<usize> = if needle.is_empty() {
            (0..self.rows.len()).collect()
        } else {
            (0..self.rows.len())
                .filter(|&i| self.matches(&self.rows[i], &needle))
                .collect()
        };

        if let Some(field) = &self.state.sort_field {
            let mut keyed: Vec<(usize, String)> = order
                .iter()
                .map(|&i| (i, self.rows[i].get(field).to_display_string()))
                .collect();
            match self.state.sort_direction {
                SortDirection::Ascending => keyed.sort_by(|a, b| a.1.cmp(&b.1)),
                SortDirection::Descending => keyed.sort_by(|a, b| b.1.cmp(&a.1)),
            }
            order = keyed.into_iter().map(|(i, _)| i).collect();
        }

        self.order = order;
        self.state.page = self.state.page.clamp(1, self.total_pages());
    }

    fn matches(&self, row: &Row, needle: &str) -> bool {
        self.columns.iter().any(|column| {
            row.get(&column.descriptor.field)
                .to_display_string()
                .to_lowercase()
                .contains(needle)
        })
    }

    // -------------------------------------------------------------------------
    // Derived values
    // -------------------------------------------------------------------------

    /// Number of rows matching the search.
    pub fn filtered_len(&self) -> usize {
        self.order.len()
    }

    /// Number of pages, at least 1.
    pub fn total_pages(&self) -> usize {
        self.order.len().div_ceil(self.state.page_size).max(1)
    }

    /// Indices into [`rows`](Self::rows) of the current page.
    fn visible_indices(&self) -> &[usize] {
        let start = (self.state.page - 1)
            .saturating_mul(self.state.page_size)
            .min(self.order.len());
        let end = start.saturating_add(self.state.page_size).min(self.order.len());
        &self.order[start..end]
    }

    /// Rows matching the search, in sorted order.
    pub fn sorted_rows(&self) -> Vec<&Row> {
        self.order.iter().map(|&i| &self.rows[i]).collect()
    }

    /// Rows of the current page.
    pub fn visible_rows(&self) -> Vec<&Row> {
        self.visible_indices().iter().map(|&i| &self.rows[i]).collect()
    }

    /// Selected rows of the current page, in page order.
    pub fn selected_rows(&self) -> Vec<&Row> {
        let visible = self.visible_indices();
        self.state
            .selected
            .iter()
            .filter_map(|&pos| visible.get(pos).map(|&i| &self.rows[i]))
            .collect()
    }

    /// `true` if the page has rows and all of them are selected.
    pub fn all_visible_selected(&self) -> bool {
        let visible = self.visible_indices().len();
        visible > 0 && self.state.selected.len() == visible
    }

    /// Column headers with width hints and sort markers.
    pub fn headers(&self) -> Vec<ColumnHeader> {
        self.columns
            .iter()
            .map(|column| ColumnHeader {
                field: column.descriptor.field.clone(),
                label: column.descriptor.label.clone(),
                width: column.rule.width,
                sort: self.state.indicator(&column.descriptor.field),
            })
            .collect()
    }

    /// Cells of the current page, one vector per row in column order.
    pub fn rendered_page(&self) -> Vec<Vec<Cell>> {
        self.visible_indices()
            .iter()
            .map(|&i| {
                let row = &self.rows[i];
                self.columns
                    .iter()
                    .map(|column| {
                        column
                            .rule
                            .render(row.get(&column.descriptor.field), row, &self.locale)
                    })
                    .collect()
            })
            .collect()
    }

    /// Pager entries for the current page.
    pub fn page_items(&self) -> Vec<PageItem> {
        page_items(self.state.page, self.total_pages())
    }

    /// Footer counts.
    pub fn summary(&self) -> TableSummary {
        TableSummary {
            visible: self.visible_indices().len(),
            filtered: self.order.len(),
            total: self.rows.len(),
            selected: self.state.selected.len(),
            page: self.state.page,
            total_pages: self.total_pages(),
        }
    }
}

impl Default for TableEngine {
    fn default() -> Self {
        Self::empty()
    }
}
