//! Table view state

use std::collections::BTreeSet;

/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes offered to the user.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 20, 50];

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Sort marker shown in a column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortIndicator {
    Unsorted,
    Ascending,
    Descending,
}

/// The table's search, sort, page and selection settings.
///
/// Selection holds positions within the current page, not row identities, so
/// it is cleared whenever the page contents change and never survives a
/// data reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Case-insensitive substring filter.
    pub search_text: String,
    /// Field rows are sorted by, if any.
    pub sort_field: Option<String>,
    /// Direction of the sort.
    pub sort_direction: SortDirection,
    /// Current page, 1-based.
    pub page: usize,
    /// Rows per page, at least 1.
    pub page_size: usize,
    /// Selected positions within the visible page.
    pub selected: BTreeSet<usize>,
}

impl ViewState {
    /// Initial state with the given page size.
    pub fn new(page_size: usize) -> Self {
        Self {
            search_text: String::new(),
            sort_field: None,
            sort_direction: SortDirection::Ascending,
            page: 1,
            page_size: page_size.max(1),
            selected: BTreeSet::new(),
        }
    }

    /// Header marker for a field.
    pub fn indicator(&self, field: &str) -> SortIndicator {
        match &self.sort_field {
            Some(sorted) if sorted == field => match self.sort_direction {
                SortDirection::Ascending => SortIndicator::Ascending,
                SortDirection::Descending => SortIndicator::Descending,
            },
            _ => SortIndicator::Unsorted,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
