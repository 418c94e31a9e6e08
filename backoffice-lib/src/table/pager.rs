//! Truncated page index sequence

/// Pages shown on each side of the current one.
const DELTA: usize = 2;

/// One entry of the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    /// A clickable page number.
    Page(usize),
    /// A gap of one or more hidden pages.
    Ellipsis,
}

/// Builds the pager for `current` out of `total` pages.
///
/// Always shows the first and last page and up to two pages around the
/// current one; hidden runs collapse into an ellipsis.
///
/// # Example
///
/// ```
/// use backoffice_lib::table::{page_items, PageItem::*};
///
/// assert_eq!(
///     page_items(5, 10),
///     vec![Page(1), Ellipsis, Page(3), Page(4), Page(5), Page(6), Page(7), Ellipsis, Page(10)]
/// );
/// ```
pub fn page_items(current: usize, total: usize) -> Vec<PageItem> {
    let total = total.max(1);
    let current = current.clamp(1, total);

    let start = current.saturating_sub(DELTA).max(2);
    let end = (current + DELTA).min(total.saturating_sub(1));

    let mut items = vec![PageItem::Page(1)];
    if current > DELTA + 2 {
        items.push(PageItem::Ellipsis);
    }
    items.extend((start..=end).map(PageItem::Page));
    if current + DELTA + 1 < total {
        items.push(PageItem::Ellipsis);
        items.push(PageItem::Page(total));
    } else if total > 1 {
        items.push(PageItem::Page(total));
    }
    items
}
