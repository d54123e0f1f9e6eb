//! Picker state algebra: pure types, zero effects.
//!
//! The whole interactive session is one [`Picker`] value plus the
//! [`Action`] stream applied to it. The transition function consumes the
//! picker and either hands it back ([`Transition::Continue`]) or ends the
//! session with an [`Outcome`], after which the picker is gone.
//!
//! Invariants held by every `Picker` reachable through `update`:
//! - `selected.len() == items.len()`
//! - `cursor < paginator.items_on_page()` when the page is non-empty,
//!   `cursor == 0` when it is empty

use crate::pagination::Paginator;
use crate::types::Recipient;

// ============================================================================
// PICKER
// ============================================================================

/// Selection session over an ordered, immutable list of labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    /// Catalog labels in caller order.
    pub(crate) items: Vec<String>,
    /// Chosen flag per catalog index.
    pub(crate) selected: Vec<bool>,
    /// Active page.
    pub(crate) paginator: Paginator,
    /// Row within the active page.
    pub(crate) cursor: usize,
}

impl Picker {
    /// Fresh session: first page, cursor on the first row, nothing chosen.
    pub fn new(items: Vec<String>, page_size: usize) -> Self {
        let paginator = Paginator::new(items.len(), page_size);
        Picker {
            selected: vec![false; items.len()],
            items,
            paginator,
            cursor: 0,
        }
    }

    /// Build from recipients, keeping their order.
    pub fn from_recipients(recipients: &[Recipient], page_size: usize) -> Self {
        let labels = recipients.iter().map(|r| r.label.clone()).collect();
        Self::new(labels, page_size)
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    /// Cursor row relative to the active page.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Catalog index under the cursor, or None on an empty page.
    pub fn cursor_index(&self) -> Option<usize> {
        let (start, end) = self.paginator.bounds();
        let index = start + self.cursor;
        (index < end).then_some(index)
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.get(index).copied().unwrap_or(false)
    }

    /// Chosen catalog indices across all pages, ascending.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.selected
            .iter()
            .enumerate()
            .filter_map(|(i, &chosen)| chosen.then_some(i))
            .collect()
    }

    /// Rows of the active page: (row, label, chosen).
    pub fn page_rows(&self) -> impl Iterator<Item = (usize, &str, bool)> + '_ {
        let range = self.paginator.range();
        let start = range.start;
        self.items[range]
            .iter()
            .enumerate()
            .map(move |(row, label)| (row, label.as_str(), self.is_selected(start + row)))
    }
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Semantic user action, decoupled from raw key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move the cursor one row down, wrapping onto the next page.
    MoveDown,
    /// Move the cursor one row up, wrapping onto the previous page.
    MoveUp,
    /// Flip the row under the cursor.
    ToggleSelection,
    /// Jump to the next page.
    NextPage,
    /// Jump to the previous page.
    PrevPage,
    /// Accept the current selection.
    Confirm,
    /// Abandon the session.
    Quit,
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Confirmed with these catalog indices (ascending).
    Accepted(Vec<usize>),
    /// Cancelled; any toggles are discarded.
    Cancelled,
}

impl Outcome {
    /// Indices to act on. Always empty for a cancelled session.
    pub fn indices(&self) -> &[usize] {
        match self {
            Outcome::Accepted(indices) => indices,
            Outcome::Cancelled => &[],
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    /// Map the chosen indices back onto the recipients the picker was built from.
    pub fn resolve<'a>(&self, recipients: &'a [Recipient]) -> Vec<&'a Recipient> {
        self.indices()
            .iter()
            .filter_map(|&i| recipients.get(i))
            .collect()
    }
}

/// Result of a pure state transition.
#[derive(Debug, PartialEq)]
pub enum Transition {
    /// Keep going with this state.
    Continue(Picker),
    /// Session over.
    Finish(Outcome),
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        ["Alice", "Bob", "Carol", "Dave", "Eve"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn new_picker_starts_cleared_on_first_row() {
        let picker = Picker::new(names(), 2);
        assert_eq!(picker.cursor(), 0);
        assert_eq!(picker.paginator().page(), 0);
        assert_eq!(picker.paginator().total_pages(), 3);
        assert!(picker.selected_indices().is_empty());
        assert_eq!(picker.selected.len(), 5);
        assert_eq!(picker.cursor_index(), Some(0));
    }

    #[test]
    fn empty_picker_has_no_cursor_index() {
        let picker = Picker::new(Vec::new(), 10);
        assert_eq!(picker.cursor_index(), None);
        assert_eq!(picker.page_rows().count(), 0);
    }

    #[test]
    fn page_rows_are_page_relative() {
        let mut picker = Picker::new(names(), 2);
        picker.paginator.next_page();
        picker.selected[3] = true;
        let rows: Vec<_> = picker.page_rows().collect();
        assert_eq!(rows, vec![(0, "Carol", false), (1, "Dave", true)]);
    }

    #[test]
    fn cancelled_outcome_has_no_indices() {
        assert!(Outcome::Cancelled.indices().is_empty());
        assert!(Outcome::Cancelled.is_cancelled());
        assert_eq!(Outcome::Accepted(vec![1, 4]).indices(), &[1, 4]);
    }

    #[test]
    fn outcome_resolves_to_recipients() {
        let recipients = vec![
            Recipient::new("Alice", "alice"),
            Recipient::new("Bob", "+100"),
            Recipient::new("Crew", "42"),
        ];
        let outcome = Outcome::Accepted(vec![0, 2]);
        let resolved: Vec<&str> = outcome
            .resolve(&recipients)
            .into_iter()
            .map(|r| r.target.as_str())
            .collect();
        assert_eq!(resolved, vec!["alice", "42"]);
    }

    #[test]
    fn from_recipients_keeps_order() {
        let recipients = vec![Recipient::new("Zed", "z"), Recipient::new("Amy", "a")];
        let picker = Picker::from_recipients(&recipients, 10);
        assert_eq!(picker.items(), &["Zed".to_string(), "Amy".to_string()]);
    }
}
