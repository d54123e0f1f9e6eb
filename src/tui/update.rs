//! Pure state transitions: (Picker, Action) → Transition.
//!
//! This is the core logic of the picker. Fully testable without a terminal.
//! Every action is total: moves saturate at the catalog edges and toggling
//! an empty page does nothing.

use super::state::{Action, Outcome, Picker, Transition};

/// Pure state transition function.
///
/// Consumes the picker so a finished session cannot be resumed.
pub fn update(picker: Picker, action: &Action) -> Transition {
    match action {
        Action::Quit => Transition::Finish(Outcome::Cancelled),
        Action::Confirm => Transition::Finish(Outcome::Accepted(picker.selected_indices())),
        Action::ToggleSelection => Transition::Continue(toggle(picker)),
        Action::MoveDown => Transition::Continue(move_down(picker)),
        Action::MoveUp => Transition::Continue(move_up(picker)),
        Action::NextPage => Transition::Continue(next_page(picker)),
        Action::PrevPage => Transition::Continue(prev_page(picker)),
    }
}

// ============================================================================
// PER-ACTION HANDLERS
// ============================================================================

/// Last valid cursor row on the active page (0 on an empty page).
fn last_row(picker: &Picker) -> usize {
    picker.paginator.items_on_page().saturating_sub(1)
}

fn toggle(mut picker: Picker) -> Picker {
    if let Some(index) = picker.cursor_index()
        && let Some(chosen) = picker.selected.get_mut(index)
    {
        *chosen = !*chosen;
    }
    picker
}

/// Down: next row, or first row of the next page. On the last row of the
/// last page the cursor stays put.
fn move_down(mut picker: Picker) -> Picker {
    let next = picker.cursor + 1;
    if next < picker.paginator.items_on_page() {
        picker.cursor = next;
    } else if picker.paginator.next_page() {
        picker.cursor = 0;
    } else {
        picker.cursor = last_row(&picker);
    }
    picker
}

/// Up: previous row, or the last real row of the previous page. On the
/// first row of the first page the cursor stays at 0.
fn move_up(mut picker: Picker) -> Picker {
    if picker.cursor > 0 {
        picker.cursor -= 1;
    } else if picker.paginator.prev_page() {
        picker.cursor = last_row(&picker);
    } else {
        picker.cursor = 0;
    }
    picker
}

/// Page jumps keep the cursor row, clamped to the destination page.
fn next_page(mut picker: Picker) -> Picker {
    picker.paginator.next_page();
    picker.cursor = picker.cursor.min(last_row(&picker));
    picker
}

fn prev_page(mut picker: Picker) -> Picker {
    picker.paginator.prev_page();
    picker.cursor = picker.cursor.min(last_row(&picker));
    picker
}

// ============================================================================
// TESTS
// ============================================================================
