//! Pure rendering: map picker state to text.
//!
//! [`render_frame`] is the whole picker as a plain string, with no terminal
//! involved, so golden-frame tests can compare it directly. [`render`] only
//! places that text on a ratatui frame under a title line.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::text::{Line, Text};
use ratatui::widgets::Paragraph;

use crate::types::Glyphs;

use super::state::Picker;

/// Title shown above the checklist.
pub const TITLE: &str = "Send to...";

/// Key legend, last line of every frame.
pub const LEGEND: &str =
    "h/l ←/→: page • j/k ↑/↓: item • space: toggle • enter: confirm • esc q: quit";

// ============================================================================
// FRAME TEXT
// ============================================================================

/// Render the active page as text.
///
/// Layout, one `\n`-terminated line each:
/// - one `<marker> <label>` row per item on the page
/// - blank rows up to the page size, so short pages keep the same height
/// - a blank line, `[page/pages]`, a blank line, the legend
pub fn render_frame(picker: &Picker, glyphs: &Glyphs) -> String {
    let mut out = String::new();
    let paginator = picker.paginator();

    let mut rows = 0;
    for (row, label, chosen) in picker.page_rows() {
        out.push_str(marker(row == picker.cursor(), chosen, glyphs));
        out.push(' ');
        out.push_str(label);
        out.push('\n');
        rows += 1;
    }

    for _ in rows..paginator.page_size() {
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&page_indicator(paginator.page(), paginator.total_pages()));
    out.push_str("\n\n");
    out.push_str(LEGEND);
    out.push('\n');
    out
}

/// Cursor marker wins over the selection state of its row.
fn marker<'a>(is_cursor: bool, chosen: bool, glyphs: &'a Glyphs) -> &'a str {
    if is_cursor {
        glyphs.cursor.as_str()
    } else if chosen {
        glyphs.selected.as_str()
    } else {
        glyphs.clear.as_str()
    }
}

/// `[current/total]`, 1-based.
pub fn page_indicator(page: usize, total_pages: usize) -> String {
    format!("[{}/{}]", page + 1, total_pages)
}

// ============================================================================
// TERMINAL
// ============================================================================

/// Draw the picker on a ratatui frame: title, blank line, frame text.
pub fn render(picker: &Picker, glyphs: &Glyphs, frame: &mut Frame) {
    let chunks = Layout::vertical([
        Constraint::Length(2), // title + gap
        Constraint::Min(0),    // checklist
    ])
    .split(frame.area());

    frame.render_widget(Paragraph::new(Line::from(TITLE)), chunks[0]);

    let body = Text::from(render_frame(picker, glyphs));
    frame.render_widget(Paragraph::new(body), chunks[1]);
}

// ============================================================================
// TESTS
// ============================================================================
