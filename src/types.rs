//! Domain types for telesend.
//!
//! Plain data shared by the picker, the catalog builder and the delivery
//! layer. No behavior beyond small constructors and accessors.

use serde::{Deserialize, Serialize};

// ============================================================================
// RECIPIENTS
// ============================================================================

/// A selectable catalog entry.
///
/// `label` is what the picker shows; `target` is the opaque address the
/// delivery layer resolves the label to (a username, phone number or chat id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Display label shown in the picker.
    pub label: String,
    /// Opaque delivery address.
    pub target: String,
}

impl Recipient {
    pub fn new(label: impl Into<String>, target: impl Into<String>) -> Self {
        Recipient {
            label: label.into(),
            target: target.into(),
        }
    }
}

// ============================================================================
// GLYPHS
// ============================================================================

/// Default marker for a chosen row.
pub const DEFAULT_SELECTED_GLYPH: &str = "■";

/// Default marker for a cleared row.
pub const DEFAULT_CLEAR_GLYPH: &str = "□";

/// Default marker for the cursor row.
pub const DEFAULT_CURSOR_GLYPH: &str = "▣";

/// Row markers used by the renderer. Fixed for a whole session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyphs {
    /// Prefix of the row under the cursor.
    pub cursor: String,
    /// Prefix of a chosen row.
    pub selected: String,
    /// Prefix of an unchosen row.
    pub clear: String,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            cursor: DEFAULT_CURSOR_GLYPH.to_string(),
            selected: DEFAULT_SELECTED_GLYPH.to_string(),
            clear: DEFAULT_CLEAR_GLYPH.to_string(),
        }
    }
}

// ============================================================================
// DOCUMENTS
// ============================================================================

/// Coarse media classification of an outgoing document.
///
/// Decides how the receiving service presents the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    /// Anything else is sent as a plain document.
    Document,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Document => "document",
        }
    }
}

// ============================================================================
// REPORTS
// ============================================================================

/// Outcome of delivering one document to a list of recipients.
///
/// Every recipient ends up in exactly one bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    /// Labels of recipients the document reached.
    pub delivered: Vec<String>,
    /// Recipients that failed (label, error message).
    pub failed: Vec<(String, String)>,
    /// Recipients skipped because they had no delivery address.
    pub skipped: Vec<String>,
}

impl DeliveryReport {
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable pretty output.
    #[default]
    Human,
    /// Machine-readable JSON.
    Json,
}

// ============================================================================
// TESTS
// ============================================================================
