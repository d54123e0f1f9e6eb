//! Report formatting for picker and delivery results.
//!
//! Pure functions: (data, OutputFormat) → String.
//! No I/O, no side effects.

use humansize::{BINARY, format_size};
use serde::Serialize;

use crate::dispatch::Document;
use crate::tui::Outcome;
use crate::types::{DeliveryReport, MediaKind, OutputFormat, Recipient};

// ============================================================================
// SELECTION
// ============================================================================

/// Format the picker outcome with its resolved recipients.
pub fn format_selection(
    outcome: &Outcome,
    recipients: &[&Recipient],
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Human => selection_human(outcome, recipients),
        OutputFormat::Json => {
            let doc = SelectionJson {
                status: if outcome.is_cancelled() { "cancelled" } else { "accepted" },
                recipients,
            };
            to_json(&doc)
        }
    }
}

#[derive(Serialize)]
struct SelectionJson<'a> {
    status: &'static str,
    recipients: &'a [&'a Recipient],
}

fn selection_human(outcome: &Outcome, recipients: &[&Recipient]) -> String {
    if outcome.is_cancelled() {
        return "Selection cancelled.\n".to_string();
    }
    if recipients.is_empty() {
        return "No recipients selected.\n".to_string();
    }

    let mut out = format!("Selected {} recipient(s):\n", recipients.len());
    for recipient in recipients {
        out.push_str(&format!("  {} → {}\n", recipient.label, recipient.target));
    }
    out
}

// ============================================================================
// DELIVERY
// ============================================================================

/// Format a delivery report for the document that was sent.
pub fn format_delivery(
    report: &DeliveryReport,
    document: &Document,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Human => delivery_human(report, document),
        OutputFormat::Json => {
            let doc = DeliveryJson {
                file: &document.filename,
                size_bytes: document.size_bytes,
                mime: document.mime,
                kind: document.kind,
                delivered: &report.delivered,
                failed: report
                    .failed
                    .iter()
                    .map(|(label, error)| FailureJson { label, error })
                    .collect(),
                skipped: &report.skipped,
            };
            to_json(&doc)
        }
    }
}

#[derive(Serialize)]
struct DeliveryJson<'a> {
    file: &'a str,
    size_bytes: u64,
    mime: &'a str,
    kind: MediaKind,
    delivered: &'a [String],
    failed: Vec<FailureJson<'a>>,
    skipped: &'a [String],
}

#[derive(Serialize)]
struct FailureJson<'a> {
    label: &'a str,
    error: &'a str,
}

fn delivery_human(report: &DeliveryReport, document: &Document) -> String {
    let attempted = report.delivered.len() + report.failed.len() + report.skipped.len();

    let mut out = format!(
        "Sent {} ({}, {}) to {} of {} recipient(s)\n",
        document.filename,
        format_size(document.size_bytes, BINARY),
        document.kind.as_str(),
        report.delivered.len(),
        attempted
    );
    for label in &report.delivered {
        out.push_str(&format!("  ✓ {}\n", label));
    }
    for (label, error) in &report.failed {
        out.push_str(&format!("  ✗ {}: {}\n", label, error));
    }
    for label in &report.skipped {
        out.push_str(&format!("  - {} (no address)\n", label));
    }
    out
}

// ============================================================================
// JSON
// ============================================================================

fn to_json<T: Serialize>(value: &T) -> String {
    match serde_json::to_string_pretty(value) {
        Ok(json) => json + "\n",
        Err(e) => format!("{{\"error\": {:?}}}\n", e.to_string()),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn document() -> Document {
        Document {
            path: PathBuf::from("/tmp/clip.mp4"),
            filename: "clip.mp4".to_string(),
            caption: String::new(),
            mime: "video/mp4",
            kind: MediaKind::Video,
            size_bytes: 2048,
        }
    }

    fn sample_report() -> DeliveryReport {
        DeliveryReport {
            delivered: vec!["Alice".to_string()],
            failed: vec![("Bob".to_string(), "peer not found".to_string())],
            skipped: vec!["Ghost".to_string()],
        }
    }

    #[test]
    fn human_selection_lists_labels_and_targets() {
        let alice = Recipient::new("Alice", "alice");
        let out = format_selection(&Outcome::Accepted(vec![0]), &[&alice], OutputFormat::Human);
        assert_eq!(out, "Selected 1 recipient(s):\n  Alice → alice\n");
    }

    #[test]
    fn human_selection_cancelled() {
        let out = format_selection(&Outcome::Cancelled, &[], OutputFormat::Human);
        assert_eq!(out, "Selection cancelled.\n");
    }

    #[test]
    fn human_selection_empty_acceptance() {
        let out = format_selection(&Outcome::Accepted(Vec::new()), &[], OutputFormat::Human);
        assert_eq!(out, "No recipients selected.\n");
    }

    #[test]
    fn json_selection_has_status_and_recipients() {
        let carol = Recipient::new("Carol", "77");
        let out = format_selection(&Outcome::Accepted(vec![2]), &[&carol], OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["status"], "accepted");
        assert_eq!(parsed["recipients"][0]["label"], "Carol");
        assert_eq!(parsed["recipients"][0]["target"], "77");
    }

    #[test]
    fn json_selection_cancelled_is_empty() {
        let out = format_selection(&Outcome::Cancelled, &[], OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["status"], "cancelled");
        assert_eq!(parsed["recipients"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn human_delivery_summarizes_each_bucket() {
        let out = format_delivery(&sample_report(), &document(), OutputFormat::Human);
        assert!(out.starts_with("Sent clip.mp4 (2 KiB, video) to 1 of 3 recipient(s)\n"));
        assert!(out.contains("  ✓ Alice\n"));
        assert!(out.contains("  ✗ Bob: peer not found\n"));
        assert!(out.contains("  - Ghost (no address)\n"));
    }

    #[test]
    fn json_delivery_has_expected_fields() {
        let out = format_delivery(&sample_report(), &document(), OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["file"], "clip.mp4");
        assert_eq!(parsed["kind"], "video");
        assert_eq!(parsed["size_bytes"], 2048);
        assert_eq!(parsed["failed"][0]["error"], "peer not found");
        assert_eq!(parsed["skipped"][0], "Ghost");
    }
}
