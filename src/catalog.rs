//! Catalog building: turn a directory export into ordered recipients.
//!
//! The export is a JSON document listing the account owner and the
//! dialogs visible to them, in the order the service returned them:
//!
//! ```json
//! {
//!   "me": { "id": 1, "first_name": "Ann", "last_name": "", "username": "ann" },
//!   "dialogs": [
//!     { "kind": "user", "id": 2, "first_name": "Bob", "last_name": "Lee", "phone": "+1555" },
//!     { "kind": "chat", "id": 77, "title": "Book club" }
//!   ]
//! }
//! ```
//!
//! Structure:
//! - Types (serde)
//! - Pure labelling + ordering rules
//! - Effect function: read from disk

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;

use crate::types::Recipient;

// ============================================================================
// TYPES
// ============================================================================

/// A person account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub phone: String,
}

/// One conversation in the export.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Dialog {
    /// Direct conversation with a user.
    User(User),
    /// Group chat.
    Chat { id: i64, title: String },
}

/// Full export: the owner plus their dialogs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Directory {
    #[serde(default)]
    pub me: Option<User>,
    #[serde(default)]
    pub dialogs: Vec<Dialog>,
}

// ============================================================================
// PURE FUNCTIONS
// ============================================================================

/// "First Last", or just "First" without a last name.
pub fn full_name(user: &User) -> String {
    format!("{} {}", user.first_name, user.last_name)
        .trim()
        .to_string()
}

/// Label of the account owner, always listed first.
pub fn self_label(user: &User) -> String {
    format!("{} (you)", full_name(user))
}

/// Where a direct message to `user` goes: username, else phone number.
pub fn user_target(user: &User) -> &str {
    if user.username.is_empty() {
        &user.phone
    } else {
        &user.username
    }
}

/// Ordered recipients for the picker.
///
/// The owner comes first, then dialogs in export order. The owner's own
/// dialog is skipped. Labels are unique: later duplicates are dropped.
pub fn build_catalog(directory: &Directory) -> Vec<Recipient> {
    let mut recipients = Vec::with_capacity(directory.dialogs.len() + 1);

    if let Some(me) = &directory.me {
        recipients.push(Recipient::new(self_label(me), me.username.clone()));
    }

    let my_id = directory.me.as_ref().map(|me| me.id);
    for dialog in &directory.dialogs {
        match dialog {
            Dialog::User(user) => {
                if Some(user.id) == my_id {
                    continue;
                }
                recipients.push(Recipient::new(full_name(user), user_target(user)));
            }
            Dialog::Chat { id, title } => {
                recipients.push(Recipient::new(title.clone(), id.to_string()));
            }
        }
    }

    dedup_labels(recipients)
}

/// Keep the first recipient for each label.
pub fn dedup_labels(recipients: Vec<Recipient>) -> Vec<Recipient> {
    let mut seen = HashSet::new();
    recipients
        .into_iter()
        .filter(|r| {
            let fresh = seen.insert(r.label.clone());
            if !fresh {
                tracing::warn!(label = %r.label, target = %r.target, "duplicate label dropped");
            }
            fresh
        })
        .collect()
}

// ============================================================================
// EFFECT FUNCTIONS
// ============================================================================

/// Parse a directory export.
pub fn parse_directory(json: &str) -> io::Result<Directory> {
    serde_json::from_str(json).map_err(|e| {
        io::Error::new(io::ErrorKind::InvalidData, format!("Invalid catalog: {}", e))
    })
}

/// Read a directory export and build the recipient list.
pub fn load_catalog(path: &Path) -> io::Result<Vec<Recipient>> {
    let content = fs::read_to_string(path)?;
    let directory = parse_directory(&content)?;
    let recipients = build_catalog(&directory);
    tracing::info!(
        path = %path.display(),
        dialogs = directory.dialogs.len(),
        recipients = recipients.len(),
        "catalog loaded"
    );
    Ok(recipients)
}

// ============================================================================
// TESTS
// ============================================================================
