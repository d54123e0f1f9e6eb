//! Document loading and per-recipient delivery.
//!
//! The messaging service itself is not spoken to directly: delivery goes
//! through a [`Messenger`], and the shipped implementation hands each
//! recipient to an external client program.
//!
//! Structure:
//! - Pure functions: media sniffing
//! - Document loading (effect)
//! - Messenger trait + command-backed implementation
//! - Delivery loop: one failure never stops the rest

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use infer::MatcherType;

use crate::config::Auth;
use crate::types::{DeliveryReport, MediaKind, Recipient};

// ============================================================================
// MEDIA SNIFFING
// ============================================================================

/// Fallback MIME type for unrecognized content.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Identify content from its leading bytes.
///
/// Video and audio containers map to their own kinds. Everything else,
/// recognized or not, is sent as a document.
pub fn sniff(bytes: &[u8]) -> (MediaKind, &'static str) {
    let Some(found) = infer::get(bytes) else {
        return (MediaKind::Document, OCTET_STREAM);
    };

    let kind = match found.matcher_type() {
        MatcherType::Video => MediaKind::Video,
        MatcherType::Audio => MediaKind::Audio,
        _ => MediaKind::Document,
    };
    (kind, found.mime_type())
}

// ============================================================================
// DOCUMENT
// ============================================================================

/// A file ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Base name shown to recipients.
    pub filename: String,
    /// Caption sent alongside the file (may be empty).
    pub caption: String,
    pub mime: &'static str,
    pub kind: MediaKind,
    pub size_bytes: u64,
}

impl Document {
    /// Read `path`, name it after its base name and classify its content.
    pub fn load(path: &Path, caption: &str) -> io::Result<Self> {
        let path = std::path::absolute(path)?;
        let bytes = fs::read(&path)?;

        let filename = path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Not a file name: {}", path.display()),
                )
            })?
            .to_string();

        let (kind, mime) = sniff(&bytes);
        tracing::debug!(%filename, mime, kind = kind.as_str(), "document loaded");

        Ok(Document {
            filename,
            caption: caption.to_string(),
            mime,
            kind,
            size_bytes: bytes.len() as u64,
            path,
        })
    }
}

// ============================================================================
// MESSENGER
// ============================================================================

/// Why a single recipient did not get the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The client program could not be started.
    Spawn { program: String, message: String },
    /// The client program ran and reported failure.
    Rejected { code: Option<i32>, stderr: String },
}

impl std::fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryError::Spawn { program, message } => {
                write!(f, "could not run {}: {}", program, message)
            }
            DeliveryError::Rejected { code, stderr } => {
                match code {
                    Some(code) => write!(f, "client exited with status {}", code)?,
                    None => write!(f, "client terminated by signal")?,
                }
                if !stderr.is_empty() {
                    write!(f, ": {}", stderr)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for DeliveryError {}

/// Sends a document to one resolved address.
pub trait Messenger {
    fn send(&mut self, recipient: &Recipient, document: &Document) -> Result<(), DeliveryError>;
}

/// Delivers by running an external client once per recipient.
///
/// Invocation: `<program> <args…> <target> <document path>`, with the
/// document metadata and credentials in `TELESEND_*` environment variables.
#[derive(Debug, Clone)]
pub struct CommandMessenger {
    program: OsString,
    args: Vec<OsString>,
    auth: Auth,
}

impl CommandMessenger {
    pub fn new(program: impl Into<OsString>, args: Vec<OsString>, auth: Auth) -> Self {
        CommandMessenger {
            program: program.into(),
            args,
            auth,
        }
    }

    /// The command for one recipient, not yet spawned.
    pub fn command(&self, recipient: &Recipient, document: &Document) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg(&recipient.target)
            .arg(&document.path)
            .env("TELESEND_CAPTION", &document.caption)
            .env("TELESEND_FILENAME", &document.filename)
            .env("TELESEND_MIME", document.mime)
            .env("TELESEND_MEDIA_KIND", document.kind.as_str())
            .env("TELESEND_APP_ID", self.auth.app_id.to_string())
            .env("TELESEND_APP_HASH", &self.auth.app_hash)
            .env("TELESEND_PHONE", &self.auth.phone_number)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }
}

impl Messenger for CommandMessenger {
    fn send(&mut self, recipient: &Recipient, document: &Document) -> Result<(), DeliveryError> {
        let output = self
            .command(recipient, document)
            .output()
            .map_err(|e| DeliveryError::Spawn {
                program: self.program.to_string_lossy().into_owned(),
                message: e.to_string(),
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(DeliveryError::Rejected {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

// ============================================================================
// DELIVERY LOOP
// ============================================================================

/// Send `document` to every recipient in order.
///
/// Each recipient is independent: a failure is recorded and the loop moves
/// on. Recipients without an address are skipped. `on_progress` runs once
/// per recipient after its attempt.
pub fn deliver_all<M, F>(
    messenger: &mut M,
    recipients: &[&Recipient],
    document: &Document,
    mut on_progress: F,
) -> DeliveryReport
where
    M: Messenger + ?Sized,
    F: FnMut(&Recipient),
{
    let mut report = DeliveryReport::default();

    for &recipient in recipients {
        if recipient.target.is_empty() {
            tracing::warn!(label = %recipient.label, "no address, skipped");
            report.skipped.push(recipient.label.clone());
        } else {
            match messenger.send(recipient, document) {
                Ok(()) => {
                    tracing::info!(label = %recipient.label, "delivered");
                    report.delivered.push(recipient.label.clone());
                }
                Err(e) => {
                    tracing::warn!(label = %recipient.label, error = %e, "delivery failed");
                    report.failed.push((recipient.label.clone(), e.to_string()));
                }
            }
        }
        on_progress(recipient);
    }

    report
}

// ============================================================================
// TESTS
// ============================================================================
