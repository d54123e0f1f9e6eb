//! User configuration: credentials, page size and checklist glyphs.
//!
//! Stored as TOML in `~/.telesend/config.toml`. Section names match the
//! files written by earlier releases (`[Auth]`, `[General]`, `[Misc]`);
//! lowercase spellings are accepted on read.
//!
//! Structure:
//! - Types + defaults (pure)
//! - Path resolution
//! - Effect functions: load, save, first-run prompt

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::types::{
    DEFAULT_CLEAR_GLYPH, DEFAULT_CURSOR_GLYPH, DEFAULT_SELECTED_GLYPH, Glyphs,
};

/// Config directory name under the home directory.
pub const CONFIG_DIR_NAME: &str = ".telesend";

/// Config filename within the config directory.
pub const CONFIG_FILENAME: &str = "config.toml";

// ============================================================================
// TYPES
// ============================================================================

/// Complete configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "Auth", alias = "auth", default)]
    pub auth: Auth,
    #[serde(rename = "General", alias = "general", default)]
    pub general: General,
    #[serde(rename = "Misc", alias = "misc", default)]
    pub misc: Misc,
}

/// Messaging service credentials. Handed to the delivery program untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Auth {
    pub app_id: i64,
    pub app_hash: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct General {
    /// Picker page size. Must be at least 1.
    pub contacts_per_page: usize,
}

impl Default for General {
    fn default() -> Self {
        Self {
            contacts_per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Checklist glyphs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Misc {
    pub checkbox_selected: String,
    pub checkbox_clear: String,
    pub cursor: String,
}

impl Default for Misc {
    fn default() -> Self {
        Self {
            checkbox_selected: DEFAULT_SELECTED_GLYPH.to_string(),
            checkbox_clear: DEFAULT_CLEAR_GLYPH.to_string(),
            cursor: DEFAULT_CURSOR_GLYPH.to_string(),
        }
    }
}

impl Config {
    /// New config with the given credentials and default everything else.
    pub fn with_auth(auth: Auth) -> Self {
        Config {
            auth,
            ..Default::default()
        }
    }

    pub fn page_size(&self) -> usize {
        self.general.contacts_per_page
    }

    pub fn glyphs(&self) -> Glyphs {
        Glyphs {
            cursor: self.misc.cursor.clone(),
            selected: self.misc.checkbox_selected.clone(),
            clear: self.misc.checkbox_clear.clone(),
        }
    }

    /// Reject values the picker cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.general.contacts_per_page == 0 {
            return Err(ConfigError::Invalid(
                "contacts-per-page must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Error while resolving, reading or writing the config.
#[derive(Debug)]
pub enum ConfigError {
    /// Could not determine home directory.
    HomeNotFound,
    /// No config file at this path yet.
    NotFound { path: PathBuf },
    /// Filesystem error on this path.
    Io { path: PathBuf, source: io::Error },
    /// File exists but is not valid TOML for [`Config`].
    Parse { path: PathBuf, message: String },
    /// Config could not be encoded.
    Serialize(String),
    /// Parsed, but a value is out of range.
    Invalid(String),
    /// First-run prompt got unusable input.
    Prompt(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::HomeNotFound => write!(f, "Could not determine home directory"),
            ConfigError::NotFound { path } => {
                write!(f, "No config file at {}", path.display())
            }
            ConfigError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            ConfigError::Parse { path, message } => {
                write!(f, "Error parsing config file {}: {}", path.display(), message)
            }
            ConfigError::Serialize(message) => {
                write!(f, "Failed to serialize config: {}", message)
            }
            ConfigError::Invalid(message) => write!(f, "Invalid config: {}", message),
            ConfigError::Prompt(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
// PATHS
// ============================================================================

/// `~/.telesend`
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Explicit path if given, else `~/.telesend/config.toml`.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(default_config_dir()?.join(CONFIG_FILENAME)),
    }
}

// ============================================================================
// EFFECT FUNCTIONS
// ============================================================================

/// Read and validate the config at `path`.
///
/// A missing file is reported as [`ConfigError::NotFound`] so callers can
/// fall back to the first-run prompt.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    config.validate()?;

    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Write `config` to `path`, creating the parent directory if needed.
///
/// On unix a directory created here is private (0700) and the file is 0600,
/// since it holds credentials. An existing parent keeps its mode.
pub fn save(config: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = config.to_toml()?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        create_private_dir(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    restrict_permissions(path, 0o600)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path, mode: u32) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|source| {
        ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path, _mode: u32) -> Result<(), ConfigError> {
    Ok(())
}

/// Ask for credentials on `input`, writing prompts to `output`.
///
/// The app id must be an integer; trailing newlines are stripped.
pub fn prompt_auth<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<Auth, ConfigError> {
    let app_id = ask(input, output, "Enter app ID: ")?;
    let app_hash = ask(input, output, "Enter app hash: ")?;
    let phone_number = ask(input, output, "Enter phone number: ")?;

    let app_id = app_id.parse::<i64>().map_err(|_| {
        ConfigError::Prompt("Invalid app ID: cannot convert string to int".to_string())
    })?;

    Ok(Auth {
        app_id,
        app_hash,
        phone_number,
    })
}

fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<String, ConfigError> {
    let prompt_err = |e: io::Error| ConfigError::Prompt(e.to_string());

    output.write_all(prompt.as_bytes()).map_err(prompt_err)?;
    output.flush().map_err(prompt_err)?;

    let mut line = String::new();
    input.read_line(&mut line).map_err(prompt_err)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// First run: prompt for credentials, write a config with defaults.
pub fn create_interactive<R: BufRead, W: Write>(
    path: &Path,
    input: &mut R,
    output: &mut W,
) -> Result<Config, ConfigError> {
    let auth = prompt_auth(input, output)?;
    let config = Config::with_auth(auth);
    save(&config, path)?;
    writeln!(output, "Config saved in {}", path.display())
        .map_err(|e| ConfigError::Prompt(e.to_string()))?;
    Ok(config)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn defaults_match_first_run_values() {
        let config = Config::default();
        assert_eq!(config.page_size(), 10);
        assert_eq!(config.glyphs(), Glyphs::default());
    }

    #[test]
    fn parses_legacy_section_names() {
        let toml = r#"
[Auth]
app-id = 12345
app-hash = "abcdef"
phone-number = "+15550100"

[General]
contacts-per-page = 4

[Misc]
checkbox-selected = "x"
checkbox-clear = "o"
cursor = ">"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.auth.app_id, 12345);
        assert_eq!(config.auth.phone_number, "+15550100");
        assert_eq!(config.page_size(), 4);
        assert_eq!(config.glyphs().cursor, ">");
        assert_eq!(config.glyphs().clear, "o");
    }

    #[test]
    fn accepts_lowercase_sections_and_missing_keys() {
        let toml = "[general]\ncontacts-per-page = 3\n";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.page_size(), 3);
        assert_eq!(config.misc, Misc::default());
        assert_eq!(config.auth, Auth::default());
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[General]\ncontacts-per-page = 0\n").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[General\ncontacts-per-page = ").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("Error parsing config file"));
    }

    #[test]
    fn save_then_load_restores_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::with_auth(Auth {
            app_id: 7,
            app_hash: "hash".to_string(),
            phone_number: "+1".to_string(),
        });
        config.general.contacts_per_page = 25;

        save(&config, &path).unwrap();
        assert_eq!(load(&path).unwrap(), config);
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg").join("config.toml");
        save(&Config::default(), &path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        let dir_mode = fs::metadata(path.parent().unwrap()).unwrap().permissions().mode();
        assert_eq!(dir_mode & 0o777, 0o700);
    }

    #[cfg(unix)]
    #[test]
    fn existing_parent_keeps_its_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let shared = dir.path().join("shared");
        fs::create_dir(&shared).unwrap();
        fs::set_permissions(&shared, fs::Permissions::from_mode(0o755)).unwrap();

        save(&Config::default(), &shared.join("telesend.toml")).unwrap();

        let mode = fs::metadata(&shared).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn prompt_reads_three_lines() {
        let mut input = Cursor::new("42\nsecret\n+15550100\n");
        let mut output = Vec::new();

        let auth = prompt_auth(&mut input, &mut output).unwrap();
        assert_eq!(auth.app_id, 42);
        assert_eq!(auth.app_hash, "secret");
        assert_eq!(auth.phone_number, "+15550100");

        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("Enter app ID: "));
        assert!(shown.contains("Enter phone number: "));
    }

    #[test]
    fn prompt_rejects_non_numeric_app_id() {
        let mut input = Cursor::new("abc\nsecret\n+1\n");
        let mut output = Vec::new();

        let err = prompt_auth(&mut input, &mut output).unwrap_err();
        assert_eq!(err.to_string(), "Invalid app ID: cannot convert string to int");
    }

    #[test]
    fn create_interactive_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut input = Cursor::new("1\nh\np\r\n");
        let mut output = Vec::new();

        let config = create_interactive(&path, &mut input, &mut output).unwrap();
        assert_eq!(config.auth.phone_number, "p");
        assert_eq!(config.page_size(), 10);
        assert_eq!(load(&path).unwrap(), config);
    }

    #[test]
    fn explicit_path_wins() {
        let path = resolve_config_path(Some(Path::new("/tmp/x.toml"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/x.toml"));
    }
}
