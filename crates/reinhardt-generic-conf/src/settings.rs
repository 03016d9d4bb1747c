//! Settings for the admin extensions
//!
//! Settings are read from a TOML file, then overridden by environment
//! variables prefixed with [`ENV_PREFIX`]:
//!
//! | Variable | Setting |
//! |----------|---------|
//! | `REINHARDT_GENERIC_DATABASE_URL` | `database_url` |
//! | `REINHARDT_GENERIC_ADMIN_SITE_NAME` | `admin.site_name` |
//! | `REINHARDT_GENERIC_ADMIN_URL_PREFIX` | `admin.url_prefix` |
//! | `REINHARDT_GENERIC_ADMIN_TEMPLATE_DIRS` | `admin.template_dirs` (comma-separated) |
//! | `REINHARDT_GENERIC_ADMIN_MAX_BATCH_SIZE` | `admin.max_batch_size` |
//! | `REINHARDT_GENERIC_LOG_LEVEL` | `logging.level` |
//! | `REINHARDT_GENERIC_LOG_JSON` | `logging.json` |

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix of every environment override
pub const ENV_PREFIX: &str = "REINHARDT_GENERIC_";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("File error: {0}")]
	FileError(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Invalid environment variable {key}: {message}")]
	EnvError { key: String, message: String },

	#[error("Logging error: {0}")]
	LoggingError(String),
}

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericSettings {
	#[serde(default = "default_database_url")]
	pub database_url: String,

	#[serde(default)]
	pub admin: AdminSettings,

	#[serde(default)]
	pub logging: LoggingSettings,
}

impl Default for GenericSettings {
	fn default() -> Self {
		Self {
			database_url: default_database_url(),
			admin: AdminSettings::default(),
			logging: LoggingSettings::default(),
		}
	}
}

fn default_database_url() -> String {
	"sqlite::memory:".to_string()
}

/// Admin site settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
	/// URL namespace of the admin site
	pub site_name: String,
	/// Path the admin is mounted at
	pub url_prefix: String,
	/// Template directories searched before the built-in templates
	pub template_dirs: Vec<PathBuf>,
	/// Upper bound on records per batch update, unbounded when absent
	pub max_batch_size: Option<usize>,
}

impl Default for AdminSettings {
	fn default() -> Self {
		Self {
			site_name: "admin".to_string(),
			url_prefix: "/admin".to_string(),
			template_dirs: Vec::new(),
			max_batch_size: None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
	/// Filter directive used when `RUST_LOG` is unset
	pub level: String,
	/// Emit JSON lines instead of human-readable output
	pub json: bool,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			json: false,
		}
	}
}

impl GenericSettings {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse settings from TOML text
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_conf::GenericSettings;
	///
	/// let settings = GenericSettings::from_toml_str(r#"
	/// [admin]
	/// url_prefix = "/staff"
	/// max_batch_size = 500
	/// "#).unwrap();
	///
	/// assert_eq!(settings.admin.url_prefix, "/staff");
	/// assert_eq!(settings.admin.max_batch_size, Some(500));
	/// assert_eq!(settings.logging.level, "info");
	/// ```
	pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
		toml::from_str(contents)
			.map_err(|e| SettingsError::ParseError(format!("TOML parse error: {}", e)))
	}

	pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let contents = std::fs::read_to_string(path).map_err(|e| {
			SettingsError::FileError(format!("Failed to read {}: {}", path.display(), e))
		})?;
		Self::from_toml_str(&contents)
	}

	/// Load from an optional file, apply environment overrides and validate
	pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
		let mut settings = match path {
			Some(path) => Self::from_toml_file(path)?,
			None => Self::default(),
		};
		settings.apply_env()?;
		settings.validate()?;
		tracing::debug!(
			file = ?path,
			url_prefix = %settings.admin.url_prefix,
			"Loaded settings"
		);
		Ok(settings)
	}

	/// Override settings from the process environment
	pub fn apply_env(&mut self) -> Result<(), SettingsError> {
		self.apply_overrides(|key| std::env::var(format!("{}{}", ENV_PREFIX, key)).ok())
	}

	/// Override settings from `lookup`, which receives variable names
	/// without [`ENV_PREFIX`]
	pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), SettingsError>
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(url) = lookup("DATABASE_URL") {
			self.database_url = url;
		}
		if let Some(name) = lookup("ADMIN_SITE_NAME") {
			self.admin.site_name = name;
		}
		if let Some(prefix) = lookup("ADMIN_URL_PREFIX") {
			self.admin.url_prefix = prefix;
		}
		if let Some(dirs) = lookup("ADMIN_TEMPLATE_DIRS") {
			self.admin.template_dirs = dirs
				.split(',')
				.map(str::trim)
				.filter(|d| !d.is_empty())
				.map(PathBuf::from)
				.collect();
		}
		if let Some(size) = lookup("ADMIN_MAX_BATCH_SIZE") {
			let size = size.trim();
			self.admin.max_batch_size = if size.is_empty() {
				None
			} else {
				Some(size.parse().map_err(|_| SettingsError::EnvError {
					key: format!("{}ADMIN_MAX_BATCH_SIZE", ENV_PREFIX),
					message: format!("expected a positive integer, got '{}'", size),
				})?)
			};
		}
		if let Some(level) = lookup("LOG_LEVEL") {
			self.logging.level = level;
		}
		if let Some(json) = lookup("LOG_JSON") {
			self.logging.json = parse_bool(&json).ok_or_else(|| SettingsError::EnvError {
				key: format!("{}LOG_JSON", ENV_PREFIX),
				message: format!("expected a boolean, got '{}'", json),
			})?;
		}
		Ok(())
	}

	pub fn validate(&self) -> Result<(), SettingsError> {
		if self.database_url.trim().is_empty() {
			return Err(SettingsError::ValidationError(
				"database_url must not be empty".to_string(),
			));
		}
		if !self.admin.url_prefix.starts_with('/') {
			return Err(SettingsError::ValidationError(format!(
				"admin.url_prefix must start with '/', got '{}'",
				self.admin.url_prefix
			)));
		}
		if self.admin.site_name.trim().is_empty() {
			return Err(SettingsError::ValidationError(
				"admin.site_name must not be empty".to_string(),
			));
		}
		if self.admin.max_batch_size == Some(0) {
			return Err(SettingsError::ValidationError(
				"admin.max_batch_size must be greater than zero".to_string(),
			));
		}
		Ok(())
	}
}

fn parse_bool(value: &str) -> Option<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Some(true),
		"false" | "0" | "no" | "off" => Some(false),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::collections::HashMap;

	fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let vars: HashMap<String, String> = vars
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |key| vars.get(key).cloned()
	}

	#[rstest]
	fn test_defaults_are_valid() {
		let settings = GenericSettings::default();

		assert_eq!(settings.database_url, "sqlite::memory:");
		assert_eq!(settings.admin.url_prefix, "/admin");
		assert!(settings.validate().is_ok());
	}

	#[rstest]
	fn test_overrides_replace_file_values() {
		// Arrange
		let mut settings = GenericSettings::from_toml_str(
			"database_url = \"sqlite://file.db\"\n[admin]\nmax_batch_size = 10\n",
		)
		.unwrap();

		// Act
		settings
			.apply_overrides(lookup(&[
				("ADMIN_MAX_BATCH_SIZE", "25"),
				("ADMIN_TEMPLATE_DIRS", "templates, shared/templates,"),
				("LOG_JSON", "yes"),
			]))
			.unwrap();

		// Assert
		assert_eq!(settings.database_url, "sqlite://file.db");
		assert_eq!(settings.admin.max_batch_size, Some(25));
		assert_eq!(
			settings.admin.template_dirs,
			vec![PathBuf::from("templates"), PathBuf::from("shared/templates")]
		);
		assert!(settings.logging.json);
	}

	#[rstest]
	#[case("ADMIN_MAX_BATCH_SIZE", "lots")]
	#[case("LOG_JSON", "maybe")]
	fn test_invalid_overrides(#[case] key: &str, #[case] value: &str) {
		let mut settings = GenericSettings::default();

		let result = settings.apply_overrides(lookup(&[(key, value)]));

		assert!(matches!(result, Err(SettingsError::EnvError { .. })));
	}

	#[rstest]
	#[case("url_prefix = \"admin\"")]
	#[case("max_batch_size = 0")]
	#[case("site_name = \" \"")]
	fn test_validate_rejects(#[case] admin_section: &str) {
		let settings =
			GenericSettings::from_toml_str(&format!("[admin]\n{}\n", admin_section)).unwrap();

		assert!(matches!(
			settings.validate(),
			Err(SettingsError::ValidationError(_))
		));
	}

	#[rstest]
	fn test_malformed_toml() {
		let result = GenericSettings::from_toml_str("[admin\nurl_prefix = 1");

		assert!(matches!(result, Err(SettingsError::ParseError(_))));
	}
}
