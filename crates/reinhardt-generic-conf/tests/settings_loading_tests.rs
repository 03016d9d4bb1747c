//! Integration tests for loading settings from files and the environment

use reinhardt_generic_conf::{GenericSettings, SettingsError};
use rstest::{fixture, rstest};
use serial_test::serial;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

const ENV_KEYS: &[&str] = &[
	"REINHARDT_GENERIC_DATABASE_URL",
	"REINHARDT_GENERIC_ADMIN_URL_PREFIX",
	"REINHARDT_GENERIC_ADMIN_MAX_BATCH_SIZE",
	"REINHARDT_GENERIC_LOG_LEVEL",
];

fn clear_env() {
	for key in ENV_KEYS {
		// SAFETY: every test touching these variables is #[serial]
		unsafe { std::env::remove_var(key) };
	}
}

#[fixture]
fn settings_file() -> NamedTempFile {
	let mut file = NamedTempFile::new().unwrap();
	writeln!(
		file,
		r#"
database_url = "sqlite://blog.db"

[admin]
site_name = "staff"
url_prefix = "/staff"
template_dirs = ["templates"]
max_batch_size = 200

[logging]
level = "debug"
"#
	)
	.unwrap();
	file
}

#[rstest]
#[serial]
fn test_load_reads_file(settings_file: NamedTempFile) {
	// Arrange
	clear_env();

	// Act
	let settings = GenericSettings::load(Some(settings_file.path())).unwrap();

	// Assert
	assert_eq!(settings.database_url, "sqlite://blog.db");
	assert_eq!(settings.admin.site_name, "staff");
	assert_eq!(settings.admin.template_dirs, vec![PathBuf::from("templates")]);
	assert_eq!(settings.admin.max_batch_size, Some(200));
	assert_eq!(settings.logging.level, "debug");
	assert!(!settings.logging.json);
}

#[rstest]
#[serial]
fn test_environment_overrides_file(settings_file: NamedTempFile) {
	// Arrange
	clear_env();
	// SAFETY: serialized
	unsafe {
		std::env::set_var("REINHARDT_GENERIC_ADMIN_MAX_BATCH_SIZE", "50");
		std::env::set_var("REINHARDT_GENERIC_LOG_LEVEL", "warn");
	}

	// Act
	let settings = GenericSettings::load(Some(settings_file.path()));
	clear_env();

	// Assert
	let settings = settings.unwrap();
	assert_eq!(settings.admin.max_batch_size, Some(50));
	assert_eq!(settings.logging.level, "warn");
	assert_eq!(settings.admin.url_prefix, "/staff");
}

#[rstest]
#[serial]
fn test_invalid_environment_fails_validation() {
	// Arrange
	clear_env();
	// SAFETY: serialized
	unsafe { std::env::set_var("REINHARDT_GENERIC_ADMIN_URL_PREFIX", "admin") };

	// Act
	let result = GenericSettings::load(None);
	clear_env();

	// Assert
	assert!(matches!(result, Err(SettingsError::ValidationError(_))));
}

#[rstest]
fn test_missing_file_is_reported() {
	let result = GenericSettings::from_toml_file("/nonexistent/generic.toml");

	assert!(matches!(result, Err(SettingsError::FileError(_))));
}
