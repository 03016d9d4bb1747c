//! Logging setup
//!
//! Installs a `tracing-subscriber` registry with an [`EnvFilter`]. `RUST_LOG`
//! wins over [`LoggingSettings::level`] when set.

use crate::settings::{LoggingSettings, SettingsError};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Build the filter for `settings`
pub fn env_filter(settings: &LoggingSettings) -> Result<EnvFilter, SettingsError> {
	match EnvFilter::try_from_default_env() {
		Ok(filter) => Ok(filter),
		Err(_) => EnvFilter::try_new(&settings.level).map_err(|e| {
			SettingsError::LoggingError(format!(
				"invalid log level '{}': {}",
				settings.level, e
			))
		}),
	}
}

/// Install the global subscriber.
///
/// Fails if a global subscriber is already set.
pub fn init_logging(settings: &LoggingSettings) -> Result<(), SettingsError> {
	let filter = env_filter(settings)?;
	let registry = tracing_subscriber::registry().with(filter);
	let result = if settings.json {
		registry
			.with(tracing_subscriber::fmt::layer().json())
			.try_init()
	} else {
		registry.with(tracing_subscriber::fmt::layer()).try_init()
	};
	result.map_err(|e| SettingsError::LoggingError(e.to_string()))?;
	tracing::debug!(level = %settings.level, json = settings.json, "Logging initialized");
	Ok(())
}
