//! # reinhardt-generic-conf
//!
//! Settings and logging for the Reinhardt Generic admin extensions.
//!
//! ```no_run
//! use reinhardt_generic_conf::{GenericSettings, init_logging};
//!
//! let settings = GenericSettings::load(Some("generic.toml".as_ref())).unwrap();
//! init_logging(&settings.logging).unwrap();
//! ```

pub mod logging;
pub mod settings;

pub use logging::{env_filter, init_logging};
pub use settings::{AdminSettings, ENV_PREFIX, GenericSettings, LoggingSettings, SettingsError};
