//! Wiring settings into the admin

use reinhardt_generic_admin::core::{BatchUpdateAdmin, BatchUpdateRenderer, SqliteBatchDatabase};
use reinhardt_generic_admin::types::AdminResult;
use reinhardt_generic_conf::{AdminSettings, GenericSettings};

/// Apply site-wide settings to a model admin
///
/// # Examples
///
/// ```
/// use reinhardt_generic::admin::{BatchUpdateAdmin, ModelSchema};
/// use reinhardt_generic::conf::AdminSettings;
/// use reinhardt_generic::setup::configure_admin;
///
/// let settings = AdminSettings {
///     url_prefix: "/staff".to_string(),
///     max_batch_size: Some(100),
///     ..Default::default()
/// };
/// let admin = configure_admin(BatchUpdateAdmin::new(ModelSchema::new("blog", "Article")), &settings);
///
/// assert_eq!(admin.changelist_url(), "/staff/blog/article/");
/// assert_eq!(admin.max_batch_size(), Some(100));
/// ```
pub fn configure_admin(admin: BatchUpdateAdmin, settings: &AdminSettings) -> BatchUpdateAdmin {
	let admin = admin
		.with_site_name(settings.site_name.clone())
		.with_url_prefix(settings.url_prefix.clone());
	match settings.max_batch_size {
		Some(max) => admin.with_max_batch_size(max),
		None => admin,
	}
}

/// Renderer searching the configured template directories first
pub fn renderer(settings: &AdminSettings) -> AdminResult<BatchUpdateRenderer> {
	if settings.template_dirs.is_empty() {
		BatchUpdateRenderer::new()
	} else {
		BatchUpdateRenderer::from_template_dirs(settings.template_dirs.as_slice())
	}
}

pub async fn connect_database(settings: &GenericSettings) -> AdminResult<SqliteBatchDatabase> {
	SqliteBatchDatabase::connect(&settings.database_url).await
}
