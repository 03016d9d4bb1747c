//! Model admin integration for batch updates

use crate::core::batch::FieldDescriptor;
use crate::core::database::QueryScope;
use crate::core::schema::ModelSchema;
use crate::types::{AdminError, AdminResult};
use parking_lot::RwLock;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::collections::HashMap;
use std::sync::Arc;

/// Name of the change list action that starts a batch update
pub const BATCH_UPDATE_ACTION: &str = "batch_update";
/// View name used in URL names
pub const BATCH_UPDATE_VIEW: &str = "batchupdate";
/// Path of the batch update view below the model admin URL
pub const BATCH_UPDATE_PATH: &str = "batch-update/";

/// Characters escaped in a single id of the `ids` parameter.
/// Commas are escaped because they separate ids.
const ID_ENCODE_SET: &AsciiSet = &CONTROLS
	.add(b' ')
	.add(b'"')
	.add(b'#')
	.add(b'%')
	.add(b'&')
	.add(b'+')
	.add(b',')
	.add(b'/')
	.add(b'=')
	.add(b'?');

/// A change list action as offered to the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminActionInfo {
	pub name: String,
	pub description: String,
}

impl AdminActionInfo {
	pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			description: description.into(),
		}
	}
}

/// Admin configuration of one model with batch update support
#[derive(Debug, Clone)]
pub struct BatchUpdateAdmin {
	schema: Arc<ModelSchema>,
	batch_update_fields: Vec<String>,
	site_name: String,
	url_prefix: String,
	scope: QueryScope,
	max_batch_size: Option<usize>,
}

impl BatchUpdateAdmin {
	/// Create an admin with no batch update fields
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_admin::core::{BatchUpdateAdmin, ModelField, ModelSchema};
	///
	/// let schema = ModelSchema::new("blog", "Article").with_field(ModelField::boolean("featured"));
	/// let admin = BatchUpdateAdmin::new(schema).with_batch_update_fields(["featured"]);
	///
	/// assert_eq!(admin.url_name("batchupdate", true), "admin:blog_article_batchupdate");
	/// assert_eq!(admin.batch_update_url(), "/admin/blog/article/batch-update/");
	/// ```
	pub fn new(schema: impl Into<Arc<ModelSchema>>) -> Self {
		Self {
			schema: schema.into(),
			batch_update_fields: Vec::new(),
			site_name: "admin".to_string(),
			url_prefix: "/admin".to_string(),
			scope: QueryScope::all(),
			max_batch_size: None,
		}
	}

	pub fn with_batch_update_fields<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.batch_update_fields = fields.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_site_name(mut self, site_name: impl Into<String>) -> Self {
		self.site_name = site_name.into();
		self
	}

	/// Set the URL prefix the admin site is mounted at
	pub fn with_url_prefix(mut self, url_prefix: impl Into<String>) -> Self {
		self.url_prefix = url_prefix.into().trim_end_matches('/').to_string();
		self
	}

	/// Restrict the records this admin may update
	pub fn with_scope(mut self, scope: QueryScope) -> Self {
		self.scope = scope;
		self
	}

	pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
		self.max_batch_size = Some(max_batch_size);
		self
	}

	pub fn schema(&self) -> &Arc<ModelSchema> {
		&self.schema
	}

	pub fn batch_update_fields(&self) -> &[String] {
		&self.batch_update_fields
	}

	pub fn site_name(&self) -> &str {
		&self.site_name
	}

	pub fn scope(&self) -> &QueryScope {
		&self.scope
	}

	pub fn max_batch_size(&self) -> Option<usize> {
		self.max_batch_size
	}

	/// Descriptors of the configured batch update fields
	pub fn descriptors(&self) -> AdminResult<Vec<FieldDescriptor>> {
		FieldDescriptor::from_schema(&self.schema, &self.batch_update_fields)
	}

	pub fn validate_batch_update_fields(&self) -> AdminResult<()> {
		self.descriptors().map(|_| ())
	}

	/// Offer the batch update action only when fields are configured
	pub fn get_actions(
		&self,
		mut actions: Vec<AdminActionInfo>,
	) -> AdminResult<Vec<AdminActionInfo>> {
		if self.batch_update_fields.is_empty() {
			actions.retain(|action| action.name != BATCH_UPDATE_ACTION);
			return Ok(actions);
		}
		self.validate_batch_update_fields()?;
		if !actions.iter().any(|action| action.name == BATCH_UPDATE_ACTION) {
			actions.push(AdminActionInfo::new(
				BATCH_UPDATE_ACTION,
				format!("Batch update selected {}", self.schema.verbose_name_plural),
			));
		}
		Ok(actions)
	}

	/// `admin:<app>_<model>_<view>` style URL name
	pub fn url_name(&self, view: &str, include_namespace: bool) -> String {
		format!(
			"{}{}_{}_{}",
			if include_namespace {
				format!("{}:", self.site_name)
			} else {
				String::new()
			},
			self.schema.app_label,
			self.schema.model_key(),
			view
		)
	}

	/// URL of the model's change list
	pub fn changelist_url(&self) -> String {
		format!(
			"{}/{}/{}/",
			self.url_prefix,
			self.schema.app_label,
			self.schema.model_key()
		)
	}

	pub fn batch_update_url(&self) -> String {
		format!("{}{}", self.changelist_url(), BATCH_UPDATE_PATH)
	}

	/// Redirect location for the `batch_update` action
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_admin::core::{BatchUpdateAdmin, ModelField, ModelSchema};
	///
	/// let schema = ModelSchema::new("blog", "Article").with_field(ModelField::boolean("featured"));
	/// let admin = BatchUpdateAdmin::new(schema).with_batch_update_fields(["featured"]);
	///
	/// let location = admin.batch_update_action(&["3".to_string(), "7".to_string()]).unwrap();
	/// assert_eq!(location, "/admin/blog/article/batch-update/?ids=3,7");
	/// ```
	pub fn batch_update_action(&self, selected: &[String]) -> AdminResult<String> {
		if selected.is_empty() {
			return Err(AdminError::InvalidAction(
				"Items must be selected in order to perform actions on them. No items have been changed."
					.to_string(),
			));
		}
		Ok(self.batch_update_location(selected))
	}

	/// Batch update URL carrying `ids` in its query string
	pub fn batch_update_location(&self, ids: &[String]) -> String {
		let ids = ids
			.iter()
			.map(|id| utf8_percent_encode(id, ID_ENCODE_SET).to_string())
			.collect::<Vec<_>>()
			.join(",");
		format!("{}?ids={}", self.batch_update_url(), ids)
	}

	/// Templates tried in order when rendering the batch update page
	pub fn template_candidates(&self) -> Vec<String> {
		let app = &self.schema.app_label;
		let model = self.schema.model_key();
		vec![
			format!("admin/{}/{}/batch_update.html", app, model),
			format!("admin/{}/batch_update.html", app),
			"admin/batch_update.html".to_string(),
			"admin/generic/batch_update.html".to_string(),
		]
	}

	/// Message shown after a successful update
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_admin::core::{BatchUpdateAdmin, ModelSchema};
	///
	/// let admin = BatchUpdateAdmin::new(ModelSchema::new("blog", "Article"));
	/// assert_eq!(
	///     admin.success_message(1, &["status".to_string()]),
	///     "Updated fields (status) for 1 article"
	/// );
	/// ```
	pub fn success_message(&self, count: u64, field_names: &[String]) -> String {
		format!(
			"Updated fields ({}) for {} {}",
			field_names.join(", "),
			count,
			self.schema.verbose_name_for(count)
		)
	}

	/// Codename of the permission required to change records
	pub fn change_permission(&self) -> String {
		format!(
			"{}.change_{}",
			self.schema.app_label,
			self.schema.model_key()
		)
	}
}

/// Registry of model admins, owned by the caller
///
/// Models are keyed by `app_label.model`.
#[derive(Debug)]
pub struct AdminSite {
	name: String,
	registry: RwLock<HashMap<String, Arc<BatchUpdateAdmin>>>,
}

impl AdminSite {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			registry: RwLock::new(HashMap::new()),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Register a model admin, validating its batch update fields
	pub fn register(&self, admin: BatchUpdateAdmin) -> AdminResult<()> {
		admin.validate_batch_update_fields()?;
		let key = admin.schema().label();
		tracing::debug!(site = %self.name, model = %key, "Registered model admin");
		self.registry.write().insert(key, Arc::new(admin));
		Ok(())
	}

	pub fn unregister(&self, model: &str) -> AdminResult<()> {
		self.registry
			.write()
			.remove(&model.to_lowercase())
			.map(|_| ())
			.ok_or_else(|| AdminError::ModelNotRegistered(model.to_string()))
	}

	/// Look up by `app_label.model` (case-insensitive)
	pub fn get_model_admin(&self, model: &str) -> AdminResult<Arc<BatchUpdateAdmin>> {
		self.registry
			.read()
			.get(&model.to_lowercase())
			.cloned()
			.ok_or_else(|| AdminError::ModelNotRegistered(model.to_string()))
	}

	pub fn is_registered(&self, model: &str) -> bool {
		self.registry.read().contains_key(&model.to_lowercase())
	}

	pub fn registered_models(&self) -> Vec<String> {
		let mut models: Vec<String> = self.registry.read().keys().cloned().collect();
		models.sort();
		models
	}
}
