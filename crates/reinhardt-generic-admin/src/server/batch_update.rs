//! Batch update endpoint
//!
//! `GET` renders the unbound form for the records named by `?ids=`.
//! `POST` validates the submission; an invalid form is re-rendered with its
//! errors, a valid one is applied and answered with a redirect to the
//! change list.

use super::audit;
use super::auth::{
	AdminUser, DefaultPermissionChecker, PermissionChecker, permission_denied,
	require_change_permission,
};
use crate::core::batch::{
	ApplyResult, BatchApplier, BatchUpdateForm, FieldDescriptor, TargetRecordSet,
};
use crate::core::{
	AdminSite, BATCH_UPDATE_ACTION, BatchDatabase, BatchUpdateAdmin, BatchUpdateContext,
	BatchUpdateRenderer,
};
use crate::types::{
	ActionRequest, AdminError, AdminMessage, AdminResult, BatchUpdateQuery, BatchUpdateResponse,
};
use http::Method;
use reinhardt_generic_forms::parse_form_data;
use std::collections::HashMap;
use std::sync::Arc;

/// Dependencies of the batch update endpoint, owned by the caller
#[derive(Clone)]
pub struct BatchUpdateViewContext {
	site: Arc<AdminSite>,
	db: Arc<dyn BatchDatabase>,
	renderer: Arc<BatchUpdateRenderer>,
	permissions: Arc<dyn PermissionChecker>,
}

impl BatchUpdateViewContext {
	/// Context using the built-in template and [`DefaultPermissionChecker`]
	pub fn new(site: Arc<AdminSite>, db: Arc<dyn BatchDatabase>) -> AdminResult<Self> {
		Ok(Self {
			site,
			db,
			renderer: Arc::new(BatchUpdateRenderer::new()?),
			permissions: Arc::new(DefaultPermissionChecker),
		})
	}

	pub fn with_renderer(mut self, renderer: BatchUpdateRenderer) -> Self {
		self.renderer = Arc::new(renderer);
		self
	}

	pub fn with_permission_checker(mut self, checker: impl PermissionChecker + 'static) -> Self {
		self.permissions = Arc::new(checker);
		self
	}

	pub fn site(&self) -> &Arc<AdminSite> {
		&self.site
	}

	pub fn db(&self) -> &Arc<dyn BatchDatabase> {
		&self.db
	}
}

impl std::fmt::Debug for BatchUpdateViewContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BatchUpdateViewContext")
			.field("site", &self.site.name())
			.finish_non_exhaustive()
	}
}

/// A request to the batch update endpoint
#[derive(Debug, Clone)]
pub struct BatchUpdateRequest {
	pub method: Method,
	/// Raw query string, without the leading `?`
	pub query: String,
	/// URL-encoded form body
	pub body: String,
	pub user: AdminUser,
}

impl BatchUpdateRequest {
	pub fn get(query: impl Into<String>, user: AdminUser) -> Self {
		Self {
			method: Method::GET,
			query: query.into(),
			body: String::new(),
			user,
		}
	}

	pub fn post(query: impl Into<String>, body: impl Into<String>, user: AdminUser) -> Self {
		Self {
			method: Method::POST,
			query: query.into(),
			body: body.into(),
			user,
		}
	}
}

/// Handle a batch update request for `model` (`app_label.model`)
pub async fn batch_update_view(
	ctx: &BatchUpdateViewContext,
	model: &str,
	request: BatchUpdateRequest,
) -> AdminResult<BatchUpdateResponse> {
	let admin = ctx.site.get_model_admin(model)?;
	let has_change_permission = ctx
		.permissions
		.has_change_permission(&request.user, &admin)
		.await;
	if !has_change_permission {
		return Err(permission_denied(&request.user, &admin));
	}

	if request.method != Method::GET && request.method != Method::POST {
		return Err(AdminError::InvalidAction(format!(
			"method {} is not allowed",
			request.method
		)));
	}

	let query = BatchUpdateQuery::from_query_string(&request.query)?;
	let targets = TargetRecordSet::parse(&query.ids);
	if let Some(max) = admin.max_batch_size().filter(|max| targets.len() > *max) {
		return Err(AdminError::ValidationError(format!(
			"At most {} records can be batch updated at once, {} were selected",
			max,
			targets.len()
		)));
	}

	let descriptors = admin.descriptors()?;
	let choices = load_related_choices(ctx.db.as_ref(), &descriptors).await?;
	let mut form = BatchUpdateForm::new(descriptors, &choices);

	if request.method == Method::POST {
		let data = parse_form_data(&request.body)
			.map_err(|e| AdminError::ValidationError(e.to_string()))?;
		form.bind(data);
		if form.is_valid() {
			return apply_form(ctx, &admin, &mut form, &targets, &request.user).await;
		}
		tracing::debug!(
			model = %admin.schema().label(),
			errors = form.errors().len(),
			"Batch update form rejected"
		);
	}

	let resolved = targets
		.resolve(ctx.db.as_ref(), admin.schema(), admin.scope())
		.await?;
	let context = BatchUpdateContext::new(
		&admin,
		&form,
		resolved.len(),
		admin.batch_update_location(targets.ids()),
		targets.to_query_value(),
		has_change_permission,
	);
	let html = ctx.renderer.render(&admin.template_candidates(), &context)?;
	Ok(BatchUpdateResponse::Form {
		html,
		errors: form.errors().clone(),
	})
}

async fn apply_form(
	ctx: &BatchUpdateViewContext,
	admin: &BatchUpdateAdmin,
	form: &mut BatchUpdateForm,
	targets: &TargetRecordSet,
	user: &AdminUser,
) -> AdminResult<BatchUpdateResponse> {
	let applier = BatchApplier::new(ctx.db.clone(), admin.schema().clone())
		.with_scope(admin.scope().clone());
	let result = match form.values() {
		Some(values) => applier.apply(targets, values).await,
		None => Ok(ApplyResult::default()),
	};
	let fields = form.fields_to_update();
	let model = admin.schema().label();

	let result = match result {
		Ok(result) => result,
		Err(err) => {
			tracing::error!(model = %model, error = %err, "Batch update failed");
			audit::log_batch_update(&user.user_id, &model, targets.ids(), &fields, 0, false);
			return Err(err);
		}
	};
	audit::log_batch_update(
		&user.user_id,
		&model,
		targets.ids(),
		&fields,
		result.count(),
		true,
	);
	form.mark_applied()?;

	let message = admin.success_message(result.count(), &form.verbose_fields_to_update());
	Ok(BatchUpdateResponse::Redirect {
		location: admin.changelist_url(),
		message: AdminMessage::success(message),
	})
}

/// Related records offered for each relationship descriptor
async fn load_related_choices(
	db: &dyn BatchDatabase,
	descriptors: &[FieldDescriptor],
) -> AdminResult<HashMap<String, Vec<(String, String)>>> {
	let mut choices = HashMap::new();
	for descriptor in descriptors {
		if let Some(relation) = descriptor.relation() {
			choices.insert(
				descriptor.name().to_string(),
				db.related_choices(relation).await?,
			);
		}
	}
	Ok(choices)
}

/// Run a change list action, returning the redirect location.
///
/// Only `batch_update` is handled here; it is offered when the model admin
/// has batch update fields.
pub async fn changelist_action(
	ctx: &BatchUpdateViewContext,
	model: &str,
	request: &ActionRequest,
	user: &AdminUser,
) -> AdminResult<String> {
	let admin = ctx.site.get_model_admin(model)?;
	require_change_permission(ctx.permissions.as_ref(), user, &admin).await?;

	let offered = admin
		.get_actions(Vec::new())?
		.into_iter()
		.any(|action| action.name == request.action);
	if request.action != BATCH_UPDATE_ACTION || !offered {
		return Err(AdminError::InvalidAction(format!(
			"Action '{}' not found",
			request.action
		)));
	}
	admin.batch_update_action(&request.selected)
}
