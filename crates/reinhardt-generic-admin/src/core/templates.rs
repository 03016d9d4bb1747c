//! Template rendering for the batch update page
//!
//! Pages are rendered with Tera. The first existing template of
//! [`BatchUpdateAdmin::template_candidates`](crate::core::BatchUpdateAdmin::template_candidates)
//! is used; a built-in page is always registered as the last candidate.

use crate::core::batch::{BatchFieldContext, BatchUpdateForm};
use crate::core::model_admin::BatchUpdateAdmin;
use crate::types::{AdminError, AdminResult};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tera::Tera;

/// Name of the built-in batch update template
pub const DEFAULT_TEMPLATE_NAME: &str = "admin/generic/batch_update.html";

const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{ title }} | {{ site_title }}</title>
</head>
<body class="batch-update app-{{ app_label }} model-{{ model_name }}">
<div id="content">
<h1>{{ title }}</h1>
<p class="batch-count">{{ count }} {{ count_label }} selected.</p>
{% if non_field_errors | length > 0 %}
<ul class="errorlist nonfield">
{% for error in non_field_errors %}<li>{{ error }}</li>{% endfor %}
</ul>
{% endif %}
<form method="post" action="{{ action_url }}">
<table class="batch-fields">
{% for field in fields %}
<tr class="field-{{ field.name }}{% if field.value.errors | length > 0 %} errors{% endif %}">
<td class="toggle">{{ field.toggle.html | safe }}</td>
<th><label for="{{ field.value.id }}">{{ field.label }}</label></th>
<td>
{{ field.value.html | safe }}
{% for error in field.value.errors %}<p class="errornote">{{ error }}</p>{% endfor %}
{% if field.value.help_text %}<p class="help">{{ field.value.help_text }}</p>{% endif %}
</td>
</tr>
{% endfor %}
</table>
<div class="submit-row">
{% if has_change_permission %}<input type="submit" class="default" value="Update">{% endif %}
<a href="{{ changelist_url }}" class="cancel-link">Cancel</a>
</div>
</form>
</div>
</body>
</html>
"#;

/// Context of the batch update page
#[derive(Debug, Clone, Serialize)]
pub struct BatchUpdateContext {
	pub site_title: String,
	pub title: String,
	pub app_label: String,
	pub model_name: String,
	pub verbose_name: String,
	pub verbose_name_plural: String,
	/// Number of resolved target records
	pub count: usize,
	/// Verbose name matching `count`
	pub count_label: String,
	/// Comma-separated target ids
	pub ids: String,
	pub action_url: String,
	pub changelist_url: String,
	pub has_change_permission: bool,
	pub non_field_errors: Vec<String>,
	pub fields: Vec<BatchFieldContext>,
}

impl BatchUpdateContext {
	pub fn new(
		admin: &BatchUpdateAdmin,
		form: &BatchUpdateForm,
		count: usize,
		action_url: String,
		ids: String,
		has_change_permission: bool,
	) -> Self {
		let schema = admin.schema();
		Self {
			site_title: admin.site_name().to_string(),
			title: format!("Batch update {}", schema.verbose_name_plural),
			app_label: schema.app_label.clone(),
			model_name: schema.model_key(),
			verbose_name: schema.verbose_name.clone(),
			verbose_name_plural: schema.verbose_name_plural.clone(),
			count,
			count_label: schema.verbose_name_for(count as u64).to_string(),
			ids,
			action_url,
			changelist_url: admin.changelist_url(),
			has_change_permission,
			non_field_errors: form.errors().non_field_errors().to_vec(),
			fields: form.bound_fields(),
		}
	}
}

/// Tera renderer for the batch update page
#[derive(Debug, Clone)]
pub struct BatchUpdateRenderer {
	tera: Arc<Tera>,
}

impl BatchUpdateRenderer {
	/// Renderer with only the built-in template
	pub fn new() -> AdminResult<Self> {
		Self::with_tera(Tera::default())
	}

	/// Load `*.html` templates from `dirs`; earlier directories win.
	///
	/// Template names are paths relative to their directory, e.g.
	/// `admin/blog/article/batch_update.html`.
	pub fn from_template_dirs<P: AsRef<Path>>(dirs: &[P]) -> AdminResult<Self> {
		let mut tera = Tera::default();
		for dir in dirs {
			let pattern = format!("{}/**/*.html", dir.as_ref().display());
			let loaded = Tera::new(&pattern)?;
			tera.extend(&loaded)?;
			tracing::debug!(pattern = %pattern, "Loaded admin templates");
		}
		Self::with_tera(tera)
	}

	/// Use a configured Tera instance, adding the built-in template if absent
	pub fn with_tera(mut tera: Tera) -> AdminResult<Self> {
		if !tera
			.get_template_names()
			.any(|name| name == DEFAULT_TEMPLATE_NAME)
		{
			tera.add_raw_template(DEFAULT_TEMPLATE_NAME, DEFAULT_TEMPLATE)?;
		}
		Ok(Self {
			tera: Arc::new(tera),
		})
	}

	/// First candidate known to the renderer
	pub fn select_template<'a>(&self, candidates: &'a [String]) -> AdminResult<&'a str> {
		candidates
			.iter()
			.map(String::as_str)
			.find(|candidate| self.tera.get_template_names().any(|name| name == *candidate))
			.ok_or_else(|| {
				AdminError::TemplateError(format!(
					"none of the templates exist: {}",
					candidates.join(", ")
				))
			})
	}

	pub fn render(
		&self,
		candidates: &[String],
		context: &BatchUpdateContext,
	) -> AdminResult<String> {
		let template = self.select_template(candidates)?;
		let tera_context = tera::Context::from_serialize(context)?;
		self.tera.render(template, &tera_context).map_err(|e| {
			AdminError::TemplateError(format!(
				"Failed to render batch update template '{}': {}",
				template,
				AdminError::from(e)
			))
		})
	}
}
