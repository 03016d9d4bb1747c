use crate::field::{FormField, Widget};
use serde::Serialize;

/// BoundField represents a field bound to form data
pub struct BoundField<'a> {
	field: &'a dyn FormField,
	data: Option<&'a serde_json::Value>,
	errors: &'a [String],
	prefix: &'a str,
}

impl<'a> BoundField<'a> {
	/// Bind a field to its submitted value and errors
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::{BoundField, CharField, FormField};
	///
	/// let field: Box<dyn FormField> = Box::new(CharField::new("name"));
	/// let data = serde_json::json!("John");
	/// let errors = vec![];
	///
	/// let bound = BoundField::new(field.as_ref(), Some(&data), &errors, "");
	/// assert_eq!(bound.name(), "name");
	/// assert_eq!(bound.value(), Some(&data));
	/// ```
	pub fn new(
		field: &'a dyn FormField,
		data: Option<&'a serde_json::Value>,
		errors: &'a [String],
		prefix: &'a str,
	) -> Self {
		Self {
			field,
			data,
			errors,
			prefix,
		}
	}

	pub fn name(&self) -> &str {
		self.field.name()
	}

	/// Get the HTML name attribute (with prefix)
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::{BoundField, CharField, FormField};
	///
	/// let field: Box<dyn FormField> = Box::new(CharField::new("email"));
	///
	/// let bound = BoundField::new(field.as_ref(), None, &[], "");
	/// assert_eq!(bound.html_name(), "email");
	///
	/// let bound_prefixed = BoundField::new(field.as_ref(), None, &[], "user");
	/// assert_eq!(bound_prefixed.html_name(), "user-email");
	/// ```
	pub fn html_name(&self) -> String {
		if self.prefix.is_empty() {
			self.field.name().to_string()
		} else {
			format!("{}-{}", self.prefix, self.field.name())
		}
	}

	pub fn id_for_label(&self) -> String {
		format!("id_{}", self.html_name())
	}

	/// The field label, falling back to a humanized field name
	pub fn label(&self) -> String {
		match self.field.label() {
			Some(label) => label.to_string(),
			None => humanize(self.field.name()),
		}
	}

	/// Submitted data if bound, otherwise the field's initial value
	pub fn value(&self) -> Option<&serde_json::Value> {
		self.data.or_else(|| self.field.initial())
	}

	pub fn errors(&self) -> &[String] {
		self.errors
	}

	pub fn has_errors(&self) -> bool {
		!self.errors.is_empty()
	}

	pub fn help_text(&self) -> Option<&str> {
		self.field.help_text()
	}

	pub fn widget(&self) -> &Widget {
		self.field.widget()
	}

	/// Render the field's widget with the bound value
	pub fn as_widget(&self) -> String {
		self.field
			.widget()
			.render(&self.html_name(), &self.id_for_label(), self.value())
	}

	/// Serializable snapshot used as template context
	pub fn to_context(&self) -> BoundFieldContext {
		BoundFieldContext {
			name: self.html_name(),
			id: self.id_for_label(),
			label: self.label(),
			widget_kind: self.widget().kind().to_string(),
			html: self.as_widget(),
			help_text: self.help_text().map(str::to_string),
			errors: self.errors.to_vec(),
			required: self.field.required(),
		}
	}
}

/// Template-facing view of a bound field
#[derive(Debug, Clone, Serialize)]
pub struct BoundFieldContext {
	pub name: String,
	pub id: String,
	pub label: String,
	pub widget_kind: String,
	pub html: String,
	pub help_text: Option<String>,
	pub errors: Vec<String>,
	pub required: bool,
}

/// "published_on" -> "Published on"
fn humanize(name: &str) -> String {
	let spaced = name.replace('_', " ");
	let mut chars = spaced.trim().chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}
