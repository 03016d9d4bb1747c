//! Character field for text input

use crate::field::{FieldError, FieldResult, FormField, Widget, is_empty_value, scalar_to_string};
use serde_json::Value;

/// Character field with length validation
#[derive(Debug, Clone)]
pub struct CharField {
	pub name: String,
	pub label: Option<String>,
	pub required: bool,
	pub help_text: Option<String>,
	pub widget: Widget,
	pub max_length: Option<usize>,
	pub strip: bool,
}

impl CharField {
	/// Create a new CharField with the given name
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::CharField;
	///
	/// let field = CharField::new("title");
	/// assert_eq!(field.name, "title");
	/// assert!(!field.required);
	/// assert_eq!(field.max_length, None);
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			required: false,
			help_text: None,
			widget: Widget::TextInput,
			max_length: None,
			strip: true,
		}
	}

	/// Reject blank input when `required` is true
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::{CharField, FieldError, FormField};
	/// use serde_json::json;
	///
	/// let field = CharField::new("title").required(true);
	/// assert!(field.required);
	/// assert_eq!(field.clean(Some(&json!("  "))), Err(FieldError::required()));
	/// ```
	pub fn required(mut self, required: bool) -> Self {
		self.required = required;
		self
	}

	/// Limit the cleaned value to `max_length` characters
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::{CharField, FormField};
	/// use serde_json::json;
	///
	/// let field = CharField::new("code").with_max_length(3);
	/// assert_eq!(field.max_length, Some(3));
	/// assert!(field.clean(Some(&json!("abcd"))).is_err());
	/// ```
	pub fn with_max_length(mut self, max_length: usize) -> Self {
		self.max_length = Some(max_length);
		self
	}

	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::{CharField, FormField};
	///
	/// let field = CharField::new("title").with_label("Headline");
	/// assert_eq!(field.label(), Some("Headline"));
	/// ```
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::{CharField, FormField};
	///
	/// let field = CharField::new("title").with_help_text("Shown on the front page");
	/// assert_eq!(field.help_text(), Some("Shown on the front page"));
	/// ```
	pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
		self.help_text = Some(help_text.into());
		self
	}
}

impl FormField for CharField {
	fn name(&self) -> &str {
		&self.name
	}

	fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	fn widget(&self) -> &Widget {
		&self.widget
	}

	fn required(&self) -> bool {
		self.required
	}

	fn help_text(&self) -> Option<&str> {
		self.help_text.as_deref()
	}

	fn clean(&self, value: Option<&Value>) -> FieldResult<Value> {
		if is_empty_value(value) {
			if self.required {
				return Err(FieldError::required());
			}
			return Ok(Value::String(String::new()));
		}

		let raw = value
			.and_then(scalar_to_string)
			.ok_or_else(|| FieldError::invalid("Enter a valid value."))?;
		let s = if self.strip {
			raw.trim().to_string()
		} else {
			raw
		};

		let length = s.chars().count();
		if let Some(max) = self.max_length.filter(|max| length > *max) {
			return Err(FieldError::validation(format!(
				"Ensure this value has at most {max} characters (it has {length})."
			)));
		}

		Ok(Value::String(s))
	}
}
