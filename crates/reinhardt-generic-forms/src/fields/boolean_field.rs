//! Boolean (checkbox) field

use crate::field::{FieldResult, FormField, Widget, is_truthy};
use serde_json::Value;

/// Checkbox field.
///
/// A missing value is `false`. An unchecked box is a value like any other, so
/// the field is never required.
#[derive(Debug, Clone)]
pub struct BooleanField {
	pub name: String,
	pub label: Option<String>,
	pub help_text: Option<String>,
	pub widget: Widget,
}

impl BooleanField {
	/// Create a new BooleanField
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::{BooleanField, FormField};
	/// use serde_json::json;
	///
	/// let field = BooleanField::new("is_active");
	/// assert!(!FormField::required(&field));
	/// assert_eq!(field.clean(Some(&json!("on"))), Ok(json!(true)));
	/// assert_eq!(field.clean(None), Ok(json!(false)));
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			help_text: None,
			widget: Widget::CheckboxInput,
		}
	}

	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::{BooleanField, FormField};
	///
	/// let field = BooleanField::new("featured").with_label("Featured");
	/// assert_eq!(field.label(), Some("Featured"));
	/// ```
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}
}

impl FormField for BooleanField {
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
		false
	}

	fn help_text(&self) -> Option<&str> {
		self.help_text.as_deref()
	}

	fn clean(&self, value: Option<&Value>) -> FieldResult<Value> {
		Ok(Value::Bool(is_truthy(value)))
	}
}
