//! Float field

use crate::field::{FieldError, FieldResult, FormField, Widget, is_empty_value};
use serde_json::{Number, Value};

/// Floating point field. Non-finite values are rejected.
#[derive(Debug, Clone)]
pub struct FloatField {
	pub name: String,
	pub label: Option<String>,
	pub required: bool,
	pub help_text: Option<String>,
	pub widget: Widget,
}

impl FloatField {
	/// Create a new optional FloatField
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::{FloatField, FormField};
	/// use serde_json::json;
	///
	/// let field = FloatField::new("price");
	/// assert_eq!(field.clean(Some(&json!("12.5"))), Ok(json!(12.5)));
	/// assert_eq!(field.clean(Some(&json!(""))), Ok(json!(null)));
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			required: false,
			help_text: None,
			widget: Widget::NumberInput,
		}
	}

	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::{FieldError, FloatField, FormField};
	/// use serde_json::json;
	///
	/// let field = FloatField::new("price").required(true);
	/// assert_eq!(field.clean(Some(&json!(" "))), Err(FieldError::required()));
	/// ```
	pub fn required(mut self, required: bool) -> Self {
		self.required = required;
		self
	}

	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::{FloatField, FormField};
	///
	/// let field = FloatField::new("price").with_label("Price");
	/// assert_eq!(field.label(), Some("Price"));
	/// ```
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}
}

impl FormField for FloatField {
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
			return Ok(Value::Null);
		}

		let invalid = || FieldError::invalid("Enter a number.");
		let number = match value {
			Some(Value::Number(n)) => n.as_f64().ok_or_else(invalid)?,
			Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| invalid())?,
			_ => return Err(invalid()),
		};

		Number::from_f64(number)
			.map(Value::Number)
			.ok_or_else(invalid)
	}
}
