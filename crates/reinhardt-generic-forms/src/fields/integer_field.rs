//! Integer field

use crate::field::{FieldError, FieldResult, FormField, Widget, is_empty_value};
use serde_json::Value;

/// Integer field
#[derive(Debug, Clone)]
pub struct IntegerField {
	pub name: String,
	pub label: Option<String>,
	pub required: bool,
	pub help_text: Option<String>,
	pub widget: Widget,
}

impl IntegerField {
	/// Create a new IntegerField
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::{FormField, IntegerField};
	/// use serde_json::json;
	///
	/// let field = IntegerField::new("priority");
	/// assert_eq!(field.clean(Some(&json!(" 7 "))), Ok(json!(7)));
	/// assert!(field.clean(Some(&json!("seven"))).is_err());
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
	/// use reinhardt_generic_forms::{FieldError, FormField, IntegerField};
	/// use serde_json::json;
	///
	/// let field = IntegerField::new("priority").required(true);
	/// assert_eq!(field.clean(Some(&json!(""))), Err(FieldError::required()));
	///
	/// let optional = IntegerField::new("priority").required(false);
	/// assert_eq!(optional.clean(Some(&json!(""))), Ok(json!(null)));
	/// ```
	pub fn required(mut self, required: bool) -> Self {
		self.required = required;
		self
	}

	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::{FormField, IntegerField};
	///
	/// let field = IntegerField::new("rank").with_label("Rank");
	/// assert_eq!(field.label(), Some("Rank"));
	/// ```
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}
}

impl FormField for IntegerField {
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

		let invalid = || FieldError::invalid("Enter a whole number.");
		let number = match value {
			Some(Value::Number(n)) => n.as_i64().ok_or_else(invalid)?,
			Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| invalid())?,
			_ => return Err(invalid()),
		};

		Ok(Value::from(number))
	}
}
