//! Date field

use crate::field::{FieldError, FieldResult, FormField, Widget, is_empty_value};
use chrono::NaiveDate;
use serde_json::Value;

/// Accepted input formats, tried in order.
const INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"];

/// Date field. Cleaned values are ISO-8601 (`YYYY-MM-DD`) strings.
#[derive(Debug, Clone)]
pub struct DateField {
	pub name: String,
	pub label: Option<String>,
	pub required: bool,
	pub help_text: Option<String>,
	pub widget: Widget,
}

impl DateField {
	/// Create a new DateField
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::{DateField, FormField};
	/// use serde_json::json;
	///
	/// let field = DateField::new("published_on");
	/// assert_eq!(field.clean(Some(&json!("12/31/2024"))), Ok(json!("2024-12-31")));
	/// ```
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			label: None,
			required: false,
			help_text: None,
			widget: Widget::DateInput,
		}
	}

	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::{DateField, FieldError, FormField};
	///
	/// let field = DateField::new("published_on").required(true);
	/// assert!(field.required);
	/// assert_eq!(field.clean(None), Err(FieldError::required()));
	/// ```
	pub fn required(mut self, required: bool) -> Self {
		self.required = required;
		self
	}

	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::{DateField, FormField};
	///
	/// let field = DateField::new("published_on").with_label("Published on");
	/// assert_eq!(field.label(), Some("Published on"));
	/// ```
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	fn parse(input: &str) -> Option<NaiveDate> {
		INPUT_FORMATS
			.iter()
			.find_map(|format| NaiveDate::parse_from_str(input, format).ok())
	}
}

impl FormField for DateField {
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

		let date = match value {
			Some(Value::String(s)) => Self::parse(s.trim()),
			_ => None,
		}
		.ok_or_else(|| FieldError::invalid("Enter a valid date."))?;

		Ok(Value::String(date.format("%Y-%m-%d").to_string()))
	}
}
