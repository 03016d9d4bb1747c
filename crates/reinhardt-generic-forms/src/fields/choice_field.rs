//! Single choice field

use crate::field::{FieldError, FieldResult, FormField, Widget, is_empty_value, scalar_to_string};
use serde_json::Value;

/// Field restricted to a fixed set of `(value, label)` choices
#[derive(Debug, Clone)]
pub struct ChoiceField {
	pub name: String,
	pub label: Option<String>,
	pub required: bool,
	pub help_text: Option<String>,
	pub choices: Vec<(String, String)>,
	pub widget: Widget,
}

impl ChoiceField {
	/// Create a new ChoiceField
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::{ChoiceField, FormField};
	/// use serde_json::json;
	///
	/// let field = ChoiceField::new(
	///     "status",
	///     vec![
	///         ("draft".to_string(), "Draft".to_string()),
	///         ("published".to_string(), "Published".to_string()),
	///     ],
	/// );
	/// assert_eq!(field.clean(Some(&json!("draft"))), Ok(json!("draft")));
	/// assert!(field.clean(Some(&json!("archived"))).is_err());
	/// ```
	pub fn new(name: impl Into<String>, choices: Vec<(String, String)>) -> Self {
		Self {
			name: name.into(),
			label: None,
			required: false,
			help_text: None,
			widget: Widget::Select {
				choices: choices.clone(),
			},
			choices,
		}
	}

	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::{ChoiceField, FieldError, FormField};
	/// use serde_json::json;
	///
	/// let choices = vec![("draft".to_string(), "Draft".to_string())];
	/// let field = ChoiceField::new("status", choices).required(true);
	/// assert_eq!(field.clean(Some(&json!(""))), Err(FieldError::required()));
	/// ```
	pub fn required(mut self, required: bool) -> Self {
		self.required = required;
		self
	}

	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::{ChoiceField, FormField};
	///
	/// let field = ChoiceField::new("status", Vec::new()).with_label("Status");
	/// assert_eq!(field.label(), Some("Status"));
	/// ```
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn valid_value(&self, value: &str) -> bool {
		self.choices.iter().any(|(key, _)| key == value)
	}
}

impl FormField for ChoiceField {
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

		let s = value
			.and_then(scalar_to_string)
			.ok_or_else(|| FieldError::invalid("Select a valid choice."))?;

		if !self.valid_value(&s) {
			return Err(FieldError::invalid(format!(
				"Select a valid choice. {s} is not one of the available choices."
			)));
		}

		Ok(Value::String(s))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn status_field() -> ChoiceField {
		ChoiceField::new(
			"status",
			vec![
				("draft".to_string(), "Draft".to_string()),
				("published".to_string(), "Published".to_string()),
			],
		)
	}

	#[rstest]
	fn test_invalid_choice_message() {
		let field = status_field();

		let result = field.clean(Some(&json!("archived")));

		assert_eq!(
			result,
			Err(FieldError::invalid(
				"Select a valid choice. archived is not one of the available choices."
			))
		);
	}

	#[rstest]
	fn test_widget_carries_choices() {
		let field = status_field();

		match field.widget() {
			Widget::Select { choices } => assert_eq!(choices.len(), 2),
			other => panic!("Expected Select widget, got {other:?}"),
		}
	}
}
