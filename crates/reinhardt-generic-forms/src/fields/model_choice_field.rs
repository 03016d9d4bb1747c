//! ModelMultipleChoiceField for selecting related model instances

use crate::field::{FieldError, FieldResult, FormField, Widget, scalar_to_string};
use serde_json::Value;
use std::collections::HashMap;

/// A field for selecting multiple model instances.
///
/// Choices are `(primary key, label)` pairs loaded from the related table.
/// Cleaned values are a JSON array of primary keys as strings, deduplicated
/// in submission order.
pub struct ModelMultipleChoiceField {
	pub name: String,
	pub label: Option<String>,
	pub required: bool,
	pub help_text: Option<String>,
	pub error_messages: HashMap<String, String>,
	pub widget: Widget,
	pub choices: Vec<(String, String)>,
}

impl ModelMultipleChoiceField {
	/// Create a new ModelMultipleChoiceField
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::{FormField, ModelMultipleChoiceField};
	/// use serde_json::json;
	///
	/// let tags = vec![
	///     ("1".to_string(), "rust".to_string()),
	///     ("2".to_string(), "programming".to_string()),
	///     ("3".to_string(), "web".to_string()),
	/// ];
	///
	/// let field = ModelMultipleChoiceField::new("tags", tags);
	/// assert_eq!(field.name(), "tags");
	/// assert!(FormField::required(&field));
	///
	/// let result = field.clean(Some(&json!(["1", 2, "1"])));
	/// assert_eq!(result, Ok(json!(["1", "2"])));
	/// ```
	pub fn new(name: impl Into<String>, choices: Vec<(String, String)>) -> Self {
		let mut error_messages = HashMap::new();
		error_messages.insert(
			"required".to_string(),
			"This field is required.".to_string(),
		);
		error_messages.insert(
			"invalid_choice".to_string(),
			"Select a valid choice. {value} is not one of the available choices.".to_string(),
		);
		error_messages.insert(
			"invalid_list".to_string(),
			"Enter a list of values.".to_string(),
		);

		Self {
			name: name.into(),
			label: None,
			required: true,
			help_text: None,
			error_messages,
			widget: Widget::SelectMultiple {
				choices: choices.clone(),
			},
			choices,
		}
	}

	/// Allow an empty selection when `required` is false
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::{FormField, ModelMultipleChoiceField};
	/// use serde_json::json;
	///
	/// let tags = vec![("1".to_string(), "rust".to_string())];
	///
	/// let field = ModelMultipleChoiceField::new("tags", tags).required(false);
	/// assert!(!field.required);
	/// assert_eq!(field.clean(None), Ok(json!([])));
	/// ```
	pub fn required(mut self, required: bool) -> Self {
		self.required = required;
		self
	}

	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::{FormField, ModelMultipleChoiceField};
	///
	/// let field = ModelMultipleChoiceField::new("m2m_add_tags", Vec::new())
	///     .with_label("Add tags");
	/// assert_eq!(field.label(), Some("Add tags"));
	/// ```
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::{FormField, ModelMultipleChoiceField};
	///
	/// let field = ModelMultipleChoiceField::new("tags", Vec::new())
	///     .with_help_text("Hold down Control to select more than one.");
	/// assert_eq!(
	///     field.help_text(),
	///     Some("Hold down Control to select more than one.")
	/// );
	/// ```
	pub fn with_help_text(mut self, text: impl Into<String>) -> Self {
		self.help_text = Some(text.into());
		self
	}

	fn message(&self, key: &str) -> String {
		self.error_messages.get(key).cloned().unwrap_or_default()
	}
}

impl FormField for ModelMultipleChoiceField {
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
		let submitted: Vec<String> = match value {
			None | Some(Value::Null) => Vec::new(),
			Some(Value::Array(items)) => {
				let mut keys = Vec::with_capacity(items.len());
				for item in items {
					let key = scalar_to_string(item)
						.ok_or_else(|| FieldError::invalid(self.message("invalid_list")))?;
					keys.push(key);
				}
				keys
			}
			Some(v @ (Value::String(_) | Value::Number(_))) => {
				scalar_to_string(v).into_iter().collect()
			}
			Some(_) => return Err(FieldError::invalid(self.message("invalid_list"))),
		};

		let mut keys: Vec<String> = Vec::with_capacity(submitted.len());
		for key in submitted {
			let key = key.trim().to_string();
			if key.is_empty() || keys.contains(&key) {
				continue;
			}
			keys.push(key);
		}

		if keys.is_empty() {
			if self.required {
				return Err(FieldError::required());
			}
			return Ok(Value::Array(Vec::new()));
		}

		for key in &keys {
			if !self.choices.iter().any(|(pk, _)| pk == key) {
				return Err(FieldError::invalid(
					self.message("invalid_choice").replace("{value}", key),
				));
			}
		}

		Ok(Value::Array(keys.into_iter().map(Value::String).collect()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn tags_field() -> ModelMultipleChoiceField {
		ModelMultipleChoiceField::new(
			"tags",
			vec![
				("1".to_string(), "rust".to_string()),
				("2".to_string(), "web".to_string()),
			],
		)
	}

	#[rstest]
	fn test_single_string_is_accepted(tags_field: ModelMultipleChoiceField) {
		assert_eq!(tags_field.clean(Some(&json!("2"))), Ok(json!(["2"])));
	}

	#[rstest]
	fn test_unknown_reference_is_rejected(tags_field: ModelMultipleChoiceField) {
		let result = tags_field.clean(Some(&json!(["1", "9"])));

		assert_eq!(
			result,
			Err(FieldError::invalid(
				"Select a valid choice. 9 is not one of the available choices."
			))
		);
	}

	#[rstest]
	fn test_required_rejects_empty(tags_field: ModelMultipleChoiceField) {
		assert_eq!(tags_field.clean(Some(&json!([]))), Err(FieldError::required()));
		assert_eq!(tags_field.clean(None), Err(FieldError::required()));
	}

	#[rstest]
	fn test_optional_empty_is_empty_list(tags_field: ModelMultipleChoiceField) {
		let field = tags_field.required(false);

		assert_eq!(field.clean(Some(&json!(""))), Ok(json!([])));
	}

	#[rstest]
	fn test_object_is_not_a_list(tags_field: ModelMultipleChoiceField) {
		assert_eq!(
			tags_field.clean(Some(&json!({"id": 1}))),
			Err(FieldError::invalid("Enter a list of values."))
		);
	}
}
