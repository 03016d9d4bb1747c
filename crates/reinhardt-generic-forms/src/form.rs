//! Form-level errors and submitted data handling

use crate::field::FieldError;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Special key for form-level (non-field-specific) errors.
pub const ALL_FIELDS_KEY: &str = "_all";

#[derive(Debug, thiserror::Error)]
pub enum FormError {
	#[error("Field error in {field}: {error}")]
	Field { field: String, error: FieldError },
	#[error("Validation error: {0}")]
	Validation(String),
	#[error("Malformed form data: {0}")]
	MalformedData(String),
}

pub type FormResult<T> = Result<T, FormError>;

/// Submitted form data, keyed by field name.
///
/// Keys submitted more than once are collected into a JSON array.
pub type FormData = HashMap<String, Value>;

/// Parse an `application/x-www-form-urlencoded` body into [`FormData`]
///
/// # Examples
///
/// ```
/// use reinhardt_generic_forms::parse_form_data;
/// use serde_json::json;
///
/// let data = parse_form_data("status=published&tags=1&tags=2").unwrap();
/// assert_eq!(data.get("status"), Some(&json!("published")));
/// assert_eq!(data.get("tags"), Some(&json!(["1", "2"])));
/// ```
pub fn parse_form_data(body: &str) -> FormResult<FormData> {
	let pairs: Vec<(String, String)> =
		serde_urlencoded::from_str(body).map_err(|e| FormError::MalformedData(e.to_string()))?;

	let mut data = FormData::new();
	for (key, value) in pairs {
		match data.remove(&key) {
			None => {
				data.insert(key, Value::String(value));
			}
			Some(Value::Array(mut items)) => {
				items.push(Value::String(value));
				data.insert(key, Value::Array(items));
			}
			Some(existing) => {
				data.insert(key, Value::Array(vec![existing, Value::String(value)]));
			}
		}
	}
	Ok(data)
}

/// Errors collected while validating a form.
///
/// Field errors are keyed by field name, form-level errors by [`ALL_FIELDS_KEY`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
	errors: HashMap<String, Vec<String>>,
}

impl FormErrors {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
		self.errors
			.entry(field.into())
			.or_default()
			.push(message.into());
	}

	pub fn add_non_field(&mut self, message: impl Into<String>) {
		self.add(ALL_FIELDS_KEY, message);
	}

	pub fn get(&self, field: &str) -> &[String] {
		self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn non_field_errors(&self) -> &[String] {
		self.get(ALL_FIELDS_KEY)
	}

	/// Names of fields carrying errors, excluding form-level errors
	pub fn fields(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self
			.errors
			.keys()
			.map(String::as_str)
			.filter(|k| *k != ALL_FIELDS_KEY)
			.collect();
		names.sort_unstable();
		names
	}

	pub fn is_empty(&self) -> bool {
		self.errors.values().all(Vec::is_empty)
	}

	/// Total number of error messages
	pub fn len(&self) -> usize {
		self.errors.values().map(Vec::len).sum()
	}

	pub fn clear(&mut self) {
		self.errors.clear();
	}

	pub fn as_map(&self) -> &HashMap<String, Vec<String>> {
		&self.errors
	}
}
