//! Core form field trait, widgets and field errors

use serde_json::Value;

/// Error raised when a single field fails to clean.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
	#[error("{0}")]
	Required(String),
	#[error("{0}")]
	Invalid(String),
	#[error("{0}")]
	Validation(String),
}

impl FieldError {
	/// The standard "required" error.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::FieldError;
	///
	/// assert_eq!(FieldError::required().to_string(), "This field is required.");
	/// ```
	pub fn required() -> Self {
		FieldError::Required("This field is required.".to_string())
	}

	pub fn invalid(message: impl Into<String>) -> Self {
		FieldError::Invalid(message.into())
	}

	pub fn validation(message: impl Into<String>) -> Self {
		FieldError::Validation(message.into())
	}
}

pub type FieldResult<T> = Result<T, FieldError>;

/// HTML widget used to render a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
	TextInput,
	NumberInput,
	CheckboxInput,
	DateInput,
	Select { choices: Vec<(String, String)> },
	SelectMultiple { choices: Vec<(String, String)> },
}

impl Widget {
	/// Short identifier used by templates to pick a rendering branch.
	pub fn kind(&self) -> &'static str {
		match self {
			Widget::TextInput => "text",
			Widget::NumberInput => "number",
			Widget::CheckboxInput => "checkbox",
			Widget::DateInput => "date",
			Widget::Select { .. } => "select",
			Widget::SelectMultiple { .. } => "select_multiple",
		}
	}

	/// Render the widget as an HTML fragment.
	///
	/// All attribute values and option labels are escaped.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_forms::Widget;
	/// use serde_json::json;
	///
	/// let html = Widget::TextInput.render("status", "id_status", Some(&json!("a<b")));
	/// assert_eq!(
	///     html,
	///     r#"<input type="text" name="status" id="id_status" value="a&lt;b">"#
	/// );
	/// ```
	pub fn render(&self, name: &str, id: &str, value: Option<&Value>) -> String {
		let name = escape_html(name);
		let id = escape_html(id);
		match self {
			Widget::TextInput | Widget::NumberInput | Widget::DateInput => {
				let input_type = match self {
					Widget::NumberInput => "number",
					Widget::DateInput => "date",
					_ => "text",
				};
				match value.and_then(scalar_to_string) {
					Some(v) => format!(
						r#"<input type="{input_type}" name="{name}" id="{id}" value="{}">"#,
						escape_html(&v)
					),
					None => format!(r#"<input type="{input_type}" name="{name}" id="{id}">"#),
				}
			}
			Widget::CheckboxInput => {
				if is_truthy(value) {
					format!(r#"<input type="checkbox" name="{name}" id="{id}" checked>"#)
				} else {
					format!(r#"<input type="checkbox" name="{name}" id="{id}">"#)
				}
			}
			Widget::Select { choices } => {
				let selected = value.and_then(scalar_to_string);
				let mut html = format!(r#"<select name="{name}" id="{id}">"#);
				for (key, label) in choices {
					push_option(&mut html, key, label, selected.as_deref() == Some(key));
				}
				html.push_str("</select>");
				html
			}
			Widget::SelectMultiple { choices } => {
				let selected = selected_values(value);
				let mut html = format!(r#"<select name="{name}" id="{id}" multiple>"#);
				for (key, label) in choices {
					push_option(&mut html, key, label, selected.contains(key));
				}
				html.push_str("</select>");
				html
			}
		}
	}
}

fn push_option(html: &mut String, key: &str, label: &str, selected: bool) {
	let key = escape_html(key);
	let label = escape_html(label);
	if selected {
		html.push_str(&format!(r#"<option value="{key}" selected>{label}</option>"#));
	} else {
		html.push_str(&format!(r#"<option value="{key}">{label}</option>"#));
	}
}

fn selected_values(value: Option<&Value>) -> Vec<String> {
	match value {
		Some(Value::Array(items)) => items.iter().filter_map(scalar_to_string).collect(),
		Some(v) => scalar_to_string(v).into_iter().collect(),
		None => Vec::new(),
	}
}

/// Convert a scalar JSON value to its form-data string representation.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		_ => None,
	}
}

/// Checkbox semantics for submitted values.
///
/// `true`, `"on"`, `"true"`, `"1"` and `"yes"` (any case) are truthy.
/// Everything else, including a missing value, is falsy.
///
/// # Examples
///
/// ```
/// use reinhardt_generic_forms::is_truthy;
/// use serde_json::json;
///
/// assert!(is_truthy(Some(&json!("on"))));
/// assert!(is_truthy(Some(&json!(true))));
/// assert!(!is_truthy(Some(&json!("off"))));
/// assert!(!is_truthy(None));
/// ```
pub fn is_truthy(value: Option<&Value>) -> bool {
	match value {
		Some(Value::Bool(b)) => *b,
		Some(Value::Number(n)) => n.as_i64().is_some_and(|i| i != 0),
		Some(Value::String(s)) => matches!(
			s.trim().to_ascii_lowercase().as_str(),
			"on" | "true" | "1" | "yes"
		),
		// Repeated keys (hidden input + checkbox) count as on if any is on
		Some(Value::Array(items)) => items.iter().any(|v| is_truthy(Some(v))),
		_ => false,
	}
}

/// Escape text for inclusion in HTML content and attribute values.
pub fn escape_html(input: &str) -> String {
	let mut out = String::with_capacity(input.len());
	for c in input.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#x27;"),
			_ => out.push(c),
		}
	}
	out
}

/// A form field that can clean submitted data.
pub trait FormField: Send + Sync {
	fn name(&self) -> &str;

	fn label(&self) -> Option<&str>;

	fn widget(&self) -> &Widget;

	fn required(&self) -> bool;

	fn initial(&self) -> Option<&Value> {
		None
	}

	fn help_text(&self) -> Option<&str> {
		None
	}

	/// Validate and normalize a submitted value.
	fn clean(&self, value: Option<&Value>) -> FieldResult<Value>;
}

/// Returns true for a missing, null or blank submitted value.
pub(crate) fn is_empty_value(value: Option<&Value>) -> bool {
	match value {
		None | Some(Value::Null) => true,
		Some(Value::String(s)) => s.trim().is_empty(),
		Some(Value::Array(items)) => items.is_empty(),
		_ => false,
	}
}
