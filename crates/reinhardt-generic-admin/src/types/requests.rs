//! Request types for admin extensions

use crate::types::{AdminError, AdminResult};
use serde::Deserialize;

/// Name of the list view checkbox carrying selected primary keys
pub const ACTION_CHECKBOX_NAME: &str = "_selected_action";

/// Query parameters of the batch update view
#[derive(Debug, Default, Deserialize)]
pub struct BatchUpdateQuery {
	/// Comma-separated primary keys of the target records
	#[serde(default)]
	pub ids: String,
}

impl BatchUpdateQuery {
	/// Parse a raw query string.
	///
	/// Unrelated parameters are ignored. A query that cannot be decoded,
	/// such as one repeating `ids`, is a validation error.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_admin::types::BatchUpdateQuery;
	///
	/// let query = BatchUpdateQuery::from_query_string("ids=1%2C2,3&page=2").unwrap();
	/// assert_eq!(query.ids(), vec!["1", "2", "3"]);
	///
	/// let empty = BatchUpdateQuery::from_query_string("").unwrap();
	/// assert!(empty.ids().is_empty());
	/// ```
	pub fn from_query_string(query: &str) -> AdminResult<Self> {
		serde_urlencoded::from_str(query).map_err(|e| {
			AdminError::ValidationError(format!("Invalid batch update query: {}", e))
		})
	}

	pub fn ids(&self) -> Vec<String> {
		parse_ids(&self.ids)
	}
}

/// Split a comma-separated id list.
///
/// Whitespace is trimmed, empty segments are dropped and duplicates are
/// collapsed keeping the first occurrence.
pub fn parse_ids(raw: &str) -> Vec<String> {
	let mut ids: Vec<String> = Vec::new();
	for id in raw.split(',').map(str::trim).filter(|id| !id.is_empty()) {
		if !ids.iter().any(|existing| existing == id) {
			ids.push(id.to_string());
		}
	}
	ids
}

/// Action submitted from a change list
#[derive(Debug, Clone)]
pub struct ActionRequest {
	pub action: String,
	pub selected: Vec<String>,
}

impl ActionRequest {
	/// Build from submitted list view form data
	pub fn from_form_data(data: &reinhardt_generic_forms::FormData) -> Self {
		let action = data
			.get("action")
			.and_then(|v| v.as_str())
			.unwrap_or_default()
			.to_string();
		let selected = match data.get(ACTION_CHECKBOX_NAME) {
			Some(serde_json::Value::Array(items)) => items
				.iter()
				.filter_map(|v| v.as_str().map(str::to_string))
				.collect(),
			Some(serde_json::Value::String(s)) => vec![s.clone()],
			_ => Vec::new(),
		};
		Self { action, selected }
	}
}
