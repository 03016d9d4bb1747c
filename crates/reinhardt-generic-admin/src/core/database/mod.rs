//! Storage access for batch updates
//!
//! [`BatchDatabase`] is the seam between the batch update machinery and the
//! store. [`SqliteBatchDatabase`] targets a real database through sqlx,
//! [`InMemoryBatchDatabase`] backs tests and prototypes.

mod memory;
mod sqlite;

pub use memory::{InMemoryBatchDatabase, Record};
pub use sqlite::SqliteBatchDatabase;

use crate::core::schema::{ModelSchema, Relation};
use crate::types::AdminResult;
use async_trait::async_trait;
use serde_json::Value;

/// Equality filters restricting which records the admin may touch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryScope {
	filters: Vec<(String, Value)>,
}

impl QueryScope {
	/// A scope matching every record
	pub fn all() -> Self {
		Self::default()
	}

	/// Add an equality filter
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_admin::core::QueryScope;
	/// use serde_json::json;
	///
	/// let scope = QueryScope::all().filter("site_id", json!(1));
	/// assert_eq!(scope.filters().len(), 1);
	/// ```
	pub fn filter(mut self, column: impl Into<String>, value: Value) -> Self {
		self.filters.push((column.into(), value));
		self
	}

	pub fn filters(&self) -> &[(String, Value)] {
		&self.filters
	}

	pub fn is_unrestricted(&self) -> bool {
		self.filters.is_empty()
	}
}

/// Store operations used by batch updates
#[async_trait]
pub trait BatchDatabase: Send + Sync {
	/// Return the ids of `ids` that exist and fall inside `scope`, in the
	/// order given.
	async fn resolve_ids(
		&self,
		schema: &ModelSchema,
		ids: &[String],
		scope: &QueryScope,
	) -> AdminResult<Vec<String>>;

	/// Set `values` on every record in `ids` with a single statement,
	/// returning the number of rows matched.
	async fn bulk_update(
		&self,
		schema: &ModelSchema,
		ids: &[String],
		values: &[(String, Value)],
	) -> AdminResult<u64>;

	/// Link `related` to record `id`, skipping existing links.
	/// Returns the number of links created.
	async fn add_related(&self, relation: &Relation, id: &str, related: &[String])
	-> AdminResult<u64>;

	/// Unlink `related` from record `id`, ignoring missing links.
	/// Returns the number of links removed.
	async fn remove_related(
		&self,
		relation: &Relation,
		id: &str,
		related: &[String],
	) -> AdminResult<u64>;

	/// Ids currently linked to record `id`, sorted
	async fn related_ids(&self, relation: &Relation, id: &str) -> AdminResult<Vec<String>>;

	/// `(pk, label)` pairs of every record the relation may point to
	async fn related_choices(&self, relation: &Relation) -> AdminResult<Vec<(String, String)>>;
}

/// Stringify a stored value for use as a label or key
pub(crate) fn value_to_string(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		Value::Null => String::new(),
		other => other.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(json!("007"), "007")]
	#[case(json!(7), "7")]
	#[case(json!(true), "true")]
	#[case(Value::Null, "")]
	fn test_value_to_string(#[case] value: Value, #[case] expected: &str) {
		assert_eq!(value_to_string(&value), expected);
	}
}
