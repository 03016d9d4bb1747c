//! In-memory [`BatchDatabase`]

use super::{BatchDatabase, QueryScope, value_to_string};
use crate::core::schema::{ModelSchema, Relation};
use crate::types::{AdminError, AdminResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Column values of one stored record
pub type Record = HashMap<String, Value>;

#[derive(Debug, Default)]
struct MemoryState {
	tables: HashMap<String, BTreeMap<String, Record>>,
	links: HashMap<String, Vec<(String, String)>>,
	bulk_statements: usize,
	fail_writes: bool,
}

/// Thread-safe in-memory store.
///
/// Tables are keyed by table name and records by primary key, compared as exact strings.
/// Many-to-many links are kept per through table.
#[derive(Debug, Default)]
pub struct InMemoryBatchDatabase {
	state: RwLock<MemoryState>,
}

impl InMemoryBatchDatabase {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert or replace a record
	pub fn insert(&self, table: &str, id: &str, record: Record) {
		self.state
			.write()
			.tables
			.entry(table.to_string())
			.or_default()
			.insert(id.to_string(), record);
	}

	pub fn record(&self, table: &str, id: &str) -> Option<Record> {
		self.state
			.read()
			.tables
			.get(table)
			.and_then(|records| records.get(id))
			.cloned()
	}

	pub fn link(&self, through_table: &str, source: &str, target: &str) {
		let mut state = self.state.write();
		let links = state.links.entry(through_table.to_string()).or_default();
		let pair = (source.to_string(), target.to_string());
		if !links.contains(&pair) {
			links.push(pair);
		}
	}

	/// Number of bulk update statements executed so far
	pub fn bulk_statements(&self) -> usize {
		self.state.read().bulk_statements
	}

	/// Make every write fail, to exercise storage error paths
	pub fn set_fail_writes(&self, fail: bool) {
		self.state.write().fail_writes = fail;
	}

	fn check_writable(state: &MemoryState) -> AdminResult<()> {
		if state.fail_writes {
			return Err(AdminError::DatabaseError(
				"store is read-only".to_string(),
			));
		}
		Ok(())
	}
}

fn matches_scope(record: &Record, scope: &QueryScope) -> bool {
	scope.filters().iter().all(|(column, expected)| {
		let actual = record.get(column).unwrap_or(&Value::Null);
		actual == expected || value_to_string(actual) == value_to_string(expected)
	})
}

#[async_trait]
impl BatchDatabase for InMemoryBatchDatabase {
	async fn resolve_ids(
		&self,
		schema: &ModelSchema,
		ids: &[String],
		scope: &QueryScope,
	) -> AdminResult<Vec<String>> {
		let state = self.state.read();
		let Some(records) = state.tables.get(&schema.table_name) else {
			return Ok(Vec::new());
		};
		let mut resolved: Vec<String> = Vec::new();
		for id in ids {
			let in_scope = records
				.get(id)
				.is_some_and(|record| matches_scope(record, scope));
			if in_scope && !resolved.contains(id) {
				resolved.push(id.clone());
			}
		}
		Ok(resolved)
	}

	async fn bulk_update(
		&self,
		schema: &ModelSchema,
		ids: &[String],
		values: &[(String, Value)],
	) -> AdminResult<u64> {
		let mut state = self.state.write();
		Self::check_writable(&state)?;
		if ids.is_empty() || values.is_empty() {
			return Ok(0);
		}
		state.bulk_statements += 1;
		let Some(records) = state.tables.get_mut(&schema.table_name) else {
			return Ok(0);
		};
		let mut updated = 0;
		for id in ids {
			if let Some(record) = records.get_mut(id) {
				for (column, value) in values {
					record.insert(column.clone(), value.clone());
				}
				updated += 1;
			}
		}
		Ok(updated)
	}

	async fn add_related(
		&self,
		relation: &Relation,
		id: &str,
		related: &[String],
	) -> AdminResult<u64> {
		let mut state = self.state.write();
		Self::check_writable(&state)?;
		let links = state
			.links
			.entry(relation.through_table.clone())
			.or_default();
		let mut created = 0;
		for target in related {
			let pair = (id.to_string(), target.clone());
			if !links.contains(&pair) {
				links.push(pair);
				created += 1;
			}
		}
		Ok(created)
	}

	async fn remove_related(
		&self,
		relation: &Relation,
		id: &str,
		related: &[String],
	) -> AdminResult<u64> {
		let mut state = self.state.write();
		Self::check_writable(&state)?;
		let Some(links) = state.links.get_mut(&relation.through_table) else {
			return Ok(0);
		};
		let before = links.len();
		links.retain(|(s, t)| !(s == id && related.contains(t)));
		Ok((before - links.len()) as u64)
	}

	async fn related_ids(&self, relation: &Relation, id: &str) -> AdminResult<Vec<String>> {
		let state = self.state.read();
		let mut ids: Vec<String> = state
			.links
			.get(&relation.through_table)
			.map(|links| {
				links
					.iter()
					.filter(|(s, _)| s == id)
					.map(|(_, t)| t.clone())
					.collect()
			})
			.unwrap_or_default();
		ids.sort_by(|a, b| match (a.parse::<i64>(), b.parse::<i64>()) {
			(Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
			_ => a.cmp(b),
		});
		Ok(ids)
	}

	async fn related_choices(&self, relation: &Relation) -> AdminResult<Vec<(String, String)>> {
		let state = self.state.read();
		let Some(records) = state.tables.get(&relation.related_table) else {
			return Ok(Vec::new());
		};
		Ok(records
			.iter()
			.map(|(id, record)| {
				let label = record
					.get(&relation.label_column)
					.map(value_to_string)
					.unwrap_or_default();
				(id.clone(), label)
			})
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn record(pairs: &[(&str, Value)]) -> Record {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.clone()))
			.collect()
	}

	#[rstest]
	#[tokio::test]
	async fn test_bulk_update_counts_statements() {
		// Arrange
		let db = InMemoryBatchDatabase::new();
		let schema = ModelSchema::new("blog", "Article");
		db.insert("blog_article", "1", record(&[("featured", json!(false))]));
		db.insert("blog_article", "2", record(&[("featured", json!(false))]));

		// Act
		let rows = db
			.bulk_update(
				&schema,
				&["1".to_string(), "2".to_string(), "3".to_string()],
				&[("featured".to_string(), json!(true))],
			)
			.await
			.unwrap();

		// Assert
		assert_eq!(rows, 2);
		assert_eq!(db.bulk_statements(), 1);
		assert_eq!(
			db.record("blog_article", "2").unwrap().get("featured"),
			Some(&json!(true))
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_resolve_ids_applies_scope() {
		// Arrange
		let db = InMemoryBatchDatabase::new();
		let schema = ModelSchema::new("blog", "Article");
		db.insert("blog_article", "1", record(&[("site_id", json!(1))]));
		db.insert("blog_article", "2", record(&[("site_id", json!(2))]));
		let scope = QueryScope::all().filter("site_id", json!(2));

		// Act
		let ids = db
			.resolve_ids(&schema, &["1".to_string(), "2".to_string()], &scope)
			.await
			.unwrap();

		// Assert
		assert_eq!(ids, vec!["2".to_string()]);
	}

	#[rstest]
	#[tokio::test]
	async fn test_failing_writes_surface_database_errors() {
		let db = InMemoryBatchDatabase::new();
		let relation = Relation::new("Tag", "blog_tag", "blog_article_tags", "article_id", "tag_id");
		db.set_fail_writes(true);

		let result = db.add_related(&relation, "1", &["1".to_string()]).await;

		assert!(matches!(result, Err(AdminError::DatabaseError(_))));
	}
}
