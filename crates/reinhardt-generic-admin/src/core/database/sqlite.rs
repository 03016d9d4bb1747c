//! SQLite backed [`BatchDatabase`]

use super::{BatchDatabase, QueryScope};
use crate::core::schema::{ModelSchema, Relation};
use crate::types::AdminResult;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};
use std::collections::HashSet;

/// Batch update storage on top of an sqlx SQLite pool
#[derive(Debug, Clone)]
pub struct SqliteBatchDatabase {
	pool: SqlitePool,
}

impl SqliteBatchDatabase {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Connect to `url`.
	///
	/// In-memory databases get a single connection so every query sees the
	/// same database.
	pub async fn connect(url: &str) -> AdminResult<Self> {
		let max_connections = if url.contains(":memory:") { 1 } else { 5 };
		let pool = SqlitePoolOptions::new()
			.max_connections(max_connections)
			.connect(url)
			.await?;
		Ok(Self::new(pool))
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}
}

#[async_trait]
impl BatchDatabase for SqliteBatchDatabase {
	async fn resolve_ids(
		&self,
		schema: &ModelSchema,
		ids: &[String],
		scope: &QueryScope,
	) -> AdminResult<Vec<String>> {
		if ids.is_empty() {
			return Ok(Vec::new());
		}
		let pk = quote_ident(&schema.pk_field);
		let mut query = QueryBuilder::<Sqlite>::new("SELECT ");
		query
			.push(&pk)
			.push(" FROM ")
			.push(quote_ident(&schema.table_name))
			.push(" WHERE ")
			.push(&pk)
			.push(" IN ");
		push_id_list(&mut query, ids);
		for (column, value) in scope.filters() {
			query.push(" AND ").push(quote_ident(column));
			if value.is_null() {
				query.push(" IS NULL");
			} else {
				query.push(" = ");
				push_value(&mut query, value);
			}
		}

		let rows = query.build().fetch_all(&self.pool).await?;
		let found = rows
			.iter()
			.map(|row| read_id(row, 0))
			.collect::<AdminResult<HashSet<String>>>()?;

		let mut resolved: Vec<String> = Vec::with_capacity(found.len());
		for id in ids {
			if found.contains(id) && !resolved.contains(id) {
				resolved.push(id.clone());
			}
		}
		tracing::debug!(
			table = %schema.table_name,
			requested = ids.len(),
			resolved = resolved.len(),
			"Resolved batch update targets"
		);
		Ok(resolved)
	}

	async fn bulk_update(
		&self,
		schema: &ModelSchema,
		ids: &[String],
		values: &[(String, Value)],
	) -> AdminResult<u64> {
		if ids.is_empty() || values.is_empty() {
			return Ok(0);
		}
		let mut query = QueryBuilder::<Sqlite>::new("UPDATE ");
		query.push(quote_ident(&schema.table_name)).push(" SET ");
		for (i, (column, value)) in values.iter().enumerate() {
			if i > 0 {
				query.push(", ");
			}
			query.push(quote_ident(column)).push(" = ");
			push_value(&mut query, value);
		}
		query
			.push(" WHERE ")
			.push(quote_ident(&schema.pk_field))
			.push(" IN ");
		push_id_list(&mut query, ids);

		let result = query.build().execute(&self.pool).await?;
		tracing::debug!(
			table = %schema.table_name,
			columns = values.len(),
			rows = result.rows_affected(),
			"Executed bulk update"
		);
		Ok(result.rows_affected())
	}

	async fn add_related(
		&self,
		relation: &Relation,
		id: &str,
		related: &[String],
	) -> AdminResult<u64> {
		let through = quote_ident(&relation.through_table);
		let source = quote_ident(&relation.source_column);
		let target = quote_ident(&relation.target_column);
		let mut created = 0;
		for related_id in related {
			let mut query = QueryBuilder::<Sqlite>::new("INSERT INTO ");
			query
				.push(&through)
				.push(" (")
				.push(&source)
				.push(", ")
				.push(&target)
				.push(") SELECT ");
			push_id(&mut query, id);
			query.push(", ");
			push_id(&mut query, related_id);
			query
				.push(" WHERE NOT EXISTS (SELECT 1 FROM ")
				.push(&through)
				.push(" WHERE ")
				.push(&source)
				.push(" = ");
			push_id(&mut query, id);
			query.push(" AND ").push(&target).push(" = ");
			push_id(&mut query, related_id);
			query.push(")");

			created += query.build().execute(&self.pool).await?.rows_affected();
		}
		Ok(created)
	}

	async fn remove_related(
		&self,
		relation: &Relation,
		id: &str,
		related: &[String],
	) -> AdminResult<u64> {
		if related.is_empty() {
			return Ok(0);
		}
		let mut query = QueryBuilder::<Sqlite>::new("DELETE FROM ");
		query
			.push(quote_ident(&relation.through_table))
			.push(" WHERE ")
			.push(quote_ident(&relation.source_column))
			.push(" = ");
		push_id(&mut query, id);
		query
			.push(" AND ")
			.push(quote_ident(&relation.target_column))
			.push(" IN ");
		push_id_list(&mut query, related);

		Ok(query.build().execute(&self.pool).await?.rows_affected())
	}

	async fn related_ids(&self, relation: &Relation, id: &str) -> AdminResult<Vec<String>> {
		let target = quote_ident(&relation.target_column);
		let mut query = QueryBuilder::<Sqlite>::new("SELECT ");
		query
			.push(&target)
			.push(" FROM ")
			.push(quote_ident(&relation.through_table))
			.push(" WHERE ")
			.push(quote_ident(&relation.source_column))
			.push(" = ");
		push_id(&mut query, id);
		query.push(" ORDER BY ").push(&target);

		let rows = query.build().fetch_all(&self.pool).await?;
		rows.iter().map(|row| read_id(row, 0)).collect()
	}

	async fn related_choices(&self, relation: &Relation) -> AdminResult<Vec<(String, String)>> {
		let pk = quote_ident(&relation.related_pk);
		let mut query = QueryBuilder::<Sqlite>::new("SELECT ");
		query
			.push(&pk)
			.push(", CAST(")
			.push(quote_ident(&relation.label_column))
			.push(" AS TEXT) FROM ")
			.push(quote_ident(&relation.related_table))
			.push(" ORDER BY ")
			.push(&pk);

		let rows = query.build().fetch_all(&self.pool).await?;
		rows.iter()
			.map(|row| -> AdminResult<(String, String)> {
				let id = read_id(row, 0)?;
				let label: Option<String> = row.try_get(1)?;
				Ok((id, label.unwrap_or_default()))
			})
			.collect()
	}
}

fn quote_ident(name: &str) -> String {
	format!("\"{}\"", name.replace('"', "\"\""))
}

/// Ids are bound as text. Column affinity turns "1" into 1 for INTEGER keys
/// while TEXT keys such as "007" are compared verbatim.
fn push_id(query: &mut QueryBuilder<'_, Sqlite>, id: &str) {
	query.push_bind(id.to_string());
}

fn push_id_list(query: &mut QueryBuilder<'_, Sqlite>, ids: &[String]) {
	query.push("(");
	for (i, id) in ids.iter().enumerate() {
		if i > 0 {
			query.push(", ");
		}
		push_id(query, id);
	}
	query.push(")");
}

fn push_value(query: &mut QueryBuilder<'_, Sqlite>, value: &Value) {
	match value {
		Value::Null => {
			query.push_bind(Option::<String>::None);
		}
		Value::Bool(b) => {
			query.push_bind(*b);
		}
		Value::Number(n) => match n.as_i64() {
			Some(i) => {
				query.push_bind(i);
			}
			None => {
				query.push_bind(n.as_f64().unwrap_or_default());
			}
		},
		Value::String(s) => {
			query.push_bind(s.clone());
		}
		other => {
			query.push_bind(other.to_string());
		}
	}
}

fn read_id(row: &SqliteRow, index: usize) -> AdminResult<String> {
	if let Ok(n) = row.try_get::<i64, _>(index) {
		return Ok(n.to_string());
	}
	Ok(row.try_get::<String, _>(index)?)
}
