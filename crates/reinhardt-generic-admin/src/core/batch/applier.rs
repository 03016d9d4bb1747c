//! Applying cleaned values to a set of records
//!
//! Scalar values are written with one bulk statement. Relationship additions
//! and removals are then applied record by record, additions first.

use super::collector::{CleanedValue, UpdateValues};
use super::splitter::FieldRole;
use crate::core::database::{BatchDatabase, QueryScope};
use crate::core::schema::{FieldKind, ModelSchema, Relation};
use crate::types::{AdminError, AdminResult, parse_ids};
use serde_json::Value;
use std::sync::Arc;

/// Records a batch update applies to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetRecordSet {
	ids: Vec<String>,
}

impl TargetRecordSet {
	/// Parse a comma-separated id list
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_admin::core::batch::TargetRecordSet;
	///
	/// let targets = TargetRecordSet::parse("4, 5,,4");
	/// assert_eq!(targets.ids(), &["4".to_string(), "5".to_string()]);
	/// assert_eq!(targets.to_query_value(), "4,5");
	/// ```
	pub fn parse(raw: &str) -> Self {
		Self {
			ids: parse_ids(raw),
		}
	}

	pub fn from_ids<I, S>(ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut unique: Vec<String> = Vec::new();
		for id in ids.into_iter().map(Into::into) {
			if !id.is_empty() && !unique.contains(&id) {
				unique.push(id);
			}
		}
		Self { ids: unique }
	}

	/// Keep only the ids that exist in the store and fall inside `scope`
	pub async fn resolve(
		&self,
		db: &dyn BatchDatabase,
		schema: &ModelSchema,
		scope: &QueryScope,
	) -> AdminResult<Self> {
		let ids = db.resolve_ids(schema, &self.ids, scope).await?;
		Ok(Self { ids })
	}

	pub fn ids(&self) -> &[String] {
		&self.ids
	}

	pub fn len(&self) -> usize {
		self.ids.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}

	/// Value of the `ids` query parameter
	pub fn to_query_value(&self) -> String {
		self.ids.join(",")
	}
}

/// Outcome of applying a batch update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyResult {
	/// Rows matched by the bulk scalar update, when one ran
	pub scalar_rows: Option<u64>,
	/// Distinct records whose relationships were changed
	pub records_visited: usize,
	/// Add and remove calls issued against the store
	pub relation_operations: usize,
}

impl ApplyResult {
	/// Number of records reported to the operator.
	///
	/// The bulk row count wins when a scalar update ran. Otherwise it is the
	/// number of records whose relationships were processed.
	pub fn count(&self) -> u64 {
		self.scalar_rows
			.unwrap_or(self.records_visited as u64)
	}
}

/// One bulk statement writing every selected scalar column
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarUpdate {
	values: Vec<(String, Value)>,
}

impl ScalarUpdate {
	pub fn values(&self) -> &[(String, Value)] {
		&self.values
	}

	pub async fn execute(
		&self,
		db: &dyn BatchDatabase,
		schema: &ModelSchema,
		targets: &TargetRecordSet,
	) -> AdminResult<u64> {
		db.bulk_update(schema, targets.ids(), &self.values).await
	}
}

/// Direction of a relationship change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationChange {
	Add,
	Remove,
}

/// Adds or removes the same references on every target record
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipUpdate {
	pub field: String,
	pub relation: Relation,
	pub change: RelationChange,
	pub related: Vec<String>,
}

impl RelationshipUpdate {
	/// Apply to each target, returning the number of store calls issued
	pub async fn execute(
		&self,
		db: &dyn BatchDatabase,
		targets: &TargetRecordSet,
	) -> AdminResult<usize> {
		let mut operations = 0;
		for id in targets.ids() {
			let changed = match self.change {
				RelationChange::Add => db.add_related(&self.relation, id, &self.related).await?,
				RelationChange::Remove => {
					db.remove_related(&self.relation, id, &self.related)
						.await?
				}
			};
			tracing::trace!(field = %self.field, record = %id, changed, "Relationship updated");
			operations += 1;
		}
		Ok(operations)
	}
}

/// Ordered work derived from cleaned values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyPlan {
	pub scalar: Option<ScalarUpdate>,
	pub additions: Vec<RelationshipUpdate>,
	pub removals: Vec<RelationshipUpdate>,
}

impl ApplyPlan {
	/// Partition cleaned values by field kind
	pub fn from_values(schema: &ModelSchema, values: &UpdateValues) -> AdminResult<Self> {
		let mut plan = Self::default();
		let mut scalar_values: Vec<(String, Value)> = Vec::new();

		for (field, value) in values.iter() {
			match (field.role, value) {
				(FieldRole::Replace, CleanedValue::Scalar(value)) => {
					scalar_values.push((field.source.clone(), value.clone()));
				}
				(FieldRole::Add | FieldRole::Remove, CleanedValue::Related(related)) => {
					let relation = schema
						.field(&field.source)
						.and_then(|f| match &f.kind {
							FieldKind::ManyToMany(relation) => Some(relation.clone()),
							FieldKind::Scalar(_) => None,
						})
						.ok_or_else(|| {
							AdminError::ImproperlyConfigured(format!(
								"'{}' is not a many-to-many field of '{}'",
								field.source,
								schema.label()
							))
						})?;
					let update = RelationshipUpdate {
						field: field.source.clone(),
						relation,
						change: if field.role == FieldRole::Add {
							RelationChange::Add
						} else {
							RelationChange::Remove
						},
						related: related.clone(),
					};
					match update.change {
						RelationChange::Add => plan.additions.push(update),
						RelationChange::Remove => plan.removals.push(update),
					}
				}
				_ => {
					return Err(AdminError::ValidationError(format!(
						"value of '{}' does not match its field kind",
						field.name
					)));
				}
			}
		}

		if !scalar_values.is_empty() {
			plan.scalar = Some(ScalarUpdate {
				values: scalar_values,
			});
		}
		Ok(plan)
	}

	pub fn is_empty(&self) -> bool {
		self.scalar.is_none() && self.additions.is_empty() && self.removals.is_empty()
	}

	pub fn has_relationship_changes(&self) -> bool {
		!self.additions.is_empty() || !self.removals.is_empty()
	}
}

/// Writes cleaned values to a target record set
pub struct BatchApplier {
	db: Arc<dyn BatchDatabase>,
	schema: Arc<ModelSchema>,
	scope: QueryScope,
}

impl BatchApplier {
	pub fn new(db: Arc<dyn BatchDatabase>, schema: Arc<ModelSchema>) -> Self {
		Self {
			db,
			schema,
			scope: QueryScope::all(),
		}
	}

	/// Restrict the records that may be touched
	pub fn with_scope(mut self, scope: QueryScope) -> Self {
		self.scope = scope;
		self
	}

	/// Apply `values` to every record of `targets` that resolves in scope.
	///
	/// An empty resolved set touches nothing. Writes are not wrapped in a
	/// transaction: a failure part way leaves earlier writes in place.
	pub async fn apply(
		&self,
		targets: &TargetRecordSet,
		values: &UpdateValues,
	) -> AdminResult<ApplyResult> {
		let plan = ApplyPlan::from_values(&self.schema, values)?;
		let mut result = ApplyResult::default();
		if targets.is_empty() || plan.is_empty() {
			return Ok(result);
		}
		let resolved = targets
			.resolve(self.db.as_ref(), &self.schema, &self.scope)
			.await?;
		if resolved.is_empty() {
			tracing::debug!(
				model = %self.schema.label(),
				requested = targets.len(),
				"No batch update targets resolved"
			);
			return Ok(result);
		}

		if let Some(scalar) = &plan.scalar {
			result.scalar_rows = Some(
				scalar
					.execute(self.db.as_ref(), &self.schema, &resolved)
					.await?,
			);
		}
		for update in plan.additions.iter().chain(plan.removals.iter()) {
			result.relation_operations += update.execute(self.db.as_ref(), &resolved).await?;
		}
		if plan.has_relationship_changes() {
			result.records_visited = resolved.len();
		}

		tracing::info!(
			model = %self.schema.label(),
			targets = resolved.len(),
			scalar_rows = ?result.scalar_rows,
			relation_operations = result.relation_operations,
			"Applied batch update"
		);
		Ok(result)
	}
}
