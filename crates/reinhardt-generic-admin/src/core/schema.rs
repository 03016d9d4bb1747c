//! Model schema metadata
//!
//! Describes the columns and many-to-many relations of a model so that
//! admin extensions can build forms and queries without model-specific code.

use serde::{Deserialize, Serialize};

/// Value type of a scalar column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScalarType {
	Text { max_length: Option<usize> },
	Integer,
	Float,
	Boolean,
	Date,
	Choice { choices: Vec<(String, String)> },
}

/// A many-to-many relation stored in a through table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
	/// Name of the related model
	pub related_model: String,
	/// Table holding the related records
	pub related_table: String,
	/// Primary key column of the related table
	pub related_pk: String,
	/// Column used as the human-readable label of related records
	pub label_column: String,
	/// Join table
	pub through_table: String,
	/// Join table column referencing the owning record
	pub source_column: String,
	/// Join table column referencing the related record
	pub target_column: String,
}

impl Relation {
	/// Create a relation using Django-style join table naming
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_admin::core::Relation;
	///
	/// let relation = Relation::new("Tag", "blog_tag", "blog_article_tags", "article_id", "tag_id");
	/// assert_eq!(relation.related_pk, "id");
	/// assert_eq!(relation.label_column, "name");
	/// ```
	pub fn new(
		related_model: impl Into<String>,
		related_table: impl Into<String>,
		through_table: impl Into<String>,
		source_column: impl Into<String>,
		target_column: impl Into<String>,
	) -> Self {
		Self {
			related_model: related_model.into(),
			related_table: related_table.into(),
			related_pk: "id".to_string(),
			label_column: "name".to_string(),
			through_table: through_table.into(),
			source_column: source_column.into(),
			target_column: target_column.into(),
		}
	}

	pub fn with_related_pk(mut self, column: impl Into<String>) -> Self {
		self.related_pk = column.into();
		self
	}

	pub fn with_label_column(mut self, column: impl Into<String>) -> Self {
		self.label_column = column.into();
		self
	}
}

/// Storage kind of a model field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
	Scalar(ScalarType),
	ManyToMany(Relation),
}

/// A single model field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelField {
	pub name: String,
	pub verbose_name: Option<String>,
	pub kind: FieldKind,
	/// A blank value is not allowed when set
	pub required: bool,
	pub help_text: Option<String>,
}

impl ModelField {
	pub fn scalar(name: impl Into<String>, scalar: ScalarType) -> Self {
		Self {
			name: name.into(),
			verbose_name: None,
			kind: FieldKind::Scalar(scalar),
			required: true,
			help_text: None,
		}
	}

	pub fn text(name: impl Into<String>, max_length: Option<usize>) -> Self {
		Self::scalar(name, ScalarType::Text { max_length })
	}

	pub fn integer(name: impl Into<String>) -> Self {
		Self::scalar(name, ScalarType::Integer)
	}

	pub fn float(name: impl Into<String>) -> Self {
		Self::scalar(name, ScalarType::Float)
	}

	pub fn boolean(name: impl Into<String>) -> Self {
		Self::scalar(name, ScalarType::Boolean)
	}

	pub fn date(name: impl Into<String>) -> Self {
		Self::scalar(name, ScalarType::Date)
	}

	pub fn choice<K, L>(name: impl Into<String>, choices: impl IntoIterator<Item = (K, L)>) -> Self
	where
		K: Into<String>,
		L: Into<String>,
	{
		let choices = choices
			.into_iter()
			.map(|(key, label)| (key.into(), label.into()))
			.collect();
		Self::scalar(name, ScalarType::Choice { choices })
	}

	pub fn many_to_many(name: impl Into<String>, relation: Relation) -> Self {
		Self {
			name: name.into(),
			verbose_name: None,
			kind: FieldKind::ManyToMany(relation),
			required: true,
			help_text: None,
		}
	}

	pub fn with_verbose_name(mut self, verbose_name: impl Into<String>) -> Self {
		self.verbose_name = Some(verbose_name.into());
		self
	}

	pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
		self.help_text = Some(help_text.into());
		self
	}

	/// Allow blank values
	pub fn blank(mut self) -> Self {
		self.required = false;
		self
	}

	/// Human-readable name, derived from the field name when not set
	pub fn display_name(&self) -> String {
		self.verbose_name
			.clone()
			.unwrap_or_else(|| self.name.replace('_', " "))
	}

	pub fn is_relationship(&self) -> bool {
		matches!(self.kind, FieldKind::ManyToMany(_))
	}
}

/// Metadata of an administered model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSchema {
	pub app_label: String,
	pub model_name: String,
	pub table_name: String,
	pub pk_field: String,
	pub verbose_name: String,
	pub verbose_name_plural: String,
	pub fields: Vec<ModelField>,
}

impl ModelSchema {
	/// Create a schema with defaults derived from the model name
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_admin::core::ModelSchema;
	///
	/// let schema = ModelSchema::new("blog", "BlogPost");
	/// assert_eq!(schema.table_name, "blog_blogpost");
	/// assert_eq!(schema.pk_field, "id");
	/// assert_eq!(schema.verbose_name, "blogpost");
	/// assert_eq!(schema.verbose_name_plural, "blogposts");
	/// ```
	pub fn new(app_label: impl Into<String>, model_name: impl Into<String>) -> Self {
		let app_label = app_label.into();
		let model_name = model_name.into();
		let lower = model_name.to_lowercase();
		Self {
			table_name: format!("{}_{}", app_label, lower),
			pk_field: "id".to_string(),
			verbose_name: lower.clone(),
			verbose_name_plural: format!("{}s", lower),
			app_label,
			model_name,
			fields: Vec::new(),
		}
	}

	pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
		self.table_name = table_name.into();
		self
	}

	pub fn with_pk_field(mut self, pk_field: impl Into<String>) -> Self {
		self.pk_field = pk_field.into();
		self
	}

	pub fn with_verbose_names(
		mut self,
		singular: impl Into<String>,
		plural: impl Into<String>,
	) -> Self {
		self.verbose_name = singular.into();
		self.verbose_name_plural = plural.into();
		self
	}

	pub fn with_field(mut self, field: ModelField) -> Self {
		self.fields.push(field);
		self
	}

	pub fn field(&self, name: &str) -> Option<&ModelField> {
		self.fields.iter().find(|f| f.name == name)
	}

	/// Lowercase model name used in URLs and permission codenames
	pub fn model_key(&self) -> String {
		self.model_name.to_lowercase()
	}

	/// `app_label.model` identifier
	pub fn label(&self) -> String {
		format!("{}.{}", self.app_label, self.model_key())
	}

	/// Verbose name matching a record count
	pub fn verbose_name_for(&self, count: u64) -> &str {
		if count == 1 {
			&self.verbose_name
		} else {
			&self.verbose_name_plural
		}
	}
}
