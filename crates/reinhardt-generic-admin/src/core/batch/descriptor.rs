//! Descriptors of the model fields offered for batch update

use crate::core::schema::{FieldKind, ModelField, ModelSchema, Relation, ScalarType};
use crate::types::{AdminError, AdminResult};

/// A model field that may be batch updated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
	field: ModelField,
}

impl FieldDescriptor {
	pub fn new(field: ModelField) -> Self {
		Self { field }
	}

	/// Resolve configured field names against a schema, in the configured order.
	///
	/// Unknown names, the primary key and repeated names are configuration
	/// errors.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_admin::core::{FieldDescriptor, ModelField, ModelSchema};
	///
	/// let schema = ModelSchema::new("blog", "Article")
	///     .with_field(ModelField::text("title", Some(200)))
	///     .with_field(ModelField::boolean("featured"));
	///
	/// let descriptors = FieldDescriptor::from_schema(&schema, &["featured", "title"]).unwrap();
	/// assert_eq!(descriptors[0].name(), "featured");
	///
	/// assert!(FieldDescriptor::from_schema(&schema, &["body"]).is_err());
	/// ```
	pub fn from_schema<S: AsRef<str>>(
		schema: &ModelSchema,
		names: &[S],
	) -> AdminResult<Vec<FieldDescriptor>> {
		let mut descriptors: Vec<FieldDescriptor> = Vec::with_capacity(names.len());
		for name in names.iter().map(AsRef::as_ref) {
			if name == schema.pk_field {
				return Err(AdminError::ImproperlyConfigured(format!(
					"'{}' is the primary key of '{}' and cannot be batch updated",
					name,
					schema.label()
				)));
			}
			if descriptors.iter().any(|d| d.name() == name) {
				return Err(AdminError::ImproperlyConfigured(format!(
					"'{}' is listed more than once in batch_update_fields",
					name
				)));
			}
			let field = schema.field(name).ok_or_else(|| {
				AdminError::ImproperlyConfigured(format!(
					"'{}' is not a field of '{}'",
					name,
					schema.label()
				))
			})?;
			descriptors.push(Self::new(field.clone()));
		}
		Ok(descriptors)
	}

	pub fn name(&self) -> &str {
		&self.field.name
	}

	pub fn verbose_name(&self) -> String {
		self.field.display_name()
	}

	pub fn required(&self) -> bool {
		self.field.required
	}

	pub fn help_text(&self) -> Option<&str> {
		self.field.help_text.as_deref()
	}

	pub fn kind(&self) -> &FieldKind {
		&self.field.kind
	}

	pub fn is_relationship(&self) -> bool {
		self.field.is_relationship()
	}

	pub fn scalar_type(&self) -> Option<&ScalarType> {
		match &self.field.kind {
			FieldKind::Scalar(scalar) => Some(scalar),
			FieldKind::ManyToMany(_) => None,
		}
	}

	pub fn relation(&self) -> Option<&Relation> {
		match &self.field.kind {
			FieldKind::ManyToMany(relation) => Some(relation),
			FieldKind::Scalar(_) => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn schema() -> ModelSchema {
		ModelSchema::new("blog", "Article")
			.with_field(ModelField::text("title", Some(200)))
			.with_field(ModelField::boolean("featured"))
			.with_field(ModelField::many_to_many(
				"tags",
				Relation::new("Tag", "blog_tag", "blog_article_tags", "article_id", "tag_id"),
			))
	}

	#[rstest]
	fn test_from_schema_keeps_configured_order(schema: ModelSchema) {
		// Act
		let descriptors = FieldDescriptor::from_schema(&schema, &["tags", "title"]).unwrap();

		// Assert
		let names: Vec<&str> = descriptors.iter().map(FieldDescriptor::name).collect();
		assert_eq!(names, vec!["tags", "title"]);
		assert!(descriptors[0].is_relationship());
		assert!(descriptors[0].relation().is_some());
		assert!(descriptors[1].scalar_type().is_some());
	}

	#[rstest]
	#[case(&["body"], "is not a field")]
	#[case(&["id"], "primary key")]
	#[case(&["title", "title"], "more than once")]
	fn test_from_schema_rejects_bad_configuration(
		schema: ModelSchema,
		#[case] names: &[&str],
		#[case] expected: &str,
	) {
		// Act
		let result = FieldDescriptor::from_schema(&schema, names);

		// Assert
		match result {
			Err(AdminError::ImproperlyConfigured(message)) => assert!(message.contains(expected)),
			other => panic!("expected ImproperlyConfigured, got {:?}", other),
		}
	}
}
