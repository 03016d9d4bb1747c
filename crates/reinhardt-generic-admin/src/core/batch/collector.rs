//! Value collection
//!
//! Builds the value field for every virtual field and cleans the submitted
//! values of the selected ones. Unselected fields are never validated.

use super::descriptor::FieldDescriptor;
use super::selector::UpdateSelection;
use super::splitter::{FieldRole, VirtualField};
use crate::core::schema::ScalarType;
use reinhardt_generic_forms::{
	BooleanField, CharField, ChoiceField, DateField, FloatField, FormData, FormErrors, FormField,
	IntegerField, ModelMultipleChoiceField,
};
use serde_json::Value;
use std::collections::HashMap;

/// A cleaned value ready to be applied
#[derive(Debug, Clone, PartialEq)]
pub enum CleanedValue {
	/// New value of a scalar column
	Scalar(Value),
	/// Primary keys of related records
	Related(Vec<String>),
}

/// Cleaned values of the selected virtual fields, in form order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateValues {
	entries: Vec<(VirtualField, CleanedValue)>,
}

impl UpdateValues {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, field: VirtualField, value: CleanedValue) {
		self.entries.push((field, value));
	}

	pub fn iter(&self) -> impl Iterator<Item = (&VirtualField, &CleanedValue)> {
		self.entries.iter().map(|(field, value)| (field, value))
	}

	pub fn get(&self, name: &str) -> Option<&CleanedValue> {
		self.entries
			.iter()
			.find(|(field, _)| field.name == name)
			.map(|(_, value)| value)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Build the form field that carries the value of a virtual field.
///
/// `choices` lists the related records of a relationship and is ignored for
/// scalar fields.
pub fn value_field_for(
	field: &VirtualField,
	descriptor: &FieldDescriptor,
	choices: &[(String, String)],
) -> Box<dyn FormField> {
	let name = field.name.clone();
	let label = field.label.clone();
	let required = descriptor.required();

	if field.role != FieldRole::Replace {
		let mut related = ModelMultipleChoiceField::new(name, choices.to_vec())
			.required(required)
			.with_label(label);
		if let Some(help) = descriptor.help_text() {
			related = related.with_help_text(help);
		}
		return Box::new(related);
	}

	match descriptor.scalar_type() {
		Some(ScalarType::Text { max_length }) => {
			let mut text = CharField::new(name).with_label(label).required(required);
			if let Some(max) = max_length {
				text = text.with_max_length(*max);
			}
			if let Some(help) = descriptor.help_text() {
				text = text.with_help_text(help);
			}
			Box::new(text)
		}
		Some(ScalarType::Integer) => Box::new(
			IntegerField::new(name)
				.with_label(label)
				.required(required),
		),
		Some(ScalarType::Float) => Box::new(
			FloatField::new(name)
				.with_label(label)
				.required(required),
		),
		// An unchecked box is a meaningful value
		Some(ScalarType::Boolean) => Box::new(BooleanField::new(name).with_label(label)),
		Some(ScalarType::Date) => Box::new(
			DateField::new(name)
				.with_label(label)
				.required(required),
		),
		Some(ScalarType::Choice { choices }) => Box::new(
			ChoiceField::new(name, choices.clone())
				.with_label(label)
				.required(required),
		),
		None => Box::new(
			CharField::new(name)
				.with_label(label)
				.required(required),
		),
	}
}

/// Clean the submitted value of every selected field.
///
/// Errors are keyed by virtual field name. All selected fields are checked
/// before returning so that every problem is reported at once.
pub fn collect_values(
	selection: &UpdateSelection,
	value_fields: &HashMap<String, Box<dyn FormField>>,
	data: &FormData,
) -> Result<UpdateValues, FormErrors> {
	let mut values = UpdateValues::new();
	let mut errors = FormErrors::new();

	for field in selection.active() {
		let Some(form_field) = value_fields.get(&field.name) else {
			errors.add(&field.name, "This field cannot be updated.");
			continue;
		};
		match form_field.clean(data.get(&field.name)) {
			Ok(cleaned) => values.push(field.clone(), to_cleaned_value(field, cleaned)),
			Err(err) => errors.add(&field.name, err.to_string()),
		}
	}

	if errors.is_empty() {
		Ok(values)
	} else {
		Err(errors)
	}
}

fn to_cleaned_value(field: &VirtualField, cleaned: Value) -> CleanedValue {
	if !field.is_relationship() {
		return CleanedValue::Scalar(cleaned);
	}
	let ids = match cleaned {
		Value::Array(items) => items
			.into_iter()
			.filter_map(|item| match item {
				Value::String(s) => Some(s),
				Value::Null => None,
				other => Some(other.to_string()),
			})
			.collect(),
		Value::Null => Vec::new(),
		Value::String(s) => vec![s],
		other => vec![other.to_string()],
	};
	CleanedValue::Related(ids)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::batch::splitter::{SplitFields, split_fields};
	use crate::core::schema::{ModelField, ModelSchema, Relation};
	use reinhardt_generic_forms::parse_form_data;
	use rstest::{fixture, rstest};
	use serde_json::json;

	struct Fixture {
		split: SplitFields,
		value_fields: HashMap<String, Box<dyn FormField>>,
	}

	#[fixture]
	fn form_fields() -> Fixture {
		let schema = ModelSchema::new("blog", "Article")
			.with_field(ModelField::text("title", Some(10)))
			.with_field(ModelField::integer("rating").blank())
			.with_field(ModelField::boolean("featured"))
			.with_field(ModelField::many_to_many(
				"tags",
				Relation::new("Tag", "blog_tag", "blog_article_tags", "article_id", "tag_id"),
			));
		let descriptors =
			FieldDescriptor::from_schema(&schema, &["title", "rating", "featured", "tags"])
				.unwrap();
		let split = split_fields(&descriptors);
		let choices = vec![
			("1".to_string(), "rust".to_string()),
			("2".to_string(), "web".to_string()),
		];
		let value_fields = split
			.iter()
			.map(|field| {
				let descriptor = descriptors
					.iter()
					.find(|d| d.name() == field.source)
					.unwrap();
				(
					field.name.clone(),
					value_field_for(field, descriptor, &choices),
				)
			})
			.collect();
		Fixture {
			split,
			value_fields,
		}
	}

	#[rstest]
	#[case("title", true)]
	#[case("rating", false)]
	#[case("featured", false)]
	#[case("m2m_add_tags", true)]
	#[case("m2m_remove_tags", true)]
	fn test_value_fields_are_required_unless_blank(
		form_fields: Fixture,
		#[case] name: &str,
		#[case] required: bool,
	) {
		let field = form_fields.value_fields.get(name).unwrap();

		assert_eq!(field.required(), required);
	}

	#[rstest]
	fn test_only_selected_fields_are_collected(form_fields: Fixture) {
		// Arrange
		let data =
			parse_form_data("updating-featured=on&featured=on&title=this+title+is+far+too+long")
				.unwrap();
		let selection = UpdateSelection::from_data(&form_fields.split, &data);

		// Act
		let values = collect_values(&selection, &form_fields.value_fields, &data).unwrap();

		// Assert
		assert_eq!(values.len(), 1);
		assert_eq!(
			values.get("featured"),
			Some(&CleanedValue::Scalar(json!(true)))
		);
	}

	#[rstest]
	fn test_unchecked_boolean_collects_false(form_fields: Fixture) {
		let data = parse_form_data("updating-featured=on").unwrap();
		let selection = UpdateSelection::from_data(&form_fields.split, &data);

		let values = collect_values(&selection, &form_fields.value_fields, &data).unwrap();

		assert_eq!(
			values.get("featured"),
			Some(&CleanedValue::Scalar(json!(false)))
		);
	}

	#[rstest]
	fn test_relationship_values_are_related_ids(form_fields: Fixture) {
		// Arrange
		let data = parse_form_data(
			"updating-m2m_add_tags=on&m2m_add_tags=1&m2m_add_tags=2&updating-m2m_remove_tags=on&m2m_remove_tags=2",
		)
		.unwrap();
		let selection = UpdateSelection::from_data(&form_fields.split, &data);

		// Act
		let values = collect_values(&selection, &form_fields.value_fields, &data).unwrap();

		// Assert
		assert_eq!(
			values.get("m2m_add_tags"),
			Some(&CleanedValue::Related(vec!["1".to_string(), "2".to_string()]))
		);
		assert_eq!(
			values.get("m2m_remove_tags"),
			Some(&CleanedValue::Related(vec!["2".to_string()]))
		);
	}

	#[rstest]
	fn test_all_errors_are_reported(form_fields: Fixture) {
		// Arrange
		let data = parse_form_data(
			"updating-title=on&title=this+title+is+far+too+long&updating-rating=on&rating=abc&updating-m2m_add_tags=on&m2m_add_tags=99",
		)
		.unwrap();
		let selection = UpdateSelection::from_data(&form_fields.split, &data);

		// Act
		let errors = collect_values(&selection, &form_fields.value_fields, &data).unwrap_err();

		// Assert
		assert_eq!(errors.fields(), vec!["m2m_add_tags", "rating", "title"]);
		assert_eq!(errors.get("rating"), &["Enter a whole number.".to_string()]);
	}

	#[rstest]
	fn test_blank_optional_integer_collects_null(form_fields: Fixture) {
		let data = parse_form_data("updating-rating=on&rating=").unwrap();
		let selection = UpdateSelection::from_data(&form_fields.split, &data);

		let values = collect_values(&selection, &form_fields.value_fields, &data).unwrap();

		assert_eq!(values.get("rating"), Some(&CleanedValue::Scalar(Value::Null)));
	}
}
