//! Batch update form
//!
//! Ties the splitter, selector and collector together and tracks the
//! lifecycle of one submission:
//! `Unbound -> FieldsSelected -> Valid | Invalid -> Applied`.

use super::collector::{UpdateValues, collect_values, value_field_for};
use super::descriptor::FieldDescriptor;
use super::selector::UpdateSelection;
use super::splitter::{FieldRole, SplitFields, split_fields};
use crate::types::{AdminError, AdminResult};
use reinhardt_generic_forms::{
	BooleanField, BoundField, BoundFieldContext, FormData, FormErrors, FormField,
};
use serde::Serialize;
use std::collections::HashMap;

/// Lifecycle state of a [`BatchUpdateForm`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchFormState {
	Unbound,
	FieldsSelected,
	Valid,
	Invalid,
	Applied,
}

/// Template context for one virtual field: its toggle and its value widget
#[derive(Debug, Clone, Serialize)]
pub struct BatchFieldContext {
	pub name: String,
	pub label: String,
	pub role: FieldRole,
	pub selected: bool,
	pub toggle: BoundFieldContext,
	pub value: BoundFieldContext,
}

pub struct BatchUpdateForm {
	descriptors: Vec<FieldDescriptor>,
	fields: SplitFields,
	value_fields: HashMap<String, Box<dyn FormField>>,
	toggle_fields: HashMap<String, BooleanField>,
	data: FormData,
	state: BatchFormState,
	errors: FormErrors,
	selection: Option<UpdateSelection>,
	values: Option<UpdateValues>,
}

impl BatchUpdateForm {
	/// Build an unbound form.
	///
	/// `related_choices` maps relationship field names to the `(pk, label)`
	/// pairs of the records that may be added or removed.
	pub fn new(
		descriptors: Vec<FieldDescriptor>,
		related_choices: &HashMap<String, Vec<(String, String)>>,
	) -> Self {
		let fields = split_fields(&descriptors);
		let mut value_fields: HashMap<String, Box<dyn FormField>> = HashMap::new();
		let mut toggle_fields = HashMap::new();

		for field in &fields {
			let Some(descriptor) = descriptors.iter().find(|d| d.name() == field.source) else {
				continue;
			};
			let choices = related_choices
				.get(&field.source)
				.map(Vec::as_slice)
				.unwrap_or(&[]);
			value_fields.insert(
				field.name.clone(),
				value_field_for(field, descriptor, choices),
			);
			toggle_fields.insert(
				field.name.clone(),
				BooleanField::new(field.toggle_name()).with_label(field.label.clone()),
			);
		}

		Self {
			descriptors,
			fields,
			value_fields,
			toggle_fields,
			data: FormData::new(),
			state: BatchFormState::Unbound,
			errors: FormErrors::new(),
			selection: None,
			values: None,
		}
	}

	/// Bind submitted data, resetting any earlier validation
	pub fn bind(&mut self, data: FormData) {
		self.data = data;
		self.errors.clear();
		self.values = None;
		let selection = UpdateSelection::from_data(&self.fields, &self.data);
		self.state = if selection.is_empty() {
			BatchFormState::Unbound
		} else {
			BatchFormState::FieldsSelected
		};
		self.selection = Some(selection);
	}

	pub fn is_bound(&self) -> bool {
		self.selection.is_some()
	}

	/// Validate the bound data.
	///
	/// Returns false for unbound forms without recording errors.
	pub fn is_valid(&mut self) -> bool {
		match self.state {
			BatchFormState::Valid | BatchFormState::Applied => return true,
			BatchFormState::Invalid => return false,
			BatchFormState::Unbound | BatchFormState::FieldsSelected => {}
		}
		let Some(selection) = self.selection.as_ref() else {
			return false;
		};
		if selection.is_empty() {
			self.errors.add_non_field(super::selector::NOTHING_SELECTED);
			self.state = BatchFormState::Invalid;
			return false;
		}
		match collect_values(selection, &self.value_fields, &self.data) {
			Ok(values) => {
				self.values = Some(values);
				self.state = BatchFormState::Valid;
				true
			}
			Err(errors) => {
				self.errors = errors;
				self.state = BatchFormState::Invalid;
				false
			}
		}
	}

	pub fn state(&self) -> BatchFormState {
		self.state
	}

	pub fn errors(&self) -> &FormErrors {
		&self.errors
	}

	pub fn descriptors(&self) -> &[FieldDescriptor] {
		&self.descriptors
	}

	pub fn fields(&self) -> &SplitFields {
		&self.fields
	}

	pub fn selection(&self) -> Option<&UpdateSelection> {
		self.selection.as_ref()
	}

	/// Cleaned values, available once the form is valid
	pub fn values(&self) -> Option<&UpdateValues> {
		self.values.as_ref()
	}

	/// Model field names touched by the selection
	pub fn fields_to_update(&self) -> Vec<String> {
		self.selection
			.as_ref()
			.map(UpdateSelection::fields_to_update)
			.unwrap_or_default()
	}

	/// Verbose names of [`Self::fields_to_update`], for operator messages
	pub fn verbose_fields_to_update(&self) -> Vec<String> {
		self.fields_to_update()
			.iter()
			.filter_map(|name| self.descriptors.iter().find(|d| d.name() == name))
			.map(FieldDescriptor::verbose_name)
			.collect()
	}

	/// Record that the values were written
	pub fn mark_applied(&mut self) -> AdminResult<()> {
		if self.state != BatchFormState::Valid {
			return Err(AdminError::InvalidAction(format!(
				"cannot apply a batch update form in state {:?}",
				self.state
			)));
		}
		self.state = BatchFormState::Applied;
		Ok(())
	}

	/// Render contexts for every virtual field, in form order
	pub fn bound_fields(&self) -> Vec<BatchFieldContext> {
		let selected = |name: &str| {
			self.selection
				.as_ref()
				.is_some_and(|selection| selection.is_active(name))
		};
		self.fields
			.iter()
			.filter_map(|field| {
				let value_field = self.value_fields.get(&field.name)?;
				let toggle_field = self.toggle_fields.get(&field.name)?;
				let toggle_name = field.toggle_name();
				let toggle = BoundField::new(
					toggle_field,
					self.data.get(&toggle_name),
					&[],
					"",
				)
				.to_context();
				let value = BoundField::new(
					value_field.as_ref(),
					self.data.get(&field.name),
					self.errors.get(&field.name),
					"",
				)
				.to_context();
				Some(BatchFieldContext {
					name: field.name.clone(),
					label: field.label.clone(),
					role: field.role,
					selected: selected(&field.name),
					toggle,
					value,
				})
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::batch::collector::CleanedValue;
	use crate::core::schema::{ModelField, ModelSchema, Relation};
	use reinhardt_generic_forms::parse_form_data;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn form() -> BatchUpdateForm {
		let schema = ModelSchema::new("blog", "Article")
			.with_field(ModelField::choice(
				"status",
				[("draft", "Draft"), ("published", "Published")],
			))
			.with_field(ModelField::boolean("featured"))
			.with_field(ModelField::many_to_many(
				"tags",
				Relation::new("Tag", "blog_tag", "blog_article_tags", "article_id", "tag_id"),
			));
		let descriptors =
			FieldDescriptor::from_schema(&schema, &["status", "featured", "tags"]).unwrap();
		let mut choices = HashMap::new();
		choices.insert(
			"tags".to_string(),
			vec![
				("1".to_string(), "rust".to_string()),
				("2".to_string(), "web".to_string()),
			],
		);
		BatchUpdateForm::new(descriptors, &choices)
	}

	#[rstest]
	fn test_unbound_form_is_not_valid(mut form: BatchUpdateForm) {
		assert_eq!(form.state(), BatchFormState::Unbound);
		assert!(!form.is_valid());
		assert!(form.errors().is_empty());
	}

	#[rstest]
	fn test_nothing_selected_is_a_form_error(mut form: BatchUpdateForm) {
		// Arrange
		form.bind(parse_form_data("status=published").unwrap());

		// Act
		let valid = form.is_valid();

		// Assert
		assert!(!valid);
		assert_eq!(form.state(), BatchFormState::Invalid);
		assert_eq!(
			form.errors().non_field_errors(),
			&["You haven't selected any fields to update".to_string()]
		);
	}

	#[rstest]
	fn test_valid_submission_walks_the_lifecycle(mut form: BatchUpdateForm) {
		// Arrange
		form.bind(parse_form_data("updating-status=on&status=published&featured=on").unwrap());
		assert_eq!(form.state(), BatchFormState::FieldsSelected);

		// Act
		let valid = form.is_valid();
		form.mark_applied().unwrap();

		// Assert
		assert!(valid);
		assert_eq!(form.state(), BatchFormState::Applied);
		let values = form.values().unwrap();
		assert_eq!(values.len(), 1);
		assert_eq!(
			values.get("status"),
			Some(&CleanedValue::Scalar(json!("published")))
		);
		assert_eq!(form.fields_to_update(), vec!["status".to_string()]);
	}

	#[rstest]
	fn test_invalid_value_reports_field_error(mut form: BatchUpdateForm) {
		// Arrange
		form.bind(parse_form_data("updating-status=on&status=archived").unwrap());

		// Act
		let valid = form.is_valid();

		// Assert
		assert!(!valid);
		assert_eq!(form.errors().fields(), vec!["status"]);
		assert!(form.mark_applied().is_err());
	}

	#[rstest]
	fn test_bound_fields_cover_every_virtual_field(mut form: BatchUpdateForm) {
		// Arrange
		form.bind(parse_form_data("updating-m2m_add_tags=on&m2m_add_tags=2").unwrap());

		// Act
		let contexts = form.bound_fields();

		// Assert
		let names: Vec<&str> = contexts.iter().map(|c| c.name.as_str()).collect();
		assert_eq!(
			names,
			vec!["status", "featured", "m2m_remove_tags", "m2m_add_tags"]
		);
		let add = &contexts[3];
		assert!(add.selected);
		assert_eq!(add.toggle.name, "updating-m2m_add_tags");
		assert_eq!(add.label, "Add tags");
	}

	#[rstest]
	fn test_verbose_fields_to_update(mut form: BatchUpdateForm) {
		form.bind(
			parse_form_data("updating-featured=on&updating-m2m_remove_tags=on&m2m_remove_tags=1")
				.unwrap(),
		);

		assert!(form.is_valid());
		assert_eq!(
			form.verbose_fields_to_update(),
			vec!["featured".to_string(), "tags".to_string()]
		);
	}
}
