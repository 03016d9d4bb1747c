//! Field selection
//!
//! Decides which virtual fields the operator opted into via their
//! `updating-<name>` checkboxes.

use super::splitter::{SplitFields, VirtualField};
use reinhardt_generic_forms::{FormData, is_truthy};

/// Error reported when no field was selected
pub const NOTHING_SELECTED: &str = "You haven't selected any fields to update";

/// The virtual fields selected for update, in form order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSelection {
	active: Vec<VirtualField>,
}

impl UpdateSelection {
	/// Read the toggles of every virtual field from submitted data
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_admin::core::batch::{UpdateSelection, split_fields};
	/// use reinhardt_generic_admin::core::{FieldDescriptor, ModelField, ModelSchema};
	/// use reinhardt_generic_forms::parse_form_data;
	///
	/// let schema = ModelSchema::new("blog", "Article")
	///     .with_field(ModelField::text("title", None))
	///     .with_field(ModelField::boolean("featured"));
	/// let descriptors = FieldDescriptor::from_schema(&schema, &["title", "featured"]).unwrap();
	/// let split = split_fields(&descriptors);
	///
	/// let data = parse_form_data("updating-featured=on&title=ignored").unwrap();
	/// let selection = UpdateSelection::from_data(&split, &data);
	/// assert!(selection.is_active("featured"));
	/// assert!(!selection.is_active("title"));
	/// ```
	pub fn from_data(fields: &SplitFields, data: &FormData) -> Self {
		let active = fields
			.iter()
			.filter(|field| is_truthy(data.get(&field.toggle_name())))
			.cloned()
			.collect();
		Self { active }
	}

	/// Like [`UpdateSelection::from_data`], failing when nothing is selected
	pub fn select(fields: &SplitFields, data: &FormData) -> Result<Self, String> {
		let selection = Self::from_data(fields, data);
		if selection.is_empty() {
			return Err(NOTHING_SELECTED.to_string());
		}
		Ok(selection)
	}

	pub fn is_active(&self, name: &str) -> bool {
		self.active.iter().any(|f| f.name == name)
	}

	pub fn active(&self) -> &[VirtualField] {
		&self.active
	}

	pub fn is_empty(&self) -> bool {
		self.active.is_empty()
	}

	/// Model field names touched by the selection, without duplicates
	pub fn fields_to_update(&self) -> Vec<String> {
		let mut names: Vec<String> = Vec::new();
		for field in &self.active {
			if !names.contains(&field.source) {
				names.push(field.source.clone());
			}
		}
		names
	}
}
