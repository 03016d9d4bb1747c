//! Relationship splitting
//!
//! A many-to-many field cannot sensibly be "replaced" across several records,
//! so each one is offered as two virtual fields: one removing references and
//! one adding them. Scalar fields pass through unchanged.

use super::descriptor::FieldDescriptor;
use serde::Serialize;
use std::collections::HashMap;

/// Prefix of the virtual field adding related references
pub const M2M_ADD_PREFIX: &str = "m2m_add_";
/// Prefix of the virtual field removing related references
pub const M2M_REMOVE_PREFIX: &str = "m2m_remove_";
/// Prefix of the checkbox enabling a virtual field
pub const TOGGLE_PREFIX: &str = "updating-";

/// What applying a virtual field does to its model field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
	/// Overwrite the scalar value
	Replace,
	/// Add references to a relationship
	Add,
	/// Remove references from a relationship
	Remove,
}

/// A field as presented on the batch update form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualField {
	pub name: String,
	pub label: String,
	pub role: FieldRole,
	/// Name of the model field this virtual field writes to
	pub source: String,
}

impl VirtualField {
	/// Name of the checkbox that enables this field
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_generic_admin::core::batch::{FieldRole, VirtualField};
	///
	/// let field = VirtualField {
	///     name: "m2m_add_tags".to_string(),
	///     label: "Add tags".to_string(),
	///     role: FieldRole::Add,
	///     source: "tags".to_string(),
	/// };
	/// assert_eq!(field.toggle_name(), "updating-m2m_add_tags");
	/// ```
	pub fn toggle_name(&self) -> String {
		format!("{}{}", TOGGLE_PREFIX, self.name)
	}

	pub fn is_relationship(&self) -> bool {
		self.role != FieldRole::Replace
	}
}

/// Ordered set of virtual fields
#[derive(Debug, Clone, Default)]
pub struct SplitFields {
	fields: Vec<VirtualField>,
	index: HashMap<String, usize>,
}

impl SplitFields {
	pub fn iter(&self) -> std::slice::Iter<'_, VirtualField> {
		self.fields.iter()
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	pub fn get(&self, name: &str) -> Option<&VirtualField> {
		self.index.get(name).map(|&i| &self.fields[i])
	}

	/// Model field name a virtual field writes to
	pub fn canonical_name(&self, name: &str) -> Option<&str> {
		self.get(name).map(|f| f.source.as_str())
	}

	fn push(&mut self, field: VirtualField) {
		self.index.insert(field.name.clone(), self.fields.len());
		self.fields.push(field);
	}
}

impl<'a> IntoIterator for &'a SplitFields {
	type Item = &'a VirtualField;
	type IntoIter = std::slice::Iter<'a, VirtualField>;

	fn into_iter(self) -> Self::IntoIter {
		self.fields.iter()
	}
}

/// Expand descriptors into virtual fields, keeping the configured order.
///
/// Each relationship yields its remove field followed by its add field.
pub fn split_fields(descriptors: &[FieldDescriptor]) -> SplitFields {
	let mut split = SplitFields::default();
	for descriptor in descriptors {
		let source = descriptor.name().to_string();
		if descriptor.is_relationship() {
			let verbose = descriptor.verbose_name();
			split.push(VirtualField {
				name: format!("{}{}", M2M_REMOVE_PREFIX, source),
				label: format!("Remove {}", verbose),
				role: FieldRole::Remove,
				source: source.clone(),
			});
			split.push(VirtualField {
				name: format!("{}{}", M2M_ADD_PREFIX, source),
				label: format!("Add {}", verbose),
				role: FieldRole::Add,
				source,
			});
		} else {
			split.push(VirtualField {
				name: source.clone(),
				label: capitalize(&descriptor.verbose_name()),
				role: FieldRole::Replace,
				source,
			});
		}
	}
	split
}

fn capitalize(text: &str) -> String {
	let mut chars = text.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}
