//! Batch update
//!
//! Lets an operator pick records in a change list, choose which fields to
//! change, supply one set of values and write them to every record at once.
//! Many-to-many fields are updated by adding or removing references instead
//! of replacing the whole collection.

pub mod applier;
pub mod collector;
pub mod descriptor;
pub mod form;
pub mod selector;
pub mod splitter;

pub use applier::{
	ApplyPlan, ApplyResult, BatchApplier, RelationChange, RelationshipUpdate, ScalarUpdate,
	TargetRecordSet,
};
pub use collector::{CleanedValue, UpdateValues, collect_values, value_field_for};
pub use descriptor::FieldDescriptor;
pub use form::{BatchFieldContext, BatchFormState, BatchUpdateForm};
pub use selector::{NOTHING_SELECTED, UpdateSelection};
pub use splitter::{
	FieldRole, M2M_ADD_PREFIX, M2M_REMOVE_PREFIX, SplitFields, TOGGLE_PREFIX, VirtualField,
	split_fields,
};
