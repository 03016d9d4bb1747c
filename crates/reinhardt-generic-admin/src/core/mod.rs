//! Core admin functionality
//!
//! Model metadata, the batch update machinery, storage access, model admin
//! configuration and page rendering.

pub mod batch;
pub mod database;
pub mod model_admin;
pub mod schema;
pub mod templates;

pub use batch::{
	ApplyResult, BatchApplier, BatchUpdateForm, FieldDescriptor, TargetRecordSet, UpdateSelection,
	UpdateValues,
};
pub use database::{BatchDatabase, InMemoryBatchDatabase, QueryScope, SqliteBatchDatabase};
pub use model_admin::{
	AdminActionInfo, AdminSite, BATCH_UPDATE_ACTION, BATCH_UPDATE_PATH, BATCH_UPDATE_VIEW,
	BatchUpdateAdmin,
};
pub use schema::{FieldKind, ModelField, ModelSchema, Relation, ScalarType};
pub use templates::{BatchUpdateContext, BatchUpdateRenderer, DEFAULT_TEMPLATE_NAME};
