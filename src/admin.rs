//! Admin extensions
//!
//! Unified imports of the batch update machinery from the
//! `reinhardt_generic::admin` namespace.
//!
//! ```rust
//! use reinhardt_generic::admin::*;
//!
//! let schema = ModelSchema::new("blog", "Article")
//!     .with_field(ModelField::choice("status", [("draft", "Draft"), ("published", "Published")]));
//! let site = AdminSite::new("admin");
//! site.register(BatchUpdateAdmin::new(schema).with_batch_update_fields(["status"]))
//!     .unwrap();
//!
//! let admin = site.get_model_admin("blog.article").unwrap();
//! assert_eq!(admin.batch_update_url(), "/admin/blog/article/batch-update/");
//! ```

pub use reinhardt_generic_admin::core::batch;
pub use reinhardt_generic_admin::core::{
	AdminActionInfo, AdminSite, ApplyResult, BatchApplier, BatchDatabase, BatchUpdateAdmin,
	BatchUpdateContext, BatchUpdateForm, BatchUpdateRenderer, FieldDescriptor, FieldKind,
	InMemoryBatchDatabase, ModelField, ModelSchema, QueryScope, Relation, ScalarType,
	SqliteBatchDatabase, TargetRecordSet,
};
pub use reinhardt_generic_admin::server::{
	AdminUser, BatchUpdateRequest, BatchUpdateViewContext, DefaultPermissionChecker,
	PermissionChecker, batch_update_view, changelist_action, into_http_response,
	request_from_http,
};
pub use reinhardt_generic_admin::types::{
	ActionRequest, AdminError, AdminMessage, AdminResult, BatchUpdateResponse, MessageLevel,
};
