//! Server-side endpoints for admin extensions
//!
//! The batch update view is framework-neutral: it takes a
//! [`BatchUpdateRequest`] and returns a [`BatchUpdateResponse`](crate::types::BatchUpdateResponse).
//! [`http`] adapts it to `http::Request` / `http::Response`.

pub mod audit;
pub mod auth;
pub mod batch_update;
pub mod http;

pub use auth::{AdminUser, DefaultPermissionChecker, PermissionChecker, require_change_permission};
pub use batch_update::{
	BatchUpdateRequest, BatchUpdateViewContext, batch_update_view, changelist_action,
};
pub use self::http::{IntoHttpStatus, into_http_response, request_from_http};
