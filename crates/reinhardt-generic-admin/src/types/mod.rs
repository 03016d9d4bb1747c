//! Shared types for the admin extensions

pub mod errors;
pub mod requests;
pub mod responses;

pub use errors::{AdminError, AdminResult};
pub use requests::{ACTION_CHECKBOX_NAME, ActionRequest, BatchUpdateQuery, parse_ids};
pub use responses::{AdminMessage, BatchUpdateResponse, MessageLevel};
