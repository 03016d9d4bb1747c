//! # reinhardt-generic-admin
//!
//! Reusable admin extensions for Reinhardt. The main feature is batch
//! update: apply the same field values to every record selected in a
//! model's change list.
//!
//! - **types**: errors, request and response types
//! - **core**: model metadata, the batch update pipeline, storage and templates
//! - **server**: the batch update view, permissions, audit logging and `http` glue
//!
//! ## Features
//!
//! - `default`: No features enabled by default
//! - `full`: All admin functionality
//!
//! ## Example
//!
//! ```
//! use reinhardt_generic_admin::core::{AdminSite, BatchUpdateAdmin, ModelField, ModelSchema};
//!
//! let schema = ModelSchema::new("blog", "Article")
//!     .with_field(ModelField::boolean("featured"));
//! let site = AdminSite::new("admin");
//! site.register(BatchUpdateAdmin::new(schema).with_batch_update_fields(["featured"]))
//!     .unwrap();
//!
//! assert!(site.is_registered("blog.article"));
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod core;
pub mod server;
pub mod types;

pub use core::{AdminSite, BatchUpdateAdmin, ModelField, ModelSchema};
pub use types::{AdminError, AdminResult};
