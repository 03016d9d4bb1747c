//! # Reinhardt Generic
//!
//! Generic admin extensions for Reinhardt. The centerpiece is **batch
//! update**: select records in a model's change list, tick the fields to
//! change, enter one set of values and apply them to every selected record.
//! Many-to-many fields get independent *add* and *remove* inputs instead of
//! replacing the whole collection.
//!
//! ## Feature Flags
//!
//! - `admin` - Batch update view, model admin integration, storage backends
//! - `forms` - Form fields and validation
//! - `conf` - Settings and logging setup
//! - `full` (default) - Everything above
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reinhardt_generic::admin::*;
//! use reinhardt_generic::conf::{GenericSettings, init_logging};
//! use reinhardt_generic::setup;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = GenericSettings::load(None)?;
//! init_logging(&settings.logging)?;
//!
//! let schema = ModelSchema::new("blog", "Article")
//!     .with_field(ModelField::boolean("featured"));
//! let site = Arc::new(AdminSite::new(settings.admin.site_name.clone()));
//! site.register(setup::configure_admin(
//!     BatchUpdateAdmin::new(schema).with_batch_update_fields(["featured"]),
//!     &settings.admin,
//! ))?;
//!
//! let db = Arc::new(setup::connect_database(&settings).await?);
//! let ctx = BatchUpdateViewContext::new(site, db)?
//!     .with_renderer(setup::renderer(&settings.admin)?);
//!
//! let user = AdminUser::new("editor").superuser();
//! let response = batch_update_view(
//!     &ctx,
//!     "blog.article",
//!     BatchUpdateRequest::post("ids=1,2", "updating-featured=on&featured=on", user),
//! )
//! .await;
//! let http_response = into_http_response(response);
//! # let _ = http_response;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "admin")]
pub mod admin;
#[cfg(all(feature = "admin", feature = "conf"))]
pub mod setup;

#[cfg(feature = "conf")]
pub use reinhardt_generic_conf as conf;
#[cfg(feature = "forms")]
pub use reinhardt_generic_forms as forms;

#[cfg(feature = "admin")]
pub use reinhardt_generic_admin::types::{AdminError, AdminResult};
