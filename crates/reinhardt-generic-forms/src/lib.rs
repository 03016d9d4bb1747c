//! Form fields and validation for Reinhardt Generic
//!
//! This crate provides the form layer used by the admin extensions:
//! - A [`FormField`] trait with typed fields (text, numbers, booleans, dates, choices)
//! - Multiple choice over related model instances
//! - Bound fields for rendering with submitted data and errors
//! - Form-level error collection and URL-encoded form data parsing

pub mod bound_field;
pub mod field;
pub mod fields;
pub mod form;

pub use bound_field::{BoundField, BoundFieldContext};
pub use field::{FieldError, FieldResult, FormField, Widget, escape_html, is_truthy};
pub use fields::{
	BooleanField, CharField, ChoiceField, DateField, FloatField, IntegerField,
	ModelMultipleChoiceField,
};
pub use form::{ALL_FIELDS_KEY, FormData, FormError, FormErrors, FormResult, parse_form_data};
