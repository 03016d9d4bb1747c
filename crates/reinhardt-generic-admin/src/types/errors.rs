//! Error types for admin extensions

use thiserror::Error;

/// Admin error type
#[derive(Debug, Error)]
pub enum AdminError {
	/// Model not registered with admin
	#[error("Model '{0}' is not registered with admin")]
	ModelNotRegistered(String),

	/// Permission denied
	#[error("Permission denied: {0}")]
	PermissionDenied(String),

	/// Invalid action
	#[error("Invalid action: {0}")]
	InvalidAction(String),

	/// Database error
	#[error("Database error: {0}")]
	DatabaseError(String),

	/// Validation error
	#[error("Validation error: {0}")]
	ValidationError(String),

	/// Template rendering error
	#[error("Template rendering error: {0}")]
	TemplateError(String),

	/// Admin configuration does not match the model schema
	#[error("Improperly configured: {0}")]
	ImproperlyConfigured(String),
}

/// Result type for admin operations
pub type AdminResult<T> = Result<T, AdminError>;

impl From<sqlx::Error> for AdminError {
	fn from(err: sqlx::Error) -> Self {
		AdminError::DatabaseError(err.to_string())
	}
}

impl From<tera::Error> for AdminError {
	fn from(err: tera::Error) -> Self {
		// tera nests the useful message in the source chain
		let mut message = err.to_string();
		let mut source = std::error::Error::source(&err);
		while let Some(inner) = source {
			message.push_str(": ");
			message.push_str(&inner.to_string());
			source = inner.source();
		}
		AdminError::TemplateError(message)
	}
}
