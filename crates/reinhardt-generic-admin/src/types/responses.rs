//! Response types for admin extensions

use reinhardt_generic_forms::FormErrors;
use serde::Serialize;

/// Severity of a user-facing admin message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
	Info,
	Success,
	Warning,
	Error,
}

/// Message shown to the operator after a redirect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminMessage {
	pub level: MessageLevel,
	pub text: String,
}

impl AdminMessage {
	pub fn success(text: impl Into<String>) -> Self {
		Self {
			level: MessageLevel::Success,
			text: text.into(),
		}
	}
}

/// Outcome of the batch update view
#[derive(Debug, Clone)]
pub enum BatchUpdateResponse {
	/// The form is (re-)rendered, carrying any validation errors
	Form { html: String, errors: FormErrors },
	/// The update was applied
	Redirect {
		location: String,
		message: AdminMessage,
	},
}

impl BatchUpdateResponse {
	pub fn is_redirect(&self) -> bool {
		matches!(self, BatchUpdateResponse::Redirect { .. })
	}
}
