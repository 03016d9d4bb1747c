//! Conversion between `http` types and the batch update view

use super::auth::AdminUser;
use super::batch_update::BatchUpdateRequest;
use crate::types::{AdminError, AdminResult, BatchUpdateResponse};
use bytes::Bytes;
use http::header::{CONTENT_TYPE, LOCATION};
use http::{HeaderValue, Request, Response, StatusCode};

const HTML: &str = "text/html; charset=utf-8";
const PLAIN: &str = "text/plain; charset=utf-8";

/// Extension trait mapping admin errors onto HTTP
pub trait IntoHttpStatus {
	fn status_code(&self) -> StatusCode;

	/// Message safe to show to the client
	fn public_message(&self) -> String;
}

impl IntoHttpStatus for AdminError {
	fn status_code(&self) -> StatusCode {
		match self {
			AdminError::ModelNotRegistered(_) => StatusCode::NOT_FOUND,
			AdminError::PermissionDenied(_) => StatusCode::FORBIDDEN,
			AdminError::InvalidAction(_) | AdminError::ValidationError(_) => {
				StatusCode::BAD_REQUEST
			}
			AdminError::DatabaseError(_)
			| AdminError::TemplateError(_)
			| AdminError::ImproperlyConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn public_message(&self) -> String {
		match self {
			// Internal details stay in the logs
			AdminError::DatabaseError(_) => "Database operation failed".to_string(),
			AdminError::TemplateError(_) => "Template rendering failed".to_string(),
			AdminError::ImproperlyConfigured(_) => "Admin is misconfigured".to_string(),
			other => other.to_string(),
		}
	}
}

/// Build a view request from an HTTP request with a URL-encoded body
pub fn request_from_http(request: &Request<Bytes>, user: AdminUser) -> BatchUpdateRequest {
	BatchUpdateRequest {
		method: request.method().clone(),
		query: request.uri().query().unwrap_or_default().to_string(),
		body: String::from_utf8_lossy(request.body()).into_owned(),
		user,
	}
}

/// Turn the view outcome into an HTTP response.
///
/// Redirects carry their [`AdminMessage`](crate::types::AdminMessage) in the
/// response extensions for the caller's message storage.
pub fn into_http_response(result: AdminResult<BatchUpdateResponse>) -> Response<Bytes> {
	match result {
		Ok(BatchUpdateResponse::Form { html, .. }) => {
			text_response(StatusCode::OK, HTML, Bytes::from(html))
		}
		Ok(BatchUpdateResponse::Redirect { location, message }) => {
			let Ok(location) = HeaderValue::from_str(&location) else {
				tracing::error!(location = %location, "Invalid redirect location");
				return text_response(
					StatusCode::INTERNAL_SERVER_ERROR,
					PLAIN,
					Bytes::from_static(b"Invalid redirect location"),
				);
			};
			let mut response = Response::new(Bytes::new());
			*response.status_mut() = StatusCode::FOUND;
			response.headers_mut().insert(LOCATION, location);
			response.extensions_mut().insert(message);
			response
		}
		Err(err) => {
			let status = err.status_code();
			if status.is_server_error() {
				tracing::error!(error = %err, "Batch update request failed");
			}
			text_response(status, PLAIN, Bytes::from(err.public_message()))
		}
	}
}

fn text_response(status: StatusCode, content_type: &'static str, body: Bytes) -> Response<Bytes> {
	let mut response = Response::new(body);
	*response.status_mut() = status;
	response
		.headers_mut()
		.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
	response
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::AdminMessage;
	use http::Method;
	use reinhardt_generic_forms::FormErrors;
	use rstest::rstest;

	#[rstest]
	#[case(AdminError::ModelNotRegistered("blog.x".into()), StatusCode::NOT_FOUND)]
	#[case(AdminError::PermissionDenied("no".into()), StatusCode::FORBIDDEN)]
	#[case(AdminError::InvalidAction("no".into()), StatusCode::BAD_REQUEST)]
	#[case(AdminError::ValidationError("no".into()), StatusCode::BAD_REQUEST)]
	#[case(AdminError::DatabaseError("disk".into()), StatusCode::INTERNAL_SERVER_ERROR)]
	#[case(AdminError::TemplateError("tpl".into()), StatusCode::INTERNAL_SERVER_ERROR)]
	fn test_status_code(#[case] error: AdminError, #[case] expected: StatusCode) {
		assert_eq!(error.status_code(), expected);
	}

	#[rstest]
	fn test_database_details_are_hidden() {
		let response = into_http_response(Err(AdminError::DatabaseError(
			"no such table: secret".into(),
		)));

		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(response.body().as_ref(), b"Database operation failed");
	}

	#[rstest]
	fn test_redirect_response() {
		// Arrange
		let outcome = BatchUpdateResponse::Redirect {
			location: "/admin/blog/article/".to_string(),
			message: AdminMessage::success("Updated fields (title) for 2 articles"),
		};

		// Act
		let response = into_http_response(Ok(outcome));

		// Assert
		assert_eq!(response.status(), StatusCode::FOUND);
		assert_eq!(response.headers()[LOCATION], "/admin/blog/article/");
		assert_eq!(
			response.extensions().get::<AdminMessage>().map(|m| m.text.as_str()),
			Some("Updated fields (title) for 2 articles")
		);
	}

	#[rstest]
	fn test_form_response() {
		let outcome = BatchUpdateResponse::Form {
			html: "<form></form>".to_string(),
			errors: FormErrors::new(),
		};

		let response = into_http_response(Ok(outcome));

		assert_eq!(response.status(), StatusCode::OK);
		assert_eq!(response.headers()[CONTENT_TYPE], HTML);
		assert_eq!(response.body().as_ref(), b"<form></form>");
	}

	#[rstest]
	fn test_request_from_http() {
		// Arrange
		let request = Request::builder()
			.method(Method::POST)
			.uri("/admin/blog/article/batch-update/?ids=1,2")
			.body(Bytes::from_static(b"updating-title=on&title=Hello"))
			.unwrap();

		// Act
		let converted = request_from_http(&request, AdminUser::new("editor"));

		// Assert
		assert_eq!(converted.method, Method::POST);
		assert_eq!(converted.query, "ids=1,2");
		assert_eq!(converted.body, "updating-title=on&title=Hello");
	}
}
