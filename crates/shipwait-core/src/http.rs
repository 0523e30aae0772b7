//! HTTP transport seam.
//!
//! The widget issues exactly two kinds of request: a GET for the submission
//! behavior and a JSON POST for the lead. Implementations only move bytes;
//! status interpretation lives in [`crate::api`].

use async_trait::async_trait;
use thiserror::Error;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body as text. Empty when the body could not be read.
	pub body: String,
}

impl HttpResponse {
	/// Creates a response.
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self {
			status,
			body: body.into(),
		}
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// The request failed before a response arrived (DNS, CORS, offline, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
	message: String,
}

impl TransportError {
	/// Creates a transport error.
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}

	/// Transport-provided description.
	pub fn message(&self) -> &str {
		&self.message
	}
}

/// Minimal HTTP client used by the widget.
///
/// Futures are not required to be `Send`: the widget runs on the browser's
/// single thread.
#[async_trait(?Send)]
pub trait HttpTransport {
	/// Issues a GET request.
	async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;

	/// Issues a POST request with `Content-Type: application/json`.
	async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse, TransportError>;
}
