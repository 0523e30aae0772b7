//! Client for the lead-capture service.

use serde::Serialize;

use crate::behavior::{SubmissionBehavior, parse_behavior_body};
use crate::error::{FALLBACK_MESSAGE, SubmissionError};
use crate::http::HttpTransport;

/// Path of the behavior endpoint.
pub const BEHAVIOR_PATH: &str = "/api/submission-behaviors";

/// Path of the leads endpoint.
pub const LEADS_PATH: &str = "/api/leads";

/// Body of `POST /api/leads`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRequest<'a> {
	/// Trimmed email address.
	pub email: &'a str,
	/// Project the lead belongs to.
	pub project_id: &'a str,
}

/// API client bound to a base URL and a transport.
#[derive(Debug, Clone)]
pub struct ApiClient<T> {
	base_url: String,
	transport: T,
}

impl<T: HttpTransport> ApiClient<T> {
	/// Creates a client. Trailing slashes on `base_url` are dropped.
	pub fn new(base_url: impl Into<String>, transport: T) -> Self {
		let base_url = base_url.into().trim_end_matches('/').to_string();
		Self {
			base_url,
			transport,
		}
	}

	/// Base URL without trailing slash.
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// Underlying transport.
	pub fn transport(&self) -> &T {
		&self.transport
	}

	/// `GET` URL of the behavior endpoint for a project.
	pub fn behavior_url(&self, project_id: &str) -> String {
		format!(
			"{}{}?projectId={}",
			self.base_url,
			BEHAVIOR_PATH,
			urlencoding::encode(project_id)
		)
	}

	/// `POST` URL of the leads endpoint.
	pub fn leads_url(&self) -> String {
		format!("{}{}", self.base_url, LEADS_PATH)
	}

	/// Fetches the project's submission behavior.
	///
	/// Never fails: non-2xx statuses, malformed bodies and transport failures
	/// all return `None`. One request, no retry, no caching.
	pub async fn fetch_behavior(&self, project_id: &str) -> Option<SubmissionBehavior> {
		let url = self.behavior_url(project_id);
		match self.transport.get(&url).await {
			Ok(response) if response.is_success() => parse_behavior_body(&response.body),
			Ok(response) => {
				tracing::debug!(
					target: "shipwait",
					status = response.status,
					"[Shipwait] behavior lookup returned a non-success status"
				);
				None
			}
			Err(err) => {
				tracing::debug!(target: "shipwait", "[Shipwait] behavior lookup failed: {err}");
				None
			}
		}
	}

	/// Posts a lead. Any 2xx counts as accepted and the body is ignored.
	pub async fn submit_lead(&self, lead: &LeadRequest<'_>) -> Result<(), SubmissionError> {
		let body = serde_json::to_string(lead)
			.map_err(|err| SubmissionError::network(err.to_string()))?;
		let response = self
			.transport
			.post_json(&self.leads_url(), body)
			.await
			.map_err(|err| SubmissionError::network(err.message()))?;

		if response.is_success() {
			Ok(())
		} else {
			Err(SubmissionError::server(
				response.status,
				server_error_message(&response.body),
			))
		}
	}
}

/// Extracts the visitor-facing message from a failed lead response.
///
/// A JSON body contributes its non-empty string `message` field. A body that
/// is not JSON is used verbatim. Everything else falls back to
/// `"Server error"`.
pub fn server_error_message(body: &str) -> String {
	match serde_json::from_str::<serde_json::Value>(body) {
		Ok(value) => value
			.get("message")
			.and_then(serde_json::Value::as_str)
			.filter(|message| !message.is_empty())
			.map(str::to_string)
			.unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
		Err(_) if !body.trim().is_empty() => body.to_string(),
		Err(_) => FALLBACK_MESSAGE.to_string(),
	}
}
