//! Lifecycle events published to the host page.
//!
//! Events are the widget's only public extension point. Each one carries the
//! project id plus event-specific fields and is dispatched under the
//! `shipwait:` prefix.

use serde_json::{Value, json};

use crate::behavior::BehaviorType;

/// Prefix of every event name.
pub const EVENT_PREFIX: &str = "shipwait";

/// A typed lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
	/// A submit was received. `email` is already trimmed.
	Submit {
		/// Submitted email.
		email: String,
	},
	/// The loading UI was entered or left.
	Loading {
		/// New loading state.
		loading: bool,
	},
	/// A message was shown to the visitor.
	Message {
		/// Displayed text.
		message: String,
	},
	/// The lead was accepted.
	Success {
		/// Submitted email.
		email: String,
		/// Effective behavior type.
		behavior_type: BehaviorType,
		/// Effective payload, if any.
		payload: Option<String>,
	},
	/// A submission failed.
	Error {
		/// Error kind, e.g. `"ServerError"`.
		error: &'static str,
		/// Error message.
		message: String,
	},
	/// The page is about to navigate away.
	Redirect {
		/// Destination URL.
		url: String,
	},
}

impl WidgetEvent {
	/// Short name, without the prefix.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Submit { .. } => "submit",
			Self::Loading { .. } => "loading",
			Self::Message { .. } => "message",
			Self::Success { .. } => "success",
			Self::Error { .. } => "error",
			Self::Redirect { .. } => "redirect",
		}
	}

	/// Full event name, e.g. `shipwait:submit`.
	pub fn name(&self) -> String {
		format!("{}:{}", EVENT_PREFIX, self.kind())
	}

	/// `detail` payload of the dispatched event.
	pub fn detail(&self, project_id: &str) -> Value {
		match self {
			Self::Submit { email } => json!({ "projectId": project_id, "email": email }),
			Self::Loading { loading } => json!({ "projectId": project_id, "loading": loading }),
			Self::Message { message } => json!({ "projectId": project_id, "message": message }),
			Self::Success {
				email,
				behavior_type,
				payload,
			} => json!({
				"projectId": project_id,
				"email": email,
				"behaviorType": behavior_type.as_str(),
				"payload": payload,
			}),
			Self::Error { error, message } => {
				json!({ "projectId": project_id, "error": error, "message": message })
			}
			Self::Redirect { url } => json!({ "projectId": project_id, "url": url }),
		}
	}
}

/// Receives lifecycle events from a widget instance.
pub trait EventSink {
	/// Publishes one event for `project_id`.
	fn emit(&self, project_id: &str, event: &WidgetEvent);
}
