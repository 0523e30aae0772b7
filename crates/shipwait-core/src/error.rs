//! Error types for the widget.
//!
//! Only [`SubmissionError`] is ever shown to the visitor. Configuration and
//! binding problems are developer diagnostics: they are logged and the widget
//! stays silent so the host page keeps working.

use thiserror::Error;

/// Result type for fallible host and widget operations.
pub type WidgetResult<T> = Result<T, WidgetError>;

/// Message shown when the email field is empty.
pub const EMPTY_EMAIL_MESSAGE: &str = "Please enter your email.";

/// Fallback shown when a failure carries no usable message.
pub const FALLBACK_MESSAGE: &str = "Server error";

/// Problems resolving the widget configuration from its script tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
	/// Neither the script URL nor its attributes carry a project id.
	#[error("Missing projectId in script!")]
	MissingProjectId,

	/// No script element could be identified as the widget's own.
	#[error("widget script element not found")]
	ScriptNotFound,
}

/// Problems wiring the widget to the host page markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
	/// The marked input has no enclosing form.
	#[error("input[data-shipwait] is not inside a form")]
	MissingForm,

	/// The form was already bound by this or another widget instance.
	#[error("form is already bound")]
	AlreadyBound,

	/// The host refused the submit subscription.
	#[error("failed to attach submit listener: {0}")]
	Listener(String),
}

/// Visitor-facing outcome of a failed submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
	/// The input was empty after trimming. No request was made.
	#[error("{reason}")]
	Validation {
		/// Short developer-facing reason carried on the error event.
		reason: String,
	},

	/// The leads endpoint answered with a non-2xx status.
	#[error("{message}")]
	Server {
		/// HTTP status code.
		status: u16,
		/// Server-provided message, or the raw body, or the fallback.
		message: String,
	},

	/// The lead request never produced a response.
	#[error("{message}")]
	Network {
		/// Transport failure description.
		message: String,
	},

	/// The redirect behavior could not navigate away.
	#[error("{message}")]
	Navigation {
		/// Host failure description.
		message: String,
	},
}

impl SubmissionError {
	/// Creates a validation error.
	pub fn validation(reason: impl Into<String>) -> Self {
		Self::Validation {
			reason: reason.into(),
		}
	}

	/// Creates a server error.
	pub fn server(status: u16, message: impl Into<String>) -> Self {
		Self::Server {
			status,
			message: message.into(),
		}
	}

	/// Creates a network error.
	pub fn network(message: impl Into<String>) -> Self {
		Self::Network {
			message: message.into(),
		}
	}

	/// Creates a navigation error.
	pub fn navigation(message: impl Into<String>) -> Self {
		Self::Navigation {
			message: message.into(),
		}
	}

	/// Name carried in the `error` field of the `shipwait:error` event.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Validation { .. } => "ValidationError",
			Self::Server { .. } => "ServerError",
			Self::Network { .. } => "NetworkError",
			Self::Navigation { .. } => "NavigationError",
		}
	}

	/// Text displayed to the visitor.
	pub fn user_message(&self) -> String {
		match self {
			Self::Validation { .. } => EMPTY_EMAIL_MESSAGE.to_string(),
			Self::Server { message, .. }
			| Self::Network { message }
			| Self::Navigation { message } => non_empty_or_fallback(message),
		}
	}

	/// Text carried in the `message` field of the `shipwait:error` event.
	pub fn event_message(&self) -> String {
		match self {
			Self::Validation { reason } => reason.clone(),
			_ => self.user_message(),
		}
	}
}

fn non_empty_or_fallback(message: &str) -> String {
	if message.trim().is_empty() {
		FALLBACK_MESSAGE.to_string()
	} else {
		message.to_string()
	}
}

/// Umbrella error for widget and host operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WidgetError {
	/// Configuration could not be resolved.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// The page markup could not be bound.
	#[error(transparent)]
	Binding(#[from] BindingError),

	/// A submission failed.
	#[error(transparent)]
	Submission(#[from] SubmissionError),

	/// A host API (DOM, window, location) refused an operation.
	#[error("host error: {0}")]
	Host(String),
}

impl WidgetError {
	/// Creates a host error.
	pub fn host(message: impl Into<String>) -> Self {
		Self::Host(message.into())
	}
}
