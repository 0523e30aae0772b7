//! Server-declared post-submission behavior.
//!
//! The behavior endpoint answers with
//! `{ "data": { "behavior_type": "...", "redirect": "...", "message": "..." } }`.
//! Anything that does not decode into a known behavior is treated as absent,
//! which the controller downgrades to [`BehaviorType::DoNothing`].

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// What to do after a lead is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BehaviorType {
	/// Navigate the page to the payload URL.
	Redirect,
	/// Display the payload text.
	ShowMessage,
	/// Only clear the input.
	#[default]
	DoNothing,
}

impl BehaviorType {
	/// Wire name of the behavior type.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Redirect => "redirect",
			Self::ShowMessage => "show_message",
			Self::DoNothing => "do_nothing",
		}
	}
}

impl fmt::Display for BehaviorType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error returned when a behavior type name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown behavior type: {0}")]
pub struct UnknownBehaviorType(pub String);

impl FromStr for BehaviorType {
	type Err = UnknownBehaviorType;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"redirect" => Ok(Self::Redirect),
			"show_message" => Ok(Self::ShowMessage),
			"do_nothing" => Ok(Self::DoNothing),
			other => Err(UnknownBehaviorType(other.to_string())),
		}
	}
}

/// A resolved behavior: the type plus the payload that applies to it.
///
/// The payload is the redirect URL for `redirect`, the text for
/// `show_message`, and always `None` for `do_nothing`. Empty strings are
/// normalised to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionBehavior {
	/// Behavior type.
	pub behavior_type: BehaviorType,
	/// Payload for the type, if any.
	pub payload: Option<String>,
}

impl SubmissionBehavior {
	/// Creates a behavior, dropping empty payloads and any payload on `do_nothing`.
	pub fn new(behavior_type: BehaviorType, payload: Option<String>) -> Self {
		let payload = match behavior_type {
			BehaviorType::DoNothing => None,
			_ => payload.filter(|p| !p.is_empty()),
		};
		Self {
			behavior_type,
			payload,
		}
	}

	/// The no-op behavior.
	pub fn do_nothing() -> Self {
		Self::default()
	}

	/// Redirect to `url`.
	pub fn redirect(url: impl Into<String>) -> Self {
		Self::new(BehaviorType::Redirect, Some(url.into()))
	}

	/// Show `message`.
	pub fn show_message(message: impl Into<String>) -> Self {
		Self::new(BehaviorType::ShowMessage, Some(message.into()))
	}

	/// Builds a behavior from a type and the two candidate payload fields,
	/// picking the one that belongs to the type.
	pub fn from_fields(
		behavior_type: BehaviorType,
		redirect: Option<String>,
		message: Option<String>,
	) -> Self {
		let payload = match behavior_type {
			BehaviorType::Redirect => redirect,
			BehaviorType::ShowMessage => message,
			BehaviorType::DoNothing => None,
		};
		Self::new(behavior_type, payload)
	}

	/// Payload as a string slice.
	pub fn payload(&self) -> Option<&str> {
		self.payload.as_deref()
	}
}

/// The `data` object of the behavior endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BehaviorRecord {
	/// Raw behavior type name.
	pub behavior_type: String,
	/// Redirect URL, used by `redirect`.
	#[serde(default)]
	pub redirect: Option<String>,
	/// Message text, used by `show_message`.
	#[serde(default)]
	pub message: Option<String>,
}

impl BehaviorRecord {
	/// Converts the record, returning `None` for unknown types.
	pub fn into_behavior(self) -> Option<SubmissionBehavior> {
		match self.behavior_type.parse::<BehaviorType>() {
			Ok(behavior_type) => Some(SubmissionBehavior::from_fields(
				behavior_type,
				self.redirect,
				self.message,
			)),
			Err(err) => {
				tracing::debug!(target: "shipwait", "[Shipwait] ignoring behavior: {err}");
				None
			}
		}
	}
}

#[derive(Debug, Deserialize)]
struct BehaviorEnvelope {
	#[serde(default)]
	data: Option<BehaviorRecord>,
}

/// Decodes a behavior endpoint body. Malformed bodies, `data: null` and
/// unknown types all yield `None`.
pub fn parse_behavior_body(body: &str) -> Option<SubmissionBehavior> {
	match serde_json::from_str::<BehaviorEnvelope>(body) {
		Ok(envelope) => envelope.data.and_then(BehaviorRecord::into_behavior),
		Err(err) => {
			tracing::debug!(target: "shipwait", "[Shipwait] malformed behavior body: {err}");
			None
		}
	}
}
