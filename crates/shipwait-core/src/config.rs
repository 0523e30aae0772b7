//! Widget configuration resolved from the embedding script tag.
//!
//! A deployment either appends the project id to the script URL
//! (`<script src=".../waitly-snippet.umd.js?id=abc123">`) or sets it as a data
//! attribute (`<script data-project-id="abc123" ...>`). Both are accepted.
//!
//! ## Recognised keys
//!
//! | Purpose | Query parameter | Attribute |
//! |---|---|---|
//! | project id | `id`, `projectId` | `data-project-id`, `data-id`, `data-shipwait-project` |
//! | API base URL | | `data-api-base-url` |
//! | inline behavior type | `behavior` | `data-behavior` |
//! | inline redirect URL | `redirect` | `data-redirect` |
//! | inline message | `message` | `data-message` |

use std::collections::BTreeMap;

use crate::behavior::{BehaviorType, SubmissionBehavior};
use crate::error::ConfigError;

/// API base URL used when the build does not set `SHIPWAIT_API_BASE_URL`.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

/// Substrings of the script `src` that identify the widget bundle.
pub const SCRIPT_PATH_MARKERS: [&str; 2] = ["shipwait", "waitly-snippet"];

/// Attribute that identifies the widget script when `src` is not recognisable.
pub const SCRIPT_MARKER: &str = "data-shipwait-project";

const PROJECT_ID_PARAMS: [&str; 2] = ["id", "projectId"];
const PROJECT_ID_ATTRIBUTES: [&str; 3] = ["data-project-id", "data-id", SCRIPT_MARKER];

/// Build-time API base URL.
pub fn build_time_api_base_url() -> &'static str {
	match option_env!("SHIPWAIT_API_BASE_URL") {
		Some(url) if !url.is_empty() => url,
		_ => DEFAULT_API_BASE_URL,
	}
}

/// Snapshot of a `<script>` element: its `src` and attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptTag {
	src: Option<String>,
	attributes: BTreeMap<String, String>,
}

impl ScriptTag {
	/// Creates a snapshot with the given `src`.
	pub fn new(src: Option<String>) -> Self {
		Self {
			src,
			attributes: BTreeMap::new(),
		}
	}

	/// Adds an attribute.
	pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attributes.insert(name.into(), value.into());
		self
	}

	/// Script URL, if any.
	pub fn src(&self) -> Option<&str> {
		self.src.as_deref()
	}

	/// Attribute value, if present.
	pub fn attribute(&self, name: &str) -> Option<&str> {
		self.attributes.get(name).map(String::as_str)
	}

	/// Decoded query parameters of `src`. The first occurrence of a key wins.
	pub fn query_params(&self) -> BTreeMap<String, String> {
		let Some(query) = self.src.as_deref().and_then(|src| src.split_once('?')) else {
			return BTreeMap::new();
		};
		let query = query.1.split('#').next().unwrap_or_default();
		let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap_or_default();

		let mut params = BTreeMap::new();
		for (key, value) in pairs {
			params.entry(key).or_insert(value);
		}
		params
	}

	/// Whether this script looks like the widget bundle.
	pub fn looks_like_widget(&self) -> bool {
		let src_matches = self
			.src()
			.is_some_and(|src| SCRIPT_PATH_MARKERS.iter().any(|marker| src.contains(marker)));
		src_matches
			|| self.attribute(SCRIPT_MARKER).is_some()
			|| self.attribute("data-project-id").is_some()
	}

	fn lookup<'a>(
		&'a self,
		params: &'a BTreeMap<String, String>,
		keys: &[&str],
		attributes: &[&str],
	) -> Option<&'a str> {
		keys.iter()
			.filter_map(|key| params.get(*key).map(String::as_str))
			.chain(attributes.iter().filter_map(|name| self.attribute(name)))
			.map(str::trim)
			.find(|value| !value.is_empty())
	}
}

/// Resolved, immutable configuration of one widget instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
	/// Project identifier sent with every request.
	pub project_id: String,
	/// API base URL without trailing slash.
	pub api_base_url: String,
	/// Behavior declared on the script tag. When set, no remote fetch happens.
	pub inline_behavior: Option<SubmissionBehavior>,
}

impl ProjectConfig {
	/// Creates a configuration without inline behavior.
	pub fn new(project_id: impl Into<String>, api_base_url: impl Into<String>) -> Self {
		Self {
			project_id: project_id.into(),
			api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
			inline_behavior: None,
		}
	}

	/// Sets the inline behavior override.
	pub fn with_inline_behavior(mut self, behavior: SubmissionBehavior) -> Self {
		self.inline_behavior = Some(behavior);
		self
	}

	/// Resolves a configuration from a script tag.
	///
	/// Synchronous and side-effect free apart from one warning when the
	/// project id is missing.
	pub fn resolve(script: &ScriptTag, default_api_base_url: &str) -> Result<Self, ConfigError> {
		let params = script.query_params();

		let Some(project_id) = script.lookup(&params, &PROJECT_ID_PARAMS, &PROJECT_ID_ATTRIBUTES)
		else {
			let err = ConfigError::MissingProjectId;
			tracing::warn!(target: "shipwait", "[Shipwait] {err}");
			return Err(err);
		};

		let api_base_url = script
			.lookup(&params, &[], &["data-api-base-url"])
			.unwrap_or(default_api_base_url);

		let mut config = Self::new(project_id, api_base_url);
		config.inline_behavior = inline_behavior(script, &params);
		Ok(config)
	}
}

fn inline_behavior(script: &ScriptTag, params: &BTreeMap<String, String>) -> Option<SubmissionBehavior> {
	let name = script.lookup(params, &["behavior"], &["data-behavior"])?;
	let behavior_type = match name.parse::<BehaviorType>() {
		Ok(behavior_type) => behavior_type,
		Err(err) => {
			tracing::warn!(target: "shipwait", "[Shipwait] ignoring inline behavior: {err}");
			return None;
		}
	};
	let redirect = script.lookup(params, &["redirect"], &["data-redirect"]);
	let message = script.lookup(params, &["message"], &["data-message"]);
	Some(SubmissionBehavior::from_fields(
		behavior_type,
		redirect.map(str::to_string),
		message.map(str::to_string),
	))
}

/// Picks the script tags that should each start a widget.
///
/// The executing script wins when the runtime exposes it. Otherwise every
/// script recognisable by path or marker attribute is used, so several
/// independent widgets can live on one page.
pub fn select_widget_scripts(current: Option<ScriptTag>, candidates: Vec<ScriptTag>) -> Vec<ScriptTag> {
	match current {
		Some(script) => vec![script],
		None => candidates
			.into_iter()
			.filter(ScriptTag::looks_like_widget)
			.collect(),
	}
}
