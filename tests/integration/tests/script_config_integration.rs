//! Script Configuration Integration Tests
//!
//! Resolves configurations from script tag snapshots and checks that the
//! resulting widgets talk to the right endpoints.

use rstest::*;
use shipwait_core::config::{ScriptTag, select_widget_scripts};
use shipwait_core::testing::MockPage;
use shipwait_core::{ConfigError, ProjectConfig, WidgetDom};
use shipwait_integration_tests::*;

fn script(src: &str) -> ScriptTag {
	ScriptTag::new(Some(src.to_string()))
}

// ============================================================================
// Resolution Tests
// ============================================================================

/// Tests that the script's project id reaches the API
#[rstest]
#[case(script("https://cdn.shipwait.test/waitly-snippet.umd.js?id=abc123"))]
#[case(script("https://cdn.shipwait.test/shipwait.js").with_attribute("data-project-id", "abc123"))]
#[tokio::test]
async fn test_project_id_reaches_api(#[case] tag: ScriptTag) {
	let config = ProjectConfig::resolve(&tag, API_BASE_URL).unwrap();
	let h = WidgetHarness::new(MockPage::new(), config);
	h.leads(201, "");
	let markup = h.mount("Join").await;

	h.submit(&markup, "ada@example.com").await;

	let urls: Vec<String> = h.transport.requests().into_iter().map(|r| r.url).collect();
	assert!(urls.contains(&format!(
		"{API_BASE_URL}/api/submission-behaviors?projectId=abc123"
	)));
	assert!(urls.contains(&format!("{API_BASE_URL}/api/leads")));
}

/// Tests that a missing project id aborts resolution
#[rstest]
fn test_missing_project_id() {
	let tag = script("https://cdn.shipwait.test/waitly-snippet.umd.js");
	assert_eq!(
		ProjectConfig::resolve(&tag, API_BASE_URL),
		Err(ConfigError::MissingProjectId)
	);
}

/// Tests the per-script API base URL override
#[rstest]
#[tokio::test]
async fn test_api_base_url_override() {
	let tag = script("/shipwait.js?id=abc123").with_attribute("data-api-base-url", "https://eu.shipwait.test/");
	let config = ProjectConfig::resolve(&tag, API_BASE_URL).unwrap();
	let h = WidgetHarness::new(MockPage::new(), config);
	h.leads(201, "");
	let markup = h.mount("Join").await;

	h.submit(&markup, "ada@example.com").await;

	assert!(
		h.transport
			.requests()
			.iter()
			.all(|request| request.url.starts_with("https://eu.shipwait.test/api/"))
	);
}

// ============================================================================
// Inline Behavior Tests
// ============================================================================

/// Tests that an inline behavior bypasses the behavior endpoint
#[rstest]
#[tokio::test]
async fn test_inline_message_skips_fetch() {
	let tag = script("/shipwait.js?id=abc123&behavior=show_message&message=See%20you%20soon");
	let config = ProjectConfig::resolve(&tag, API_BASE_URL).unwrap();
	let h = WidgetHarness::new(MockPage::new(), config);
	h.behavior(200, &show_message_body("from server")).leads(201, "");
	let markup = h.mount("Join").await;

	h.submit(&markup, "ada@example.com").await;

	assert_eq!(
		h.page.text(&markup.message.unwrap()).as_deref(),
		Some("See you soon")
	);
	assert!(
		h.transport
			.requests()
			.iter()
			.all(|request| request.method == "POST")
	);
}

/// Tests an inline redirect declared through attributes
#[rstest]
#[tokio::test]
async fn test_inline_redirect_from_attributes() {
	let tag = script("/shipwait.js")
		.with_attribute("data-project-id", "abc123")
		.with_attribute("data-behavior", "redirect")
		.with_attribute("data-redirect", "https://example.com/welcome");
	let config = ProjectConfig::resolve(&tag, API_BASE_URL).unwrap();
	let h = WidgetHarness::new(MockPage::new(), config);
	h.leads(201, "");
	let markup = h.mount("Join").await;

	h.submit(&markup, "ada@example.com").await;

	assert_eq!(h.page.navigations(), vec!["https://example.com/welcome"]);
}

// ============================================================================
// Script Discovery Tests
// ============================================================================

/// Tests one configuration per recognised script
#[rstest]
fn test_discovery_yields_one_config_per_widget_script() {
	let scripts = vec![
		script("https://cdn.example.com/jquery.min.js"),
		script("https://cdn.shipwait.test/waitly-snippet.umd.js?id=alpha"),
		script("https://cdn.shipwait.test/waitly-snippet.umd.js?id=beta"),
		script("https://cdn.shipwait.test/waitly-snippet.umd.js"),
	];

	let configs: Vec<ProjectConfig> = select_widget_scripts(None, scripts)
		.iter()
		.filter_map(|tag| ProjectConfig::resolve(tag, API_BASE_URL).ok())
		.collect();

	let ids: Vec<&str> = configs.iter().map(|c| c.project_id.as_str()).collect();
	assert_eq!(ids, vec!["alpha", "beta"]);
}
