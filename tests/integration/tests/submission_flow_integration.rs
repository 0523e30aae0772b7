//! Submission Flow Integration Tests
//!
//! Drives a mounted widget through complete submit cycles: markup, lead and
//! behavior endpoints, UI updates and the published `shipwait:*` events.
//!
//! Success Criteria:
//! 1. Accepted leads apply the project's behavior
//! 2. Rejected leads show the server's message and keep the input
//! 3. Loading UI is entered and left around every network cycle
//! 4. Blank input never reaches the network

use rstest::*;
use serde_json::json;
use shipwait_core::WidgetDom;
use shipwait_integration_tests::*;

// ============================================================================
// Happy Path Tests
// ============================================================================

/// Tests the show_message scenario end to end
#[rstest]
#[tokio::test]
async fn test_show_message_flow() {
	let h = WidgetHarness::loading_page();
	h.behavior(200, &show_message_body("Thanks!")).leads(201, "");
	let markup = h.mount("Join the waitlist").await;

	h.submit(&markup, "ada@example.com").await;

	assert_eq!(h.page.value(&markup.input), "");
	assert_eq!(
		h.page.text(&markup.message.unwrap()).as_deref(),
		Some("Thanks!")
	);
	assert_eq!(
		h.sink.detail_of("shipwait:success").unwrap(),
		json!({
			"projectId": PROJECT_ID,
			"email": "ada@example.com",
			"behaviorType": "show_message",
			"payload": "Thanks!",
		})
	);
	assert_eq!(
		h.page.text(&markup.button.unwrap()).as_deref(),
		Some("Join the waitlist")
	);
}

/// Tests that the lead request carries the trimmed email and project id
#[rstest]
#[tokio::test]
async fn test_lead_request_body() {
	let h = WidgetHarness::loading_page();
	h.leads(201, "");
	let markup = h.mount("Join").await;

	h.submit(&markup, "  ada@example.com\n").await;

	let post = h
		.transport
		.requests()
		.into_iter()
		.find(|request| request.method == "POST")
		.unwrap();
	assert_eq!(post.url, format!("{API_BASE_URL}/api/leads"));
	let body: serde_json::Value = serde_json::from_str(post.body.as_deref().unwrap()).unwrap();
	assert_eq!(body, json!({ "email": "ada@example.com", "projectId": PROJECT_ID }));
	assert_eq!(
		h.sink.detail_of("shipwait:submit").unwrap()["email"],
		"ada@example.com"
	);
}

/// Tests that a redirect behavior navigates and shows nothing
#[rstest]
#[tokio::test]
async fn test_redirect_flow() {
	let h = WidgetHarness::loading_page();
	h.behavior(200, &redirect_body("https://example.com/welcome"))
		.leads(201, "");
	let markup = h.mount("Join").await;

	h.submit(&markup, "ada@example.com").await;

	assert_eq!(h.page.navigations(), vec!["https://example.com/welcome"]);
	assert_eq!(h.sink.count("shipwait:message"), 0);
	assert!(h.page.alerts().is_empty());
	assert_eq!(h.sink.count("shipwait:redirect"), 1);
}

/// Tests that the form stays usable for a second lead
#[rstest]
#[tokio::test]
async fn test_consecutive_submissions() {
	let h = WidgetHarness::loading_page();
	h.behavior(200, &show_message_body("Thanks!")).leads(201, "");
	let markup = h.mount("Join").await;

	h.submit(&markup, "ada@example.com").await;
	h.submit(&markup, "grace@example.com").await;

	assert_eq!(h.sink.count("shipwait:success"), 2);
	assert_eq!(h.sink.loading_states(), vec![true, false, true, false]);
	assert!(!h.page.is_disabled(markup.input));
}

// ============================================================================
// Error Path Tests
// ============================================================================

/// Tests server error messages shown verbatim
#[rstest]
#[case(422, r#"{"message":"Invalid email"}"#, "Invalid email")]
#[case(409, r#"{"message":"Email already registered"}"#, "Email already registered")]
#[case(502, "Bad Gateway", "Bad Gateway")]
#[case(500, r#"{"status":"error"}"#, "Server error")]
#[tokio::test]
async fn test_rejected_lead(#[case] status: u16, #[case] body: &str, #[case] shown: &str) {
	let h = WidgetHarness::loading_page();
	h.behavior(200, &show_message_body("Thanks!")).leads(status, body);
	let markup = h.mount("Join").await;

	h.submit(&markup, "ada@example.com").await;

	assert_eq!(h.page.text(&markup.message.unwrap()).as_deref(), Some(shown));
	assert_eq!(h.page.value(&markup.input), "ada@example.com");
	assert_eq!(
		h.sink.detail_of("shipwait:error").unwrap(),
		json!({ "projectId": PROJECT_ID, "error": "ServerError", "message": shown })
	);
	assert_eq!(h.sink.count("shipwait:success"), 0);
	assert_eq!(h.sink.loading_states(), vec![true, false]);
}

/// Tests that blank input is rejected locally
#[rstest]
#[case("")]
#[case(" ")]
#[case("\t \n")]
#[tokio::test]
async fn test_blank_email(#[case] email: &str) {
	let h = WidgetHarness::loading_page();
	let markup = h.mount("Join").await;

	h.submit(&markup, email).await;

	assert!(h.transport.requests().is_empty());
	assert_eq!(
		h.page.text(&markup.message.unwrap()).as_deref(),
		Some("Please enter your email.")
	);
	assert!(h.sink.loading_states().is_empty());
	assert_eq!(
		h.sink.detail_of("shipwait:error").unwrap()["error"],
		"ValidationError"
	);
}

// ============================================================================
// Behavior Fallback Tests
// ============================================================================

/// Tests that a missing behavior degrades to do_nothing
#[rstest]
#[case(404, "")]
#[case(500, "Internal Server Error")]
#[case(200, r#"{"data":null}"#)]
#[case(200, r#"{"data":{"behavior_type":"fireworks"}}"#)]
#[tokio::test]
async fn test_behavior_fallback(#[case] status: u16, #[case] body: &str) {
	let h = WidgetHarness::loading_page();
	h.behavior(status, body).leads(201, "");
	let markup = h.mount("Join").await;

	h.submit(&markup, "ada@example.com").await;

	assert_eq!(h.page.value(&markup.input), "");
	assert_eq!(
		h.sink.detail_of("shipwait:success").unwrap()["behaviorType"],
		"do_nothing"
	);
	assert_eq!(
		h.sink.detail_of("shipwait:success").unwrap()["payload"],
		serde_json::Value::Null
	);
}

/// Tests that the behavior is never applied when the lead fails
#[rstest]
#[tokio::test]
async fn test_behavior_gated_on_lead() {
	let h = WidgetHarness::loading_page();
	h.behavior(200, &redirect_body("https://example.com/welcome"))
		.leads(503, "Service Unavailable");
	let markup = h.mount("Join").await;

	h.submit(&markup, "ada@example.com").await;

	assert!(h.page.navigations().is_empty());
	assert_eq!(h.sink.count("shipwait:redirect"), 0);
}

/// Tests alert fallback on a page without a message element
#[rstest]
#[tokio::test]
async fn test_alert_without_message_element() {
	let h = WidgetHarness::loading_page();
	h.behavior(200, &show_message_body("Thanks!")).leads(201, "");
	h.widget.arm().unwrap();
	let markup = h.page.bare_waitlist_form("Join");
	h.page.fire_ready();
	h.widget.pump().await;

	h.submit(&markup, "ada@example.com").await;

	assert_eq!(h.page.alerts(), vec!["Thanks!"]);
}
