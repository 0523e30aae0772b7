//! Integration test utilities for Shipwait
//!
//! Wires a [`Widget`] to the in-memory page, transport and event sink from
//! `shipwait_core::testing` and keeps handles to all three for assertions.

use shipwait_core::api::{BEHAVIOR_PATH, LEADS_PATH};
use shipwait_core::testing::{MockPage, MockTransport, RecordingSink, WaitlistMarkup};
use shipwait_core::{HttpResponse, ProjectConfig, Widget};

/// Project id used by the fixtures.
pub const PROJECT_ID: &str = "abc123";

/// API base URL used by the fixtures.
pub const API_BASE_URL: &str = "https://api.shipwait.test";

/// Widget type driven by the fixtures.
pub type TestWidget = Widget<MockPage, MockTransport, RecordingSink>;

/// A widget plus the shared handles of its seams.
pub struct WidgetHarness {
	/// The page the widget runs on.
	pub page: MockPage,
	/// Canned API responses.
	pub transport: MockTransport,
	/// Events the widget published.
	pub sink: RecordingSink,
	/// The widget under test.
	pub widget: TestWidget,
}

impl WidgetHarness {
	/// Creates an unarmed widget for `config` on `page`.
	pub fn new(page: MockPage, config: ProjectConfig) -> Self {
		let transport = MockTransport::new();
		let sink = RecordingSink::new();
		let widget = Widget::new(config, page.clone(), transport.clone(), sink.clone());
		Self {
			page,
			transport,
			sink,
			widget,
		}
	}

	/// Default project on a page that is still parsing.
	pub fn loading_page() -> Self {
		Self::new(MockPage::new(), default_config())
	}

	/// Answers the behavior endpoint with `body`.
	pub fn behavior(&self, status: u16, body: &str) -> &Self {
		self.transport.on_get(BEHAVIOR_PATH, HttpResponse::new(status, body));
		self
	}

	/// Answers the leads endpoint with `body`.
	pub fn leads(&self, status: u16, body: &str) -> &Self {
		self.transport.on_post(LEADS_PATH, HttpResponse::new(status, body));
		self
	}

	/// Arms the widget, renders the form and lets the page finish parsing.
	pub async fn mount(&self, label: &str) -> WaitlistMarkup {
		self.widget.arm().expect("arm widget");
		let markup = self.page.waitlist_form(label);
		self.page.fire_ready();
		self.widget.pump().await;
		markup
	}

	/// Types `email` and submits the form, then drains the widget's queue.
	pub async fn submit(&self, markup: &WaitlistMarkup, email: &str) {
		self.page.type_value(markup.input, email);
		self.page.submit(markup.form);
		self.widget.pump().await;
	}
}

/// Configuration of the fixture project.
pub fn default_config() -> ProjectConfig {
	ProjectConfig::new(PROJECT_ID, API_BASE_URL)
}

/// Behavior body for `show_message`.
pub fn show_message_body(message: &str) -> String {
	serde_json::json!({ "data": { "behavior_type": "show_message", "message": message } }).to_string()
}

/// Behavior body for `redirect`.
pub fn redirect_body(url: &str) -> String {
	serde_json::json!({ "data": { "behavior_type": "redirect", "redirect": url } }).to_string()
}
