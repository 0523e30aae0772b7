//! Binding Race Integration Tests
//!
//! The widget can find its form through the ready hook or through the
//! insertion observer. These tests cover every ordering of script load,
//! form render and document ready, plus several widgets on one page.
//!
//! Success Criteria:
//! 1. A form is bound at most once, whichever trigger fires first
//! 2. One submit produces exactly one `shipwait:submit`
//! 3. The observer is gone once the widget is bound
//! 4. Widgets on the same page never share state

use rstest::*;
use shipwait_core::query::BOUND_MARKER;
use shipwait_core::testing::MockPage;
use shipwait_core::{ProjectConfig, WidgetDom};
use shipwait_integration_tests::*;

#[derive(Debug, Clone, Copy)]
enum Order {
	/// Form already rendered when the script runs.
	FormFirst,
	/// Form rendered while the document is still parsing.
	FormBeforeReady,
	/// Form rendered by client code after the ready event.
	FormAfterReady,
}

// ============================================================================
// Ordering Tests
// ============================================================================

/// Tests single binding for every render order
#[rstest]
#[case(Order::FormFirst)]
#[case(Order::FormBeforeReady)]
#[case(Order::FormAfterReady)]
#[tokio::test]
async fn test_binds_exactly_once(#[case] order: Order) {
	let h = WidgetHarness::loading_page();
	h.leads(201, "");

	let markup = match order {
		Order::FormFirst => {
			let markup = h.page.waitlist_form("Join");
			h.widget.arm().unwrap();
			h.page.fire_ready();
			markup
		}
		Order::FormBeforeReady => {
			h.widget.arm().unwrap();
			let markup = h.page.waitlist_form("Join");
			h.page.fire_ready();
			markup
		}
		Order::FormAfterReady => {
			h.widget.arm().unwrap();
			h.page.fire_ready();
			h.widget.pump().await;
			h.page.waitlist_form("Join")
		}
	};
	h.widget.pump().await;

	assert!(h.widget.is_bound());
	assert_eq!(h.page.listener_count(markup.form), 1);
	assert_eq!(h.page.observer_count(), 0);

	h.submit(&markup, "ada@example.com").await;
	assert_eq!(h.sink.count("shipwait:submit"), 1);
}

/// Tests that a script loaded after parsing binds without a ready event
#[rstest]
#[tokio::test]
async fn test_late_script_binds_immediately() {
	let page = MockPage::loaded();
	let markup = page.waitlist_form("Join");
	let h = WidgetHarness::new(page, default_config());

	h.widget.arm().unwrap();
	h.widget.pump().await;

	assert!(h.widget.is_bound());
	assert_eq!(h.page.listener_count(markup.form), 1);
}

/// Tests that a form nested in a late container is found
#[rstest]
#[tokio::test]
async fn test_nested_insertion() {
	let h = WidgetHarness::loading_page();
	h.widget.arm().unwrap();
	h.page.fire_ready();
	h.widget.pump().await;

	let section = h.page.element("section", &[]);
	let wrapper = h.page.element("div", &[("class", "card")]);
	let form = h.page.element("form", &[]);
	let input = h.page.element("input", &[("data-shipwait", "")]);
	h.page.append(form, input);
	h.page.append(wrapper, form);
	h.page.append(section, wrapper);
	h.page.append(h.page.body(), section);
	h.widget.pump().await;

	assert!(h.widget.is_bound());
	assert_eq!(h.widget.controller().unwrap().binding().form, form);
}

// ============================================================================
// Watcher Lifecycle Tests
// ============================================================================

/// Tests that the watch ends after an unbindable insert
#[rstest]
#[tokio::test]
async fn test_unbindable_insert_ends_watch() {
	let h = WidgetHarness::loading_page();
	h.widget.arm().unwrap();

	let stray = h.page.element("input", &[("data-shipwait", "")]);
	h.page.append(h.page.body(), stray);
	h.widget.pump().await;
	assert_eq!(h.page.observer_count(), 0);

	let markup = h.page.waitlist_form("Join");
	h.widget.pump().await;

	assert!(!h.widget.is_bound());
	assert_eq!(h.page.listener_count(markup.form), 0);
}

/// Tests that the ready path still binds after the watch ended
#[rstest]
#[tokio::test]
async fn test_ready_binds_after_watch_ended() {
	let h = WidgetHarness::loading_page();
	h.widget.arm().unwrap();

	let stray = h.page.element("input", &[("data-shipwait", "")]);
	h.page.append(h.page.body(), stray);
	h.widget.pump().await;
	assert!(!h.widget.is_watching());

	let markup = h.page.waitlist_form("Join");
	h.page.fire_ready();
	h.widget.pump().await;

	// The document-order first marked input is the stray one, which has no form.
	assert!(!h.widget.is_bound());
	assert_eq!(h.page.listener_count(markup.form), 0);
}

// ============================================================================
// Multiple Widget Tests
// ============================================================================

/// Tests two widgets for two forms on one page
#[rstest]
#[case::rendered_before_ready(true)]
#[case::rendered_after_ready(false)]
#[tokio::test]
async fn test_two_widgets_two_forms(#[case] before_ready: bool) {
	let page = MockPage::new();
	let alpha = WidgetHarness::new(page.clone(), ProjectConfig::new("alpha", API_BASE_URL));
	let beta = WidgetHarness::new(page.clone(), ProjectConfig::new("beta", API_BASE_URL));
	beta.leads(201, "");
	alpha.widget.arm().unwrap();
	beta.widget.arm().unwrap();

	if !before_ready {
		page.fire_ready();
	}
	let first_form = page.waitlist_form("Join A");
	let second_form = page.waitlist_form("Join B");
	if before_ready {
		page.fire_ready();
	}
	alpha.widget.pump().await;
	beta.widget.pump().await;

	assert!(alpha.widget.is_bound());
	assert!(beta.widget.is_bound());
	assert!(!beta.widget.is_watching());
	assert_eq!(
		page.attribute(&first_form.form, BOUND_MARKER).as_deref(),
		Some("alpha")
	);
	assert_eq!(
		page.attribute(&second_form.form, BOUND_MARKER).as_deref(),
		Some("beta")
	);
	assert_eq!(page.listener_count(first_form.form), 1);
	assert_eq!(page.listener_count(second_form.form), 1);

	beta.submit(&second_form, "ada@example.com").await;
	alpha.widget.pump().await;

	assert_eq!(beta.sink.count("shipwait:success"), 1);
	assert_eq!(alpha.sink.count("shipwait:submit"), 0);
	assert_eq!(
		beta.sink.detail_of("shipwait:submit").unwrap()["projectId"],
		"beta"
	);
}

/// Tests that a widget keeps watching while only claimed forms appear
#[rstest]
#[tokio::test]
async fn test_watch_survives_claimed_insertions() {
	let page = MockPage::new();
	let alpha = WidgetHarness::new(page.clone(), ProjectConfig::new("alpha", API_BASE_URL));
	let beta = WidgetHarness::new(page.clone(), ProjectConfig::new("beta", API_BASE_URL));
	alpha.widget.arm().unwrap();
	beta.widget.arm().unwrap();
	page.fire_ready();

	page.waitlist_form("Join A");
	alpha.widget.pump().await;
	beta.widget.pump().await;
	assert!(!beta.widget.is_bound());
	assert!(beta.widget.is_watching());

	let late = page.waitlist_form("Join B");
	beta.widget.pump().await;

	assert!(beta.widget.is_bound());
	assert_eq!(beta.widget.controller().unwrap().binding().form, late.form);
	assert_eq!(page.observer_count(), 0);
}

/// Tests that a second widget does not steal a bound form
#[rstest]
#[tokio::test]
async fn test_second_widget_leaves_bound_form() {
	let page = MockPage::loaded();
	let markup = page.waitlist_form("Join");
	let alpha = WidgetHarness::new(page.clone(), ProjectConfig::new("alpha", API_BASE_URL));
	let beta = WidgetHarness::new(page.clone(), ProjectConfig::new("beta", API_BASE_URL));

	alpha.widget.arm().unwrap();
	beta.widget.arm().unwrap();
	alpha.widget.pump().await;
	beta.widget.pump().await;

	assert!(alpha.widget.is_bound());
	assert!(!beta.widget.is_bound());
	assert_eq!(page.listener_count(markup.form), 1);
}
