//! In-memory page, transport and event sink.
//!
//! Enough of a browser to drive a [`Widget`](crate::widget::Widget) end to
//! end: an element tree with a `body` root, submit listeners, insertion
//! observers and a ready state. Every handle is cheap to clone and shares
//! state, so a test keeps one clone for assertions while the widget owns
//! another.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;

use crate::dom::{WidgetBus, WidgetDom, WidgetMessage};
use crate::error::{WidgetError, WidgetResult};
use crate::events::{EventSink, WidgetEvent};
use crate::http::{HttpResponse, HttpTransport, TransportError};
use crate::query::ElementQuery;

/// Element handle of a [`MockPage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Observer handle of a [`MockPage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverId(usize);

#[derive(Debug, Default)]
struct Element {
	tag: String,
	attributes: BTreeMap<String, String>,
	text: String,
	value: String,
	disabled: bool,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

#[derive(Default)]
struct PageState {
	elements: Vec<Element>,
	ready: bool,
	ready_hooks: Vec<WidgetBus<NodeId>>,
	observers: Vec<Option<WidgetBus<NodeId>>>,
	submit_listeners: Vec<(NodeId, WidgetBus<NodeId>)>,
	alerts: Vec<String>,
	navigations: Vec<String>,
	navigation_failure: Option<String>,
	listen_failure: Option<String>,
	observe_failure: Option<String>,
}

impl PageState {
	fn element(&self, id: NodeId) -> &Element {
		&self.elements[id.0]
	}

	fn element_mut(&mut self, id: NodeId) -> &mut Element {
		&mut self.elements[id.0]
	}

	fn is_attached(&self, id: NodeId) -> bool {
		let mut current = Some(id);
		while let Some(node) = current {
			if node == BODY {
				return true;
			}
			current = self.element(node).parent;
		}
		false
	}

	fn matches(&self, id: NodeId, query: &ElementQuery) -> bool {
		let element = self.element(id);
		query.matches_element(&element.tag, |name| element.attributes.get(name).cloned())
	}

	fn first_descendant(&self, root: NodeId, query: &ElementQuery) -> Option<NodeId> {
		self.descendants(root).find(|node| self.matches(*node, query))
	}

	/// Descendants of `root` in document order.
	fn descendants(&self, root: NodeId) -> impl Iterator<Item = NodeId> + '_ {
		let mut stack: Vec<NodeId> = self.element(root).children.iter().rev().copied().collect();
		std::iter::from_fn(move || {
			let node = stack.pop()?;
			stack.extend(self.element(node).children.iter().rev().copied());
			Some(node)
		})
	}
}

const BODY: NodeId = NodeId(0);

/// Elements created by [`MockPage::waitlist_form`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitlistMarkup {
	/// The `form`.
	pub form: NodeId,
	/// The `input[data-shipwait]`.
	pub input: NodeId,
	/// The `[data-shipwait-message]` element, when created.
	pub message: Option<NodeId>,
	/// The `button[type="submit"]`.
	pub button: Option<NodeId>,
}

/// In-memory document.
#[derive(Clone)]
pub struct MockPage {
	state: Rc<RefCell<PageState>>,
}

impl std::fmt::Debug for MockPage {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let state = self.state.borrow();
		f.debug_struct("MockPage")
			.field("elements", &state.elements.len())
			.field("ready", &state.ready)
			.finish()
	}
}

impl Default for MockPage {
	fn default() -> Self {
		Self::new()
	}
}

impl MockPage {
	/// A page still parsing: ready hooks wait for [`MockPage::fire_ready`].
	pub fn new() -> Self {
		let mut state = PageState::default();
		state.elements.push(Element {
			tag: "body".to_string(),
			..Element::default()
		});
		Self {
			state: Rc::new(RefCell::new(state)),
		}
	}

	/// A fully parsed page: ready hooks fire as soon as they are registered.
	pub fn loaded() -> Self {
		let page = Self::new();
		page.state.borrow_mut().ready = true;
		page
	}

	/// The `body` element.
	pub fn body(&self) -> NodeId {
		BODY
	}

	/// Creates a detached element.
	pub fn element(&self, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
		let mut state = self.state.borrow_mut();
		let id = NodeId(state.elements.len());
		state.elements.push(Element {
			tag: tag.to_string(),
			attributes: attributes
				.iter()
				.map(|(name, value)| (name.to_string(), value.to_string()))
				.collect(),
			..Element::default()
		});
		id
	}

	/// Appends `child` to `parent`. Live observers are notified when the
	/// child lands in the document.
	pub fn append(&self, parent: NodeId, child: NodeId) {
		let mut state = self.state.borrow_mut();
		let previous = state.element(child).parent;
		if let Some(previous) = previous {
			state.element_mut(previous).children.retain(|node| *node != child);
		}
		state.element_mut(child).parent = Some(parent);
		state.element_mut(parent).children.push(child);

		if state.is_attached(child) {
			for bus in state.observers.iter().flatten() {
				bus.post(WidgetMessage::NodesInserted(vec![child]));
			}
		}
	}

	/// Builds `form > input[data-shipwait] + button[type=submit]` followed by
	/// a message element, and appends it to the body in one insertion.
	pub fn waitlist_form(&self, label: &str) -> WaitlistMarkup {
		let markup = self.detached_form(label, true);
		self.append(BODY, markup.form);
		markup
	}

	/// Like [`MockPage::waitlist_form`] without a message element.
	pub fn bare_waitlist_form(&self, label: &str) -> WaitlistMarkup {
		let markup = self.detached_form(label, false);
		self.append(BODY, markup.form);
		markup
	}

	fn detached_form(&self, label: &str, with_message: bool) -> WaitlistMarkup {
		let form = self.element("form", &[]);
		let input = self.element("input", &[("type", "email"), ("data-shipwait", "")]);
		let button = self.element("button", &[("type", "submit")]);
		self.state.borrow_mut().element_mut(button).text = label.to_string();
		self.append(form, input);
		self.append(form, button);
		let message = with_message.then(|| {
			let message = self.element("p", &[("data-shipwait-message", "")]);
			self.append(form, message);
			message
		});
		WaitlistMarkup {
			form,
			input,
			message,
			button: Some(button),
		}
	}

	/// Sets an input value the way typing would.
	pub fn type_value(&self, input: NodeId, value: &str) {
		self.state.borrow_mut().element_mut(input).value = value.to_string();
	}

	/// Whether a control is disabled.
	pub fn is_disabled(&self, node: NodeId) -> bool {
		self.state.borrow().element(node).disabled
	}

	/// Dispatches `submit` on `form`. Returns how many listeners received it.
	pub fn submit(&self, form: NodeId) -> usize {
		let state = self.state.borrow();
		state
			.submit_listeners
			.iter()
			.filter(|(target, _)| *target == form)
			.filter(|(_, bus)| bus.post(WidgetMessage::Submit))
			.count()
	}

	/// Finishes parsing and runs pending ready hooks.
	pub fn fire_ready(&self) {
		let mut state = self.state.borrow_mut();
		state.ready = true;
		for bus in state.ready_hooks.drain(..) {
			bus.post(WidgetMessage::DomReady);
		}
	}

	/// Alerts shown so far.
	pub fn alerts(&self) -> Vec<String> {
		self.state.borrow().alerts.clone()
	}

	/// URLs navigated to so far.
	pub fn navigations(&self) -> Vec<String> {
		self.state.borrow().navigations.clone()
	}

	/// Makes every later navigation fail with `message`.
	pub fn fail_navigation(&self, message: &str) {
		self.state.borrow_mut().navigation_failure = Some(message.to_string());
	}

	/// Makes every later submit subscription fail with `message`.
	pub fn fail_listen(&self, message: &str) {
		self.state.borrow_mut().listen_failure = Some(message.to_string());
	}

	/// Makes every later insertion observer fail with `message`.
	pub fn fail_observe(&self, message: &str) {
		self.state.borrow_mut().observe_failure = Some(message.to_string());
	}

	/// Live insertion observers.
	pub fn observer_count(&self) -> usize {
		self.state.borrow().observers.iter().flatten().count()
	}

	/// Submit listeners attached to `form`.
	pub fn listener_count(&self, form: NodeId) -> usize {
		self.state
			.borrow()
			.submit_listeners
			.iter()
			.filter(|(target, _)| *target == form)
			.count()
	}
}

impl WidgetDom for MockPage {
	type Node = NodeId;
	type Observer = ObserverId;

	fn query(&self, scope: Option<&NodeId>, query: &ElementQuery) -> Option<NodeId> {
		let state = self.state.borrow();
		state.first_descendant(scope.copied().unwrap_or(BODY), query)
	}

	fn query_all(&self, scope: Option<&NodeId>, query: &ElementQuery) -> Vec<NodeId> {
		let state = self.state.borrow();
		state
			.descendants(scope.copied().unwrap_or(BODY))
			.filter(|node| state.matches(*node, query))
			.collect()
	}

	fn matches(&self, node: &NodeId, query: &ElementQuery) -> bool {
		self.state.borrow().matches(*node, query)
	}

	fn closest(&self, node: &NodeId, query: &ElementQuery) -> Option<NodeId> {
		let state = self.state.borrow();
		let mut current = Some(*node);
		while let Some(candidate) = current {
			if state.matches(candidate, query) {
				return Some(candidate);
			}
			current = state.element(candidate).parent;
		}
		None
	}

	fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
		self.state.borrow().element(*node).attributes.get(name).cloned()
	}

	fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
		self.state
			.borrow_mut()
			.element_mut(*node)
			.attributes
			.insert(name.to_string(), value.to_string());
	}

	fn value(&self, input: &NodeId) -> String {
		self.state.borrow().element(*input).value.clone()
	}

	fn set_value(&self, input: &NodeId, value: &str) {
		self.type_value(*input, value);
	}

	fn set_disabled(&self, node: &NodeId, disabled: bool) {
		self.state.borrow_mut().element_mut(*node).disabled = disabled;
	}

	fn text(&self, node: &NodeId) -> Option<String> {
		Some(self.state.borrow().element(*node).text.clone())
	}

	fn set_text(&self, node: &NodeId, text: &str) {
		self.state.borrow_mut().element_mut(*node).text = text.to_string();
	}

	fn alert(&self, message: &str) {
		self.state.borrow_mut().alerts.push(message.to_string());
	}

	fn navigate(&self, url: &str) -> WidgetResult<()> {
		let mut state = self.state.borrow_mut();
		if let Some(message) = &state.navigation_failure {
			return Err(WidgetError::host(message.clone()));
		}
		state.navigations.push(url.to_string());
		Ok(())
	}

	fn listen_submit(&self, form: &NodeId, bus: WidgetBus<NodeId>) -> WidgetResult<()> {
		let mut state = self.state.borrow_mut();
		if let Some(message) = &state.listen_failure {
			return Err(WidgetError::host(message.clone()));
		}
		state.submit_listeners.push((*form, bus));
		Ok(())
	}

	fn observe_insertions(&self, bus: WidgetBus<NodeId>) -> WidgetResult<ObserverId> {
		let mut state = self.state.borrow_mut();
		if let Some(message) = &state.observe_failure {
			return Err(WidgetError::host(message.clone()));
		}
		state.observers.push(Some(bus));
		Ok(ObserverId(state.observers.len() - 1))
	}

	fn disconnect(&self, observer: ObserverId) {
		if let Some(slot) = self.state.borrow_mut().observers.get_mut(observer.0) {
			*slot = None;
		}
	}

	fn on_ready(&self, bus: WidgetBus<NodeId>) -> WidgetResult<()> {
		let mut state = self.state.borrow_mut();
		if state.ready {
			bus.post(WidgetMessage::DomReady);
		} else {
			state.ready_hooks.push(bus);
		}
		Ok(())
	}
}

/// A request seen by [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
	/// `"GET"` or `"POST"`.
	pub method: &'static str,
	/// Full URL.
	pub url: String,
	/// Body of a POST.
	pub body: Option<String>,
}

#[derive(Debug)]
struct Route {
	method: &'static str,
	path: String,
	reply: Result<HttpResponse, TransportError>,
}

#[derive(Debug, Default)]
struct TransportState {
	routes: Vec<Route>,
	requests: Vec<RecordedRequest>,
}

/// Canned HTTP transport.
///
/// Routes match when the request URL contains the registered path. The most
/// recently registered route wins. Unrouted requests answer `404`.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
	state: Rc<RefCell<TransportState>>,
}

impl MockTransport {
	/// Creates a transport with no routes.
	pub fn new() -> Self {
		Self::default()
	}

	fn route(&self, method: &'static str, path: &str, reply: Result<HttpResponse, TransportError>) {
		self.state.borrow_mut().routes.push(Route {
			method,
			path: path.to_string(),
			reply,
		});
	}

	/// Answers GET requests to `path` with `response`.
	pub fn on_get(&self, path: &str, response: HttpResponse) {
		self.route("GET", path, Ok(response));
	}

	/// Answers POST requests to `path` with `response`.
	pub fn on_post(&self, path: &str, response: HttpResponse) {
		self.route("POST", path, Ok(response));
	}

	/// Fails GET requests to `path`.
	pub fn fail_get(&self, path: &str, err: TransportError) {
		self.route("GET", path, Err(err));
	}

	/// Fails POST requests to `path`.
	pub fn fail_post(&self, path: &str, err: TransportError) {
		self.route("POST", path, Err(err));
	}

	/// Requests seen so far, in order.
	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.state.borrow().requests.clone()
	}

	fn exchange(
		&self,
		method: &'static str,
		url: &str,
		body: Option<String>,
	) -> Result<HttpResponse, TransportError> {
		let mut state = self.state.borrow_mut();
		state.requests.push(RecordedRequest {
			method,
			url: url.to_string(),
			body,
		});
		state
			.routes
			.iter()
			.rev()
			.find(|route| route.method == method && url.contains(&route.path))
			.map(|route| route.reply.clone())
			.unwrap_or_else(|| Ok(HttpResponse::new(404, "")))
	}
}

#[async_trait(?Send)]
impl HttpTransport for MockTransport {
	async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
		self.exchange("GET", url, None)
	}

	async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse, TransportError> {
		self.exchange("POST", url, Some(body))
	}
}

/// Event sink that keeps everything it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
	events: Rc<RefCell<Vec<(String, WidgetEvent)>>>,
}

impl RecordingSink {
	/// Creates an empty sink.
	pub fn new() -> Self {
		Self::default()
	}

	/// Full names of the events received, in order.
	pub fn names(&self) -> Vec<String> {
		self.events.borrow().iter().map(|(_, event)| event.name()).collect()
	}

	/// `detail` of the first event called `name`.
	pub fn detail_of(&self, name: &str) -> Option<Value> {
		self.events
			.borrow()
			.iter()
			.find(|(_, event)| event.name() == name)
			.map(|(project_id, event)| event.detail(project_id))
	}

	/// How many events called `name` were received.
	pub fn count(&self, name: &str) -> usize {
		self.events
			.borrow()
			.iter()
			.filter(|(_, event)| event.name() == name)
			.count()
	}

	/// The `loading` flags received, in order.
	pub fn loading_states(&self) -> Vec<bool> {
		self.events
			.borrow()
			.iter()
			.filter_map(|(_, event)| match event {
				WidgetEvent::Loading { loading } => Some(*loading),
				_ => None,
			})
			.collect()
	}
}

impl EventSink for RecordingSink {
	fn emit(&self, project_id: &str, event: &WidgetEvent) {
		self.events
			.borrow_mut()
			.push((project_id.to_string(), event.clone()));
	}
}
