//! `web-sys` implementation of [`WidgetDom`].

use shipwait_core::config::ScriptTag;
use shipwait_core::dom::{WidgetBus, WidgetDom, WidgetMessage};
use shipwait_core::error::{WidgetError, WidgetResult};
use shipwait_core::query::ElementQuery;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
	Document, Element, Event, HtmlButtonElement, HtmlInputElement,
	MutationObserver, MutationObserverInit, MutationRecord, Node, Window,
};

/// Converts a thrown JS value into a host error.
pub(crate) fn js_error(value: JsValue) -> WidgetError {
	let message = value
		.dyn_ref::<js_sys::Error>()
		.map(|err| String::from(err.message()))
		.or_else(|| value.as_string())
		.unwrap_or_else(|| format!("{value:?}"));
	WidgetError::host(message)
}

/// A live `MutationObserver` and the callback it holds.
pub struct ActiveObserver {
	observer: MutationObserver,
	_callback: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
}

/// The current browser document.
#[derive(Debug, Clone)]
pub struct WebDom {
	window: Window,
	document: Document,
}

impl WebDom {
	/// Binds to the global `window` and its document.
	pub fn new() -> WidgetResult<Self> {
		let window = web_sys::window().ok_or_else(|| WidgetError::host("no global window"))?;
		let document = window
			.document()
			.ok_or_else(|| WidgetError::host("window has no document"))?;
		Ok(Self { window, document })
	}

	/// The global window.
	pub fn window(&self) -> &Window {
		&self.window
	}

	/// `document.currentScript`, when the runtime exposes it.
	pub fn current_script(&self) -> Option<ScriptTag> {
		self.document
			.current_script()
			.map(|script| script_tag(&script))
	}

	/// Every `<script>` element on the page.
	pub fn scripts(&self) -> Vec<ScriptTag> {
		let Ok(node_list) = self.document.query_selector_all("script") else {
			return Vec::new();
		};
		(0..node_list.length())
			.filter_map(|i| node_list.item(i))
			.filter_map(|node| node.dyn_into::<Element>().ok())
			.map(|element| script_tag(&element))
			.collect()
	}

	fn observed_root(&self) -> Option<Node> {
		self.document
			.body()
			.map(Node::from)
			.or_else(|| self.document.document_element().map(Node::from))
	}
}

/// Snapshots a script element's `src` and attributes.
pub fn script_tag(element: &Element) -> ScriptTag {
	let mut tag = ScriptTag::new(element.get_attribute("src"));
	for name in element.get_attribute_names().iter() {
		if let Some(name) = name.as_string()
			&& let Some(value) = element.get_attribute(&name)
		{
			tag = tag.with_attribute(name, value);
		}
	}
	tag
}

impl WidgetDom for WebDom {
	type Node = Element;
	type Observer = ActiveObserver;

	fn query(&self, scope: Option<&Element>, query: &ElementQuery) -> Option<Element> {
		let selector = query.to_css();
		let found = match scope {
			Some(element) => element.query_selector(&selector),
			None => self.document.query_selector(&selector),
		};
		found.ok().flatten()
	}

	fn query_all(&self, scope: Option<&Element>, query: &ElementQuery) -> Vec<Element> {
		let selector = query.to_css();
		let found = match scope {
			Some(element) => element.query_selector_all(&selector),
			None => self.document.query_selector_all(&selector),
		};
		let Ok(node_list) = found else {
			return Vec::new();
		};
		(0..node_list.length())
			.filter_map(|i| node_list.item(i))
			.filter_map(|node| node.dyn_into::<Element>().ok())
			.collect()
	}

	fn matches(&self, node: &Element, query: &ElementQuery) -> bool {
		node.matches(&query.to_css()).unwrap_or(false)
	}

	fn closest(&self, node: &Element, query: &ElementQuery) -> Option<Element> {
		node.closest(&query.to_css()).ok().flatten()
	}

	fn attribute(&self, node: &Element, name: &str) -> Option<String> {
		node.get_attribute(name)
	}

	fn set_attribute(&self, node: &Element, name: &str, value: &str) {
		if let Err(err) = node.set_attribute(name, value) {
			tracing::debug!(target: "shipwait", "[Shipwait] set_attribute({name}) failed: {}", js_error(err));
		}
	}

	fn value(&self, input: &Element) -> String {
		input
			.dyn_ref::<HtmlInputElement>()
			.map(HtmlInputElement::value)
			.unwrap_or_default()
	}

	fn set_value(&self, input: &Element, value: &str) {
		if let Some(input) = input.dyn_ref::<HtmlInputElement>() {
			input.set_value(value);
		}
	}

	fn set_disabled(&self, node: &Element, disabled: bool) {
		if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
			input.set_disabled(disabled);
		} else if let Some(button) = node.dyn_ref::<HtmlButtonElement>() {
			button.set_disabled(disabled);
		}
	}

	fn text(&self, node: &Element) -> Option<String> {
		node.text_content()
	}

	fn set_text(&self, node: &Element, text: &str) {
		node.set_text_content(Some(text));
	}

	fn alert(&self, message: &str) {
		if let Err(err) = self.window.alert_with_message(message) {
			tracing::debug!(target: "shipwait", "[Shipwait] alert failed: {}", js_error(err));
		}
	}

	fn navigate(&self, url: &str) -> WidgetResult<()> {
		self.window.location().set_href(url).map_err(js_error)
	}

	fn listen_submit(&self, form: &Element, bus: WidgetBus<Element>) -> WidgetResult<()> {
		let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
			event.prevent_default();
			if !bus.post(WidgetMessage::Submit) {
				tracing::debug!(target: "shipwait", "[Shipwait] submit after widget shutdown");
			}
		});
		form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref())
			.map_err(js_error)?;
		// The listener lives as long as the form.
		closure.forget();
		Ok(())
	}

	fn observe_insertions(&self, bus: WidgetBus<Element>) -> WidgetResult<ActiveObserver> {
		let root = self
			.observed_root()
			.ok_or_else(|| WidgetError::host("document has no root element"))?;

		let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
			move |records: js_sys::Array, _observer: MutationObserver| {
				let mut inserted = Vec::new();
				for record in records.iter() {
					let record: MutationRecord = record.unchecked_into();
					let added = record.added_nodes();
					for i in 0..added.length() {
						if let Some(node) = added.item(i)
							&& let Ok(element) = node.dyn_into::<Element>()
						{
							inserted.push(element);
						}
					}
				}
				if !inserted.is_empty() {
					bus.post(WidgetMessage::NodesInserted(inserted));
				}
			},
		);

		let observer = MutationObserver::new(callback.as_ref().unchecked_ref()).map_err(js_error)?;
		let init = MutationObserverInit::new();
		init.set_child_list(true);
		init.set_subtree(true);
		observer
			.observe_with_options(&root, &init)
			.map_err(js_error)?;

		Ok(ActiveObserver {
			observer,
			_callback: callback,
		})
	}

	fn disconnect(&self, observer: ActiveObserver) {
		observer.observer.disconnect();
	}

	fn on_ready(&self, bus: WidgetBus<Element>) -> WidgetResult<()> {
		if self.document.ready_state() != "loading" {
			bus.post(WidgetMessage::DomReady);
			return Ok(());
		}
		let closure = Closure::<dyn FnMut()>::new(move || {
			bus.post(WidgetMessage::DomReady);
		});
		self.document
			.add_event_listener_with_callback("DOMContentLoaded", closure.as_ref().unchecked_ref())
			.map_err(js_error)?;
		closure.forget();
		Ok(())
	}
}
