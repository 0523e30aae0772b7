//! DOM seam and the inbound message bus.
//!
//! Page activity (document ready, inserted nodes, form submits) reaches a
//! widget as [`WidgetMessage`]s posted on a [`WidgetBus`]. The widget is the
//! single consumer of its bus and handles messages one at a time.
//!
//! ```text
//! DOMContentLoaded ──┐
//! MutationObserver ──┼──► WidgetBus ──► Widget::run ──► SubmissionController
//! form "submit" ─────┘
//! ```

use std::fmt;

use futures::channel::mpsc;

use crate::error::WidgetResult;
use crate::query::ElementQuery;

/// Message delivered to a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetMessage<N> {
	/// The document finished parsing, or already had when the widget armed.
	DomReady,
	/// Element nodes were added somewhere under the observed root.
	NodesInserted(Vec<N>),
	/// The bound form was submitted. Native submission is already suppressed.
	Submit,
}

/// Receiving half of a [`WidgetBus`].
pub type WidgetReceiver<N> = mpsc::UnboundedReceiver<WidgetMessage<N>>;

/// Sending half of a widget's message channel.
pub struct WidgetBus<N> {
	sender: mpsc::UnboundedSender<WidgetMessage<N>>,
}

impl<N> WidgetBus<N> {
	/// Creates a bus and its receiver.
	pub fn channel() -> (Self, WidgetReceiver<N>) {
		let (sender, receiver) = mpsc::unbounded();
		(Self { sender }, receiver)
	}

	/// Posts a message. Returns `false` when the widget is gone.
	pub fn post(&self, message: WidgetMessage<N>) -> bool {
		self.sender.unbounded_send(message).is_ok()
	}

	/// Whether the receiving side was dropped.
	pub fn is_closed(&self) -> bool {
		self.sender.is_closed()
	}
}

impl<N> Clone for WidgetBus<N> {
	fn clone(&self) -> Self {
		Self {
			sender: self.sender.clone(),
		}
	}
}

impl<N> fmt::Debug for WidgetBus<N> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WidgetBus")
			.field("closed", &self.is_closed())
			.finish()
	}
}

/// The host page as seen by the widget.
///
/// UI mutations are infallible from the widget's point of view: a backend
/// that cannot apply one (wrong element type, detached node) skips it.
pub trait WidgetDom {
	/// Element handle. Cloning must be cheap.
	type Node: Clone + fmt::Debug + 'static;

	/// Handle to an active insertion observer.
	type Observer;

	/// First element matching `query` in document order, searching the
	/// descendants of `scope`, or the whole document when `scope` is `None`.
	fn query(&self, scope: Option<&Self::Node>, query: &ElementQuery) -> Option<Self::Node>;

	/// Every element matching `query` in document order, with the same
	/// scoping as [`WidgetDom::query`].
	fn query_all(&self, scope: Option<&Self::Node>, query: &ElementQuery) -> Vec<Self::Node>;

	/// Whether `node` itself matches `query`.
	fn matches(&self, node: &Self::Node, query: &ElementQuery) -> bool;

	/// `node` or its nearest ancestor matching `query`.
	fn closest(&self, node: &Self::Node, query: &ElementQuery) -> Option<Self::Node>;

	/// Attribute value.
	fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

	/// Sets an attribute.
	fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);

	/// Current value of an input.
	fn value(&self, input: &Self::Node) -> String;

	/// Replaces the value of an input.
	fn set_value(&self, input: &Self::Node, value: &str);

	/// Toggles the `disabled` state of a form control.
	fn set_disabled(&self, node: &Self::Node, disabled: bool);

	/// Text content.
	fn text(&self, node: &Self::Node) -> Option<String>;

	/// Replaces the text content.
	fn set_text(&self, node: &Self::Node, text: &str);

	/// Blocking native alert, used when the page has no message element.
	fn alert(&self, message: &str);

	/// Top-level navigation to `url`.
	fn navigate(&self, url: &str) -> WidgetResult<()>;

	/// Subscribes to `submit` on `form`. The backend must suppress the native
	/// submission synchronously and then post [`WidgetMessage::Submit`].
	fn listen_submit(&self, form: &Self::Node, bus: WidgetBus<Self::Node>) -> WidgetResult<()>;

	/// Starts observing subtree insertions, posting
	/// [`WidgetMessage::NodesInserted`] for added element nodes.
	fn observe_insertions(&self, bus: WidgetBus<Self::Node>) -> WidgetResult<Self::Observer>;

	/// Stops an observer started by [`WidgetDom::observe_insertions`].
	fn disconnect(&self, observer: Self::Observer);

	/// Posts [`WidgetMessage::DomReady`] once the document is parsed, or right
	/// away when it already is.
	fn on_ready(&self, bus: WidgetBus<Self::Node>) -> WidgetResult<()>;
}
