//! Widget instance: one configuration, one binding, one message loop.

use std::cell::{OnceCell, RefCell};

use futures::StreamExt;

use crate::api::ApiClient;
use crate::behavior::SubmissionBehavior;
use crate::config::ProjectConfig;
use crate::controller::{SubmissionController, SubmissionResult};
use crate::dom::{WidgetBus, WidgetDom, WidgetMessage, WidgetReceiver};
use crate::error::{BindingError, WidgetResult};
use crate::events::{EventSink, WidgetEvent};
use crate::http::HttpTransport;
use crate::locator::ElementLocator;
use crate::query::BOUND_MARKER;
use crate::watcher::DomWatcher;

/// Everything a submission cycle needs besides the binding.
pub struct WidgetContext<D, T, E> {
	config: ProjectConfig,
	dom: D,
	api: ApiClient<T>,
	events: E,
}

impl<D, T, E> WidgetContext<D, T, E> {
	/// Resolved configuration.
	pub fn config(&self) -> &ProjectConfig {
		&self.config
	}

	/// Host page.
	pub fn dom(&self) -> &D {
		&self.dom
	}

	/// Event sink.
	pub fn events(&self) -> &E {
		&self.events
	}

	/// API client.
	pub fn api(&self) -> &ApiClient<T> {
		&self.api
	}
}

impl<D, T: HttpTransport, E> WidgetContext<D, T, E> {
	/// Creates a context. The API client targets `config.api_base_url`.
	pub fn new(config: ProjectConfig, dom: D, transport: T, events: E) -> Self {
		let api = ApiClient::new(config.api_base_url.clone(), transport);
		Self {
			config,
			dom,
			api,
			events,
		}
	}

	/// Behavior for the next submission: the inline override, or one remote
	/// fetch.
	pub async fn resolve_behavior(&self) -> Option<SubmissionBehavior> {
		match &self.config.inline_behavior {
			Some(behavior) => Some(behavior.clone()),
			None => self.api.fetch_behavior(&self.config.project_id).await,
		}
	}
}

impl<D, T, E: EventSink> WidgetContext<D, T, E> {
	/// Publishes an event for this widget's project.
	pub fn emit(&self, event: &WidgetEvent) {
		tracing::trace!(target: "shipwait", event = event.kind(), "[Shipwait] emit");
		self.events.emit(&self.config.project_id, event);
	}
}

/// One widget on the page.
///
/// Binds at most one form, through whichever of the ready hook or the
/// insertion observer finds the marked input first.
pub struct Widget<D: WidgetDom, T, E> {
	ctx: WidgetContext<D, T, E>,
	controller: OnceCell<SubmissionController<D::Node>>,
	watcher: RefCell<DomWatcher<D::Observer>>,
	bus: WidgetBus<D::Node>,
	receiver: RefCell<Option<WidgetReceiver<D::Node>>>,
}

impl<D, T, E> Widget<D, T, E>
where
	D: WidgetDom,
	T: HttpTransport,
	E: EventSink,
{
	/// Creates an unarmed widget.
	pub fn new(config: ProjectConfig, dom: D, transport: T, events: E) -> Self {
		let (bus, receiver) = WidgetBus::channel();
		Self {
			ctx: WidgetContext::new(config, dom, transport, events),
			controller: OnceCell::new(),
			watcher: RefCell::new(DomWatcher::new()),
			bus,
			receiver: RefCell::new(Some(receiver)),
		}
	}

	/// Resolved configuration.
	pub fn config(&self) -> &ProjectConfig {
		self.ctx.config()
	}

	/// Sender for this widget's messages.
	pub fn bus(&self) -> &WidgetBus<D::Node> {
		&self.bus
	}

	/// The controller, once a form is bound.
	pub fn controller(&self) -> Option<&SubmissionController<D::Node>> {
		self.controller.get()
	}

	/// Whether a form is bound.
	pub fn is_bound(&self) -> bool {
		self.controller.get().is_some()
	}

	/// Whether the insertion observer is still live.
	pub fn is_watching(&self) -> bool {
		self.watcher.borrow().is_observing()
	}

	/// Arms both binding triggers: the insertion observer and the ready hook.
	///
	/// An observer that cannot start is logged and skipped. A ready hook that
	/// cannot be registered is returned as an error.
	pub fn arm(&self) -> WidgetResult<()> {
		match self.ctx.dom().observe_insertions(self.bus.clone()) {
			Ok(observer) => {
				if let Some(stale) = self.watcher.borrow_mut().arm(observer) {
					self.ctx.dom().disconnect(stale);
				}
			}
			Err(err) => {
				tracing::warn!(target: "shipwait", "[Shipwait] insertion observer unavailable: {err}");
			}
		}
		self.ctx.dom().on_ready(self.bus.clone())
	}

	/// Binds the form around `input`. A no-op when this widget is already bound.
	pub fn bind(&self, input: D::Node) -> Result<(), BindingError> {
		if self.is_bound() {
			return Ok(());
		}
		let dom = self.ctx.dom();
		let binding = ElementLocator::new(dom).locate(input)?;
		dom.listen_submit(&binding.form, self.bus.clone())
			.map_err(|err| BindingError::Listener(err.to_string()))?;
		dom.set_attribute(&binding.form, BOUND_MARKER, &self.config().project_id);

		tracing::debug!(
			target: "shipwait",
			project_id = %self.config().project_id,
			"[Shipwait] form bound"
		);
		if self.controller.set(SubmissionController::new(binding)).is_err() {
			return Ok(());
		}
		self.stop_watching();
		Ok(())
	}

	/// Handles one message. Returns the cycle result for `Submit`.
	pub async fn handle(&self, message: WidgetMessage<D::Node>) -> Option<SubmissionResult> {
		match message {
			WidgetMessage::DomReady => {
				self.on_dom_ready();
				None
			}
			WidgetMessage::NodesInserted(nodes) => {
				self.on_nodes_inserted(nodes);
				None
			}
			WidgetMessage::Submit => match self.controller.get() {
				Some(controller) => Some(controller.submit(&self.ctx).await),
				None => {
					tracing::debug!(target: "shipwait", "[Shipwait] submit before binding ignored");
					None
				}
			},
		}
	}

	/// Consumes messages until every sender is gone.
	pub async fn run(&self) {
		let Some(mut receiver) = self.receiver.borrow_mut().take() else {
			tracing::warn!(target: "shipwait", "[Shipwait] widget loop already running");
			return;
		};
		while let Some(message) = receiver.next().await {
			self.handle(message).await;
		}
	}

	/// Handles every message already queued, without waiting for more.
	/// Returns how many were handled.
	pub async fn pump(&self) -> usize {
		let Some(mut receiver) = self.receiver.borrow_mut().take() else {
			return 0;
		};
		let mut handled = 0;
		while let Ok(Some(message)) = receiver.try_next() {
			self.handle(message).await;
			handled += 1;
		}
		*self.receiver.borrow_mut() = Some(receiver);
		handled
	}

	fn on_dom_ready(&self) {
		if self.is_bound() {
			return;
		}
		let Some(input) = ElementLocator::new(self.ctx.dom()).find_input() else {
			tracing::debug!(target: "shipwait", "[Shipwait] no unclaimed input[data-shipwait] on the page yet");
			return;
		};
		if let Err(err) = self.bind(input) {
			tracing::warn!(target: "shipwait", "[Shipwait] binding failed: {err}");
		}
	}

	fn on_nodes_inserted(&self, nodes: Vec<D::Node>) {
		if self.is_bound() || self.watcher.borrow().is_finished() {
			return;
		}
		let locator = ElementLocator::new(self.ctx.dom());
		let Some(input) = nodes.iter().find_map(|node| locator.find_in_inserted(node)) else {
			return;
		};
		if let Err(err) = self.bind(input) {
			tracing::warn!(target: "shipwait", "[Shipwait] binding inserted input failed: {err}");
		}
		self.stop_watching();
	}

	fn stop_watching(&self) {
		let observer = self.watcher.borrow_mut().stop();
		if let Some(observer) = observer {
			self.ctx.dom().disconnect(observer);
		}
	}
}
