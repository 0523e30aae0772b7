//! Dispatches widget events as `CustomEvent`s on `window`.

use shipwait_core::events::{EventSink, WidgetEvent};
use wasm_bindgen::JsValue;
use web_sys::{CustomEvent, CustomEventInit, Window};

/// Event sink targeting the global window.
#[derive(Debug, Clone)]
pub struct WindowEventSink {
	window: Window,
}

impl WindowEventSink {
	/// Creates a sink dispatching on `window`.
	pub fn new(window: Window) -> Self {
		Self { window }
	}

	fn dispatch(&self, name: &str, detail: &serde_json::Value) -> Result<(), JsValue> {
		let detail = js_sys::JSON::parse(&detail.to_string())?;
		let init = CustomEventInit::new();
		init.set_detail(&detail);
		let event = CustomEvent::new_with_event_init_dict(name, &init)?;
		self.window.dispatch_event(&event)?;
		Ok(())
	}
}

impl EventSink for WindowEventSink {
	fn emit(&self, project_id: &str, event: &WidgetEvent) {
		let name = event.name();
		if let Err(err) = self.dispatch(&name, &event.detail(project_id)) {
			tracing::debug!(
				target: "shipwait",
				"[Shipwait] failed to dispatch {name}: {}",
				crate::dom::js_error(err)
			);
		}
	}
}
