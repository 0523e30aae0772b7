//! Module entry point.
//!
//! Runs once when the bundle is instantiated. Every script tag that
//! configures a project gets its own [`Widget`]; a page with none is left
//! untouched.

use std::rc::Rc;

use shipwait_core::config::{ProjectConfig, build_time_api_base_url, select_widget_scripts};
use shipwait_core::error::{ConfigError, WidgetResult};
use shipwait_core::widget::Widget;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::dom::WebDom;
use crate::events::WindowEventSink;
use crate::http::GlooTransport;

/// Browser widget.
pub type WebWidget = Widget<WebDom, GlooTransport, WindowEventSink>;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn start() {
	install_diagnostics();

	match boot() {
		Ok(started) => {
			tracing::debug!(target: "shipwait", "[Shipwait] {started} widget(s) started");
		}
		Err(err) => {
			tracing::warn!(target: "shipwait", "[Shipwait] not started: {err}");
		}
	}
}

fn install_diagnostics() {
	#[cfg(feature = "console_error_panic_hook")]
	console_error_panic_hook::set_once();

	// Another bundle on the page may own the global subscriber already.
	let _ = tracing_wasm::try_set_as_global_default();
}

/// Starts one widget per configured script tag. Returns how many started.
pub fn boot() -> WidgetResult<usize> {
	let dom = WebDom::new()?;
	let scripts = select_widget_scripts(dom.current_script(), dom.scripts());
	if scripts.is_empty() {
		return Err(ConfigError::ScriptNotFound.into());
	}

	let mut started = 0;
	for script in &scripts {
		// Already logged by `resolve`.
		let Ok(config) = ProjectConfig::resolve(script, build_time_api_base_url()) else {
			continue;
		};
		let sink = WindowEventSink::new(dom.window().clone());
		let widget = Rc::new(WebWidget::new(config, dom.clone(), GlooTransport, sink));
		if let Err(err) = widget.arm() {
			tracing::warn!(target: "shipwait", "[Shipwait] failed to arm widget: {err}");
			continue;
		}
		spawn_local(async move { widget.run().await });
		started += 1;
	}
	Ok(started)
}
