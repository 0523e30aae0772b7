//! # Shipwait
//!
//! An embeddable waitlist widget. A page adds one script tag and marks an
//! email input; the widget posts each address as a lead for the project and
//! then applies whatever follow-up the project declares: a redirect, a
//! thank-you message, or nothing.
//!
//! ## Crates
//!
//! - [`core`]: configuration, element discovery, the submission state
//!   machine and the `shipwait:*` events, written against host seams
//! - `snippet` (`wasm32` only): the browser implementation of those seams
//!   and the module entry point
//!
//! ## Embedding
//!
//! ```html
//! <form>
//!   <input type="email" data-shipwait>
//!   <button type="submit">Join</button>
//!   <p data-shipwait-message></p>
//! </form>
//! <script type="module" src="https://cdn.example.com/waitly-snippet.umd.js?id=abc123"></script>
//! ```
//!
//! ## Listening to events
//!
//! ```js
//! window.addEventListener("shipwait:success", (e) => console.log(e.detail.email));
//! ```
//!
//! ## Feature Flags
//!
//! - `testing` - in-memory page, transport and event sink
//! - `console_error_panic_hook` - readable panics in the browser console

pub use shipwait_core as core;

#[cfg(target_arch = "wasm32")]
pub use shipwait_snippet as snippet;

/// Commonly used types.
pub mod prelude {
	pub use shipwait_core::{
		BehaviorType, ConfigError, EventSink, ProjectConfig, ScriptTag, SubmissionBehavior,
		SubmissionError, SubmissionState, Widget, WidgetDom, WidgetError, WidgetEvent,
	};

	#[cfg(target_arch = "wasm32")]
	pub use shipwait_snippet::{GlooTransport, WebDom, WindowEventSink};
}
