//! Shipwait Snippet - browser build of the waitlist widget
//!
//! Implements the host seams of [`shipwait_core`] on top of `web-sys` and
//! `gloo-net` and boots the widgets when the module is instantiated.
//!
//! - [`dom`]: `WidgetDom` over the live document (`MutationObserver`, `submit`, `DOMContentLoaded`)
//! - [`http`]: `HttpTransport` over `fetch`
//! - [`events`]: `shipwait:*` events as `CustomEvent`s on `window`
//! - [`boot`]: `#[wasm_bindgen(start)]` entry point
//!
//! The API base URL is fixed at build time:
//!
//! ```text
//! SHIPWAIT_API_BASE_URL=https://api.shipwait.dev wasm-pack build crates/shipwait-snippet --target web
//! ```
//!
//! Outside `wasm32` this crate is empty.

#![warn(missing_docs)]

#[cfg(target_arch = "wasm32")]
pub mod boot;
#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod events;
#[cfg(target_arch = "wasm32")]
pub mod http;

#[cfg(target_arch = "wasm32")]
pub use boot::{WebWidget, boot};
#[cfg(target_arch = "wasm32")]
pub use dom::WebDom;
#[cfg(target_arch = "wasm32")]
pub use events::WindowEventSink;
#[cfg(target_arch = "wasm32")]
pub use http::GlooTransport;
