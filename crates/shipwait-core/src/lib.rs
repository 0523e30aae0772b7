//! Shipwait Core - platform-agnostic waitlist widget
//!
//! Everything the embeddable waitlist snippet does, written against small
//! host seams so it runs the same in the browser and in native tests.
//!
//! ## Architecture
//!
//! - [`config`]: project id, API base URL and inline behavior from the script tag
//! - [`query`]: marker attributes and typed element queries
//! - [`locator`]: marked input, enclosing form, message element, submit button
//! - [`watcher`]: one-shot observation of late-rendered forms
//! - [`behavior`] / [`api`]: submission behavior lookup and lead posting
//! - [`controller`]: the per-form submission state machine
//! - [`events`]: `shipwait:*` lifecycle events
//! - [`dom`] / [`http`]: host seams and the inbound message bus
//! - [`widget`]: one instance tying the above together
//!
//! ## Example
//!
//! ```ignore
//! use shipwait_core::{ProjectConfig, ScriptTag, Widget};
//!
//! let config = ProjectConfig::resolve(&script, shipwait_core::build_time_api_base_url())?;
//! let widget = Rc::new(Widget::new(config, dom, transport, events));
//! widget.arm()?;
//! spawn_local(async move { widget.run().await });
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod behavior;
pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod events;
pub mod http;
pub mod locator;
pub mod query;
pub mod watcher;
pub mod widget;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use api::{ApiClient, LeadRequest};
pub use behavior::{BehaviorType, SubmissionBehavior, parse_behavior_body};
pub use config::{ProjectConfig, ScriptTag, build_time_api_base_url, select_widget_scripts};
pub use controller::{SubmissionController, SubmissionOutcome, SubmissionResult, SubmissionState};
pub use dom::{WidgetBus, WidgetDom, WidgetMessage, WidgetReceiver};
pub use error::{BindingError, ConfigError, SubmissionError, WidgetError, WidgetResult};
pub use events::{EventSink, WidgetEvent};
pub use http::{HttpResponse, HttpTransport, TransportError};
pub use locator::{ElementLocator, FormBinding};
pub use query::ElementQuery;
pub use widget::{Widget, WidgetContext};
