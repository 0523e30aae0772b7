//! Submission state machine.
//!
//! ```text
//! Idle ──► Validating ──► Submitting ──► Applying ──► Idle
//!              │               │
//!              └──► Idle       └──► Idle   (validation / server / network failure)
//! ```
//!
//! The loading UI is held by a [`LoadingGuard`] for exactly the `Submitting`
//! and `Applying` phases and is restored on every exit path except a
//! successful redirect that leaves the document.

use std::cell::Cell;

use crate::api::LeadRequest;
use crate::behavior::{BehaviorType, SubmissionBehavior};
use crate::dom::WidgetDom;
use crate::error::SubmissionError;
use crate::events::{EventSink, WidgetEvent};
use crate::http::HttpTransport;
use crate::locator::FormBinding;
use crate::widget::WidgetContext;

/// Reason carried on the error event of an empty submission.
pub const EMAIL_REQUIRED: &str = "Email required";

/// Phase of the current submission cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
	/// Waiting for a submit.
	#[default]
	Idle,
	/// Reading and checking the input.
	Validating,
	/// Lead and behavior requests are in flight.
	Submitting,
	/// The lead was accepted and the behavior is being applied.
	Applying,
}

/// Result of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
	/// Trimmed email that was posted.
	pub email: String,
	/// Behavior that was applied.
	pub behavior: SubmissionBehavior,
}

/// Outcome of one submission cycle.
pub type SubmissionResult = Result<SubmissionOutcome, SubmissionError>;

/// Drives submissions for one bound form.
#[derive(Debug)]
pub struct SubmissionController<N> {
	binding: FormBinding<N>,
	state: Cell<SubmissionState>,
}

impl<N: Clone> SubmissionController<N> {
	/// Creates an idle controller over a resolved binding.
	pub fn new(binding: FormBinding<N>) -> Self {
		Self {
			binding,
			state: Cell::new(SubmissionState::Idle),
		}
	}

	/// Elements this controller is wired to.
	pub fn binding(&self) -> &FormBinding<N> {
		&self.binding
	}

	/// Current phase.
	pub fn state(&self) -> SubmissionState {
		self.state.get()
	}

	/// Runs one submission cycle.
	///
	/// Failures are shown to the visitor and published as events before
	/// being returned, so callers only need the result for diagnostics.
	pub async fn submit<D, T, E>(&self, ctx: &WidgetContext<D, T, E>) -> SubmissionResult
	where
		D: WidgetDom<Node = N>,
		T: HttpTransport,
		E: EventSink,
	{
		if self.state() != SubmissionState::Idle {
			tracing::warn!(
				target: "shipwait",
				state = ?self.state(),
				"[Shipwait] submit received while a submission is in flight"
			);
		}

		self.state.set(SubmissionState::Validating);
		let email = ctx.dom().value(&self.binding.input).trim().to_string();
		ctx.emit(&WidgetEvent::Submit {
			email: email.clone(),
		});

		if email.is_empty() {
			let err = SubmissionError::validation(EMAIL_REQUIRED);
			report(ctx, &self.binding, &err);
			self.state.set(SubmissionState::Idle);
			return Err(err);
		}

		self.state.set(SubmissionState::Submitting);
		let mut guard = LoadingGuard::acquire(ctx, &self.binding);
		let result = self.exchange(ctx, &email, &mut guard).await;
		if let Err(err) = &result {
			report(ctx, &self.binding, err);
		}
		drop(guard);

		self.state.set(SubmissionState::Idle);
		result
	}

	async fn exchange<D, T, E>(
		&self,
		ctx: &WidgetContext<D, T, E>,
		email: &str,
		guard: &mut LoadingGuard<'_, D, T, E>,
	) -> SubmissionResult
	where
		D: WidgetDom<Node = N>,
		T: HttpTransport,
		E: EventSink,
	{
		let lead = LeadRequest {
			email,
			project_id: &ctx.config().project_id,
		};
		let (behavior, posted) =
			futures::join!(ctx.resolve_behavior(), ctx.api().submit_lead(&lead));
		posted?;

		self.state.set(SubmissionState::Applying);
		let behavior = behavior.unwrap_or_else(|| {
			tracing::debug!(target: "shipwait", "[Shipwait] no submission behavior, using do_nothing");
			SubmissionBehavior::do_nothing()
		});
		tracing::info!(
			target: "shipwait",
			project_id = %ctx.config().project_id,
			behavior = %behavior.behavior_type,
			"[Shipwait] lead accepted"
		);
		ctx.emit(&WidgetEvent::Success {
			email: email.to_string(),
			behavior_type: behavior.behavior_type,
			payload: behavior.payload.clone(),
		});

		let dom = ctx.dom();
		match (behavior.behavior_type, behavior.payload()) {
			(BehaviorType::Redirect, Some(url)) => {
				ctx.emit(&WidgetEvent::Redirect {
					url: url.to_string(),
				});
				dom.navigate(url)
					.map_err(|err| SubmissionError::navigation(err.to_string()))?;
				// A fragment-only target keeps the current document alive.
				if !url.starts_with('#') {
					guard.disarm();
				}
			}
			(BehaviorType::ShowMessage, Some(text)) => {
				show_message(ctx, &self.binding, text);
				dom.set_value(&self.binding.input, "");
			}
			_ => dom.set_value(&self.binding.input, ""),
		}

		Ok(SubmissionOutcome {
			email: email.to_string(),
			behavior,
		})
	}
}

/// Scoped loading UI.
///
/// Acquiring disables the input and the submit button, appends `...` to the
/// button label and emits `loading: true`. Dropping reverts all of it and
/// emits `loading: false`, unless the guard was disarmed.
pub struct LoadingGuard<'a, D: WidgetDom, T, E: EventSink> {
	ctx: &'a WidgetContext<D, T, E>,
	binding: &'a FormBinding<D::Node>,
	armed: bool,
}

impl<'a, D: WidgetDom, T, E: EventSink> LoadingGuard<'a, D, T, E> {
	/// Enters the loading state.
	pub fn acquire(ctx: &'a WidgetContext<D, T, E>, binding: &'a FormBinding<D::Node>) -> Self {
		let dom = ctx.dom();
		dom.set_disabled(&binding.input, true);
		if let Some(button) = &binding.submit_button {
			dom.set_disabled(button, true);
			dom.set_text(button, &format!("{}...", binding.button_label));
		}
		ctx.emit(&WidgetEvent::Loading { loading: true });
		Self {
			ctx,
			binding,
			armed: true,
		}
	}

	/// Leaves the UI as it is on drop. Used once navigation is under way.
	pub fn disarm(&mut self) {
		self.armed = false;
	}
}

impl<D: WidgetDom, T, E: EventSink> Drop for LoadingGuard<'_, D, T, E> {
	fn drop(&mut self) {
		if !self.armed {
			return;
		}
		let dom = self.ctx.dom();
		dom.set_disabled(&self.binding.input, false);
		if let Some(button) = &self.binding.submit_button {
			dom.set_disabled(button, false);
			dom.set_text(button, &self.binding.button_label);
		}
		self.ctx.emit(&WidgetEvent::Loading { loading: false });
	}
}

/// Shows `text` in the message element, falling back to a native alert.
pub fn show_message<D, T, E>(ctx: &WidgetContext<D, T, E>, binding: &FormBinding<D::Node>, text: &str)
where
	D: WidgetDom,
	E: EventSink,
{
	match &binding.message_element {
		Some(element) => ctx.dom().set_text(element, text),
		None => ctx.dom().alert(text),
	}
	ctx.emit(&WidgetEvent::Message {
		message: text.to_string(),
	});
}

fn report<D, T, E>(ctx: &WidgetContext<D, T, E>, binding: &FormBinding<D::Node>, err: &SubmissionError)
where
	D: WidgetDom,
	E: EventSink,
{
	if !matches!(err, SubmissionError::Validation { .. }) {
		tracing::warn!(target: "shipwait", kind = err.kind(), "[Shipwait] submission failed: {err}");
	}
	show_message(ctx, binding, &err.user_message());
	ctx.emit(&WidgetEvent::Error {
		error: err.kind(),
		message: err.event_message(),
	});
}
