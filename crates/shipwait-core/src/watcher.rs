//! One-shot insertion watch.
//!
//! Covers pages where the widget script runs before the form is rendered.
//! The watch ends for good once anything binds, or after the first inserted
//! marked input whether or not binding it succeeded.

/// State of a widget's insertion observer.
#[derive(Debug)]
pub struct DomWatcher<O> {
	observer: Option<O>,
	finished: bool,
}

impl<O> Default for DomWatcher<O> {
	fn default() -> Self {
		Self {
			observer: None,
			finished: false,
		}
	}
}

impl<O> DomWatcher<O> {
	/// Creates an idle watcher.
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores the active observer.
	///
	/// Returns the observer back when the watch already ended, so the caller
	/// can disconnect it.
	pub fn arm(&mut self, observer: O) -> Option<O> {
		if self.finished {
			return Some(observer);
		}
		self.observer.replace(observer)
	}

	/// Whether an observer is live.
	pub fn is_observing(&self) -> bool {
		self.observer.is_some()
	}

	/// Whether the watch ended.
	pub fn is_finished(&self) -> bool {
		self.finished
	}

	/// Ends the watch, handing back the observer to disconnect.
	pub fn stop(&mut self) -> Option<O> {
		self.finished = true;
		self.observer.take()
	}
}
