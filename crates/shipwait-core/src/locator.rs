//! Finds the marked input and the elements around it.

use crate::dom::WidgetDom;
use crate::error::BindingError;
use crate::query::{BOUND_MARKER, FORM, MARKED_INPUT, MESSAGE_ELEMENT, SUBMIT_BUTTON};

/// Label used when the submit button has no text.
pub const DEFAULT_BUTTON_LABEL: &str = "Submit";

/// Elements a widget instance is wired to. Resolved once at binding time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormBinding<N> {
	/// The marked email input.
	pub input: N,
	/// Its enclosing form.
	pub form: N,
	/// Where status text goes. `None` means native alerts.
	pub message_element: Option<N>,
	/// Submit button whose label shows the loading state.
	pub submit_button: Option<N>,
	/// Button text captured at binding time.
	pub button_label: String,
}

/// Element discovery over a [`WidgetDom`].
pub struct ElementLocator<'a, D> {
	dom: &'a D,
}

impl<'a, D: WidgetDom> ElementLocator<'a, D> {
	/// Creates a locator.
	pub fn new(dom: &'a D) -> Self {
		Self { dom }
	}

	/// First marked input in the document whose form no widget has bound.
	pub fn find_input(&self) -> Option<D::Node> {
		self.dom
			.query_all(None, &MARKED_INPUT)
			.into_iter()
			.find(|input| self.is_unclaimed(input))
	}

	/// First unclaimed marked input within a freshly inserted node: the node
	/// itself or one of its descendants.
	pub fn find_in_inserted(&self, node: &D::Node) -> Option<D::Node> {
		if self.dom.matches(node, &MARKED_INPUT) {
			return self.is_unclaimed(node).then(|| node.clone());
		}
		self.dom
			.query_all(Some(node), &MARKED_INPUT)
			.into_iter()
			.find(|input| self.is_unclaimed(input))
	}

	/// Whether no widget has bound the form around `input`. Inputs outside
	/// any form count as unclaimed so binding can report them.
	fn is_unclaimed(&self, input: &D::Node) -> bool {
		self.dom
			.closest(input, &FORM)
			.is_none_or(|form| self.dom.attribute(&form, BOUND_MARKER).is_none())
	}

	/// Resolves the binding for `input`.
	///
	/// The message element is looked up inside the form first and then
	/// anywhere in the document. The submit button must be inside the form.
	pub fn locate(&self, input: D::Node) -> Result<FormBinding<D::Node>, BindingError> {
		let form = self.dom.closest(&input, &FORM).ok_or(BindingError::MissingForm)?;
		if self.dom.attribute(&form, BOUND_MARKER).is_some() {
			return Err(BindingError::AlreadyBound);
		}

		let message_element = self
			.dom
			.query(Some(&form), &MESSAGE_ELEMENT)
			.or_else(|| self.dom.query(None, &MESSAGE_ELEMENT));
		let submit_button = self.dom.query(Some(&form), &SUBMIT_BUTTON);
		let button_label = submit_button
			.as_ref()
			.and_then(|button| self.dom.text(button))
			.filter(|label| !label.trim().is_empty())
			.unwrap_or_else(|| DEFAULT_BUTTON_LABEL.to_string());

		Ok(FormBinding {
			input,
			form,
			message_element,
			submit_button,
			button_label,
		})
	}
}
