//! Typed element queries and the marker attributes the widget looks for.
//!
//! Each query is defined once and rendered two ways: as a CSS selector for the
//! browser backend, and as a predicate over tag name and attributes for
//! in-memory pages.

use std::fmt;

/// Attribute identifying the email input. Presence is what matters, not the value.
pub const INPUT_MARKER: &str = "data-shipwait";

/// Attribute identifying the optional status/message element.
pub const MESSAGE_MARKER: &str = "data-shipwait-message";

/// Attribute written on a form once a widget has bound it.
pub const BOUND_MARKER: &str = "data-shipwait-bound";

/// Attribute condition of an [`ElementQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeMatch {
	/// The attribute is present, with any value.
	Present(&'static str),
	/// The attribute is present with exactly this value.
	Equals(&'static str, &'static str),
}

impl AttributeMatch {
	/// Attribute name this condition inspects.
	pub fn name(&self) -> &'static str {
		match self {
			Self::Present(name) | Self::Equals(name, _) => name,
		}
	}
}

/// A tag and/or attribute query, equivalent to `tag[attr]` or `tag[attr="value"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementQuery {
	tag: Option<&'static str>,
	attribute: Option<AttributeMatch>,
}

impl ElementQuery {
	/// Matches elements with the given tag name.
	pub const fn tag(tag: &'static str) -> Self {
		Self {
			tag: Some(tag),
			attribute: None,
		}
	}

	/// Matches any element carrying the attribute.
	pub const fn attribute(name: &'static str) -> Self {
		Self {
			tag: None,
			attribute: Some(AttributeMatch::Present(name)),
		}
	}

	/// Adds a presence condition.
	pub const fn with_attribute(self, name: &'static str) -> Self {
		Self {
			tag: self.tag,
			attribute: Some(AttributeMatch::Present(name)),
		}
	}

	/// Adds an exact-value condition.
	pub const fn with_attribute_value(self, name: &'static str, value: &'static str) -> Self {
		Self {
			tag: self.tag,
			attribute: Some(AttributeMatch::Equals(name, value)),
		}
	}

	/// Renders the query as a CSS selector.
	pub fn to_css(&self) -> String {
		let mut css = self.tag.unwrap_or_default().to_string();
		match self.attribute {
			Some(AttributeMatch::Present(name)) => css.push_str(&format!("[{name}]")),
			Some(AttributeMatch::Equals(name, value)) => {
				css.push_str(&format!("[{name}=\"{value}\"]"))
			}
			None => {}
		}
		if css.is_empty() {
			css.push('*');
		}
		css
	}

	/// Evaluates the query against an element described by its tag name and
	/// an attribute lookup. Tag names compare case-insensitively.
	pub fn matches_element<F>(&self, tag: &str, attribute: F) -> bool
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(expected) = self.tag
			&& !expected.eq_ignore_ascii_case(tag)
		{
			return false;
		}
		match self.attribute {
			Some(AttributeMatch::Present(name)) => attribute(name).is_some(),
			Some(AttributeMatch::Equals(name, value)) => attribute(name).as_deref() == Some(value),
			None => true,
		}
	}
}

impl fmt::Display for ElementQuery {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_css())
	}
}

/// `input[data-shipwait]`
pub const MARKED_INPUT: ElementQuery = ElementQuery::tag("input").with_attribute(INPUT_MARKER);

/// `form`
pub const FORM: ElementQuery = ElementQuery::tag("form");

/// `[data-shipwait-message]`
pub const MESSAGE_ELEMENT: ElementQuery = ElementQuery::attribute(MESSAGE_MARKER);

/// `button[type="submit"]`
pub const SUBMIT_BUTTON: ElementQuery =
	ElementQuery::tag("button").with_attribute_value("type", "submit");
