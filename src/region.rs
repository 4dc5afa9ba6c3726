//! Output regions.
//!
//! A [`Region`] is a named place on the page that the orchestrator writes
//! into. Regions are handed to the [`Orchestrator`] explicitly rather than
//! looked up, so a page, a terminal or a test can all stand behind one.
//!
//! Writes always replace the whole region; nothing is ever read back.
//! Markup is stored verbatim. The service is trusted to produce markup that
//! is safe to show, and nothing here sanitizes it.

use std::sync::Arc;
use std::sync::Mutex;

#[cfg(doc)]
use crate::orchestrator::Orchestrator;

/// What a [`Region`] currently shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Content {
  /// Nothing.
  Empty,
  /// Plain text, to be shown as-is.
  Text(String),
  /// A markup fragment, to be injected as-is.
  Markup(String),
}

impl Content {
  /// Returns the text or markup held by `self`, if any.
  pub fn as_str(&self) -> Option<&str> {
    match self {
      Content::Empty => None,
      Content::Text(s) | Content::Markup(s) => Some(s.as_str()),
    }
  }
}

impl Default for Content {
  fn default() -> Self {
    Content::Empty
  }
}

/// A display region that can be written from any thread.
pub trait Region: Send + Sync {
  /// Replaces the contents of this region.
  fn show(&self, content: Content);

  /// Shows `text` as plain text.
  fn set_text(&self, text: &str) {
    self.show(Content::Text(text.to_string()))
  }

  /// Injects `markup` verbatim.
  fn set_markup(&self, markup: &str) {
    self.show(Content::Markup(markup.to_string()))
  }

  /// Empties this region.
  fn clear(&self) {
    self.show(Content::Empty)
  }
}

impl<R: Region + ?Sized> Region for Arc<R> {
  fn show(&self, content: Content) {
    (**self).show(content)
  }
}

/// An in-memory [`Region`].
///
/// Clones share the same contents, so one clone can be handed to an
/// [`Orchestrator`] while another is used to inspect what was written.
#[derive(Clone, Debug, Default)]
pub struct Slot(Arc<Mutex<Content>>);

impl Slot {
  /// Creates a new, empty [`Slot`].
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns a copy of the last thing written to this slot.
  pub fn content(&self) -> Content {
    match self.0.lock() {
      Ok(c) => c.clone(),
      Err(poisoned) => poisoned.into_inner().clone(),
    }
  }
}

impl Region for Slot {
  fn show(&self, content: Content) {
    match self.0.lock() {
      Ok(mut c) => *c = content,
      Err(poisoned) => *poisoned.into_inner() = content,
    }
  }
}
