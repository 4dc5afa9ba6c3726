//! Terminal-backed output regions.
//!
//! Request workers write through a [`TermRegion`]; the draw loop holds the
//! matching [`View`] and picks up whatever was written last on every frame.

use std::sync::Mutex;

use sintaxis::region::Content;
use sintaxis::Region;

/// The writing half of a terminal region.
pub struct TermRegion(Mutex<single_value_channel::Updater<Content>>);

/// The reading half of a terminal region.
pub struct View(single_value_channel::Receiver<Content>);

/// Creates a new, empty region.
pub fn region() -> (TermRegion, View) {
  let (rx, tx) = single_value_channel::channel_starting_with(Content::Empty);
  (TermRegion(Mutex::new(tx)), View(rx))
}

impl Region for TermRegion {
  fn show(&self, content: Content) {
    if let Ok(tx) = self.0.lock() {
      // The view only goes away when the UI is shutting down.
      let _ = tx.update(content);
    }
  }
}

impl View {
  /// Returns the most recent contents of the region.
  pub fn latest(&mut self) -> &Content {
    self.0.latest()
  }
}
