//! Miscellaneous layout helpers.
//!
//! The sentence field is hard-wrapped here rather than by `tui`, so that the
//! box height and the cursor position agree with what is drawn.

use unicode_width::UnicodeWidthChar as _;

/// The smallest height of the input box, borders included.
pub const MIN_INPUT_HEIGHT: u16 = 3;
/// The largest height of the input box, borders included.
pub const MAX_INPUT_HEIGHT: u16 = 10;

/// Splits `text` into rows of at most `width` columns, breaking anywhere.
///
/// A character wider than the space left on a row starts the next one. The
/// result always has at least one row.
pub fn hard_wrap(text: &str, width: u16) -> Vec<&str> {
  let width = width.max(1) as usize;
  let mut rows = Vec::new();
  let mut start = 0;
  let mut used = 0;
  for (i, c) in text.char_indices() {
    let w = c.width().unwrap_or(0);
    if used + w > width && i > start {
      rows.push(&text[start..i]);
      start = i;
      used = 0;
    }
    used += w;
  }
  rows.push(&text[start..]);
  rows
}

/// Returns the column and row at which a cursor placed after `prefix` sits,
/// when wrapping with [`hard_wrap()`] at `width` columns.
pub fn cursor_offset(prefix: &str, width: u16) -> (u16, u16) {
  let rows = hard_wrap(prefix, width);
  let last = rows.len() - 1;
  let used = rows[last].chars().map(|c| c.width().unwrap_or(0)).sum::<usize>();
  if used >= width.max(1) as usize {
    // A full row pushes the cursor onto the next one.
    (0, clamp_u16(last + 1))
  } else {
    (used as u16, clamp_u16(last))
  }
}

/// Returns the height an input box needs in order to show all of `text` and
/// a cursor at its end inside borders, given the box's outer `width`.
///
/// The box grows with its contents, between [`MIN_INPUT_HEIGHT`] and
/// [`MAX_INPUT_HEIGHT`].
pub fn input_height(text: &str, width: u16) -> u16 {
  let inner = width.saturating_sub(2);
  let (_, cursor_row) = cursor_offset(text, inner);
  cursor_row
    .saturating_add(3)
    .clamp(MIN_INPUT_HEIGHT, MAX_INPUT_HEIGHT)
}

fn clamp_u16(n: usize) -> u16 {
  n.min(u16::MAX as usize) as u16
}
