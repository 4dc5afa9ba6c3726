//! The analysis page.
//!
//! The page is a sentence field on top, with the breakdown and the tree
//! side by side underneath. The field grows as the sentence gets longer.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;

use sintaxis::region::Content;

use tui::backend::Backend;
use tui::layout::Constraint;
use tui::layout::Direction;
use tui::layout::Layout;
use tui::layout::Rect;
use tui::style::Color;
use tui::style::Modifier;
use tui::style::Style;
use tui::text::Span;
use tui::text::Spans;
use tui::widgets::Block;
use tui::widgets::Borders;
use tui::widgets::Paragraph;
use tui::widgets::Wrap;
use tui::Frame;

use crate::util;

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Something the page wants done after a key press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
  /// Analyze this sentence.
  Submit(String),
  /// Leave the program.
  Quit,
}

/// The page's own state: the sentence being edited.
#[derive(Clone, Debug, Default)]
pub struct Ui {
  input: String,

  // NOTE: Always a char boundary of `input`.
  cursor: usize,
}

impl Ui {
  /// Creates a page with an empty sentence field.
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns the current contents of the sentence field.
  #[cfg(test)]
  pub fn input(&self) -> &str {
    &self.input
  }

  /// Processes a key press.
  ///
  /// Enter submits the field as-is; the field keeps its contents afterwards.
  pub fn process_key(&mut self, k: KeyEvent) -> Option<Action> {
    let m = k.modifiers;
    match k.code {
      KeyCode::Char('c') if m.contains(KeyModifiers::CONTROL) => {
        return Some(Action::Quit)
      }
      KeyCode::Esc => return Some(Action::Quit),
      KeyCode::Enter => return Some(Action::Submit(self.input.clone())),

      KeyCode::Char(c) => {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
      }
      KeyCode::Backspace => {
        if let Some(c) = self.input[..self.cursor].chars().next_back() {
          self.cursor -= c.len_utf8();
          self.input.remove(self.cursor);
        }
      }
      KeyCode::Delete => {
        if self.cursor < self.input.len() {
          self.input.remove(self.cursor);
        }
      }
      KeyCode::Left => {
        if let Some(c) = self.input[..self.cursor].chars().next_back() {
          self.cursor -= c.len_utf8();
        }
      }
      KeyCode::Right => {
        if let Some(c) = self.input[self.cursor..].chars().next() {
          self.cursor += c.len_utf8();
        }
      }
      KeyCode::Home => self.cursor = 0,
      KeyCode::End => self.cursor = self.input.len(),
      _ => {}
    }
    None
  }

  /// Renders the page onto a frame.
  ///
  /// `busy` is the current frame number while any request is in flight, and
  /// drives a spinner.
  pub fn render<B: Backend>(
    &self,
    f: &mut Frame<'_, B>,
    breakdown: &Content,
    tree: &Content,
    busy: Option<usize>,
  ) {
    let area = f.size();
    let rows = Layout::default()
      .direction(Direction::Vertical)
      .constraints(
        [
          Constraint::Length(util::input_height(&self.input, area.width)),
          Constraint::Min(0),
        ]
        .as_ref(),
      )
      .split(area);
    let panes = Layout::default()
      .direction(Direction::Horizontal)
      .constraints(
        [Constraint::Percentage(40), Constraint::Percentage(60)].as_ref(),
      )
      .split(rows[1]);

    self.render_input(f, rows[0]);

    let spinner = busy.map(|n| SPINNER[n % SPINNER.len()]).unwrap_or("");
    f.render_widget(
      region_widget(format!("Breakdown {}", spinner), breakdown),
      panes[0],
    );
    f.render_widget(region_widget(format!("Tree {}", spinner), tree), panes[1]);
  }

  fn render_input<B: Backend>(&self, f: &mut Frame<'_, B>, rect: Rect) {
    let block = Block::default()
      .borders(Borders::ALL)
      .title(Span::styled(
        "Sentence (Enter to analyze, Esc to quit)",
        Style::default().add_modifier(Modifier::BOLD),
      ));
    let inner = block.inner(rect);
    let rows = util::hard_wrap(&self.input, inner.width)
      .into_iter()
      .map(Spans::from)
      .collect::<Vec<_>>();
    f.render_widget(Paragraph::new(rows).block(block), rect);

    let (dx, dy) = util::cursor_offset(&self.input[..self.cursor], inner.width);
    if dy < inner.height {
      f.set_cursor(inner.x + dx, inner.y + dy);
    }
  }
}

/// Builds the widget for one output region.
///
/// Markup is shown verbatim; a terminal has no way of drawing it.
fn region_widget(title: String, content: &Content) -> Paragraph<'_> {
  let (body, style) = match content {
    Content::Empty => ("", Style::default()),
    Content::Text(s) => (s.as_str(), Style::default()),
    Content::Markup(s) => (s.as_str(), Style::default().fg(Color::Cyan)),
  };

  Paragraph::new(body)
    .style(style)
    .block(Block::default().borders(Borders::ALL).title(title))
    .wrap(Wrap { trim: false })
}
