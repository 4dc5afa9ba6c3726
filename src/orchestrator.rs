//! Request orchestration.
//!
//! The [`Orchestrator`] ties a submitted sentence to one request against the
//! analysis service and renders the answer into two [`Region`]s: one for the
//! plain-text breakdown and one for the tree markup.
//!
//! Each submission runs on its own worker thread and cannot be cancelled.
//! There is no in-flight guard: if a second sentence is submitted while the
//! first is outstanding, both requests run, and whichever finishes last owns
//! both regions afterwards. Completions are rendered one at a time, so the
//! two regions always come from the same answer.

use std::panic;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::thread::JoinHandle;

use log::debug;
use log::warn;

use crate::api;
use crate::api::Generate;
use crate::messages::Messages;
use crate::region::Region;

/// Coordinates analysis requests and their rendering.
pub struct Orchestrator<G> {
  transport: Arc<G>,
  breakdown: Arc<dyn Region>,
  tree: Arc<dyn Region>,
  messages: Arc<Messages>,

  // Serializes writes to the pair of regions.
  render_lock: Arc<Mutex<()>>,
  next_id: AtomicU64,
}

/// The result of [`Orchestrator::submit()`].
pub enum Submission {
  /// The sentence was blank; the user was prompted and no request was made.
  Aborted,
  /// A request is in flight.
  Pending(Pending),
}

impl Submission {
  /// Returns true if no request was made.
  pub fn is_aborted(&self) -> bool {
    matches!(self, Submission::Aborted)
  }

  /// Blocks until the request, if any, has been rendered.
  pub fn wait(self) -> Option<Outcome> {
    match self {
      Submission::Aborted => None,
      Submission::Pending(p) => Some(p.wait()),
    }
  }
}

/// A request that has been issued but possibly not yet rendered.
///
/// Dropping this does not cancel the request.
pub struct Pending {
  id: u64,
  handle: JoinHandle<Outcome>,
}

impl Pending {
  /// Returns the sequence number of this request, for correlating logs.
  pub fn id(&self) -> u64 {
    self.id
  }

  /// Returns true once this request's result has been rendered, so that
  /// [`Pending::wait()`] would not block.
  pub fn is_finished(&self) -> bool {
    self.handle.is_finished()
  }

  /// Blocks until this request's answer (or failure) has been rendered.
  pub fn wait(self) -> Outcome {
    self
      .handle
      .join()
      .unwrap_or(Outcome::Failed(Failure::Lost))
  }
}

/// What a single request ended up rendering.
#[derive(Debug)]
pub enum Outcome {
  /// The breakdown and tree were rendered.
  Rendered,
  /// The error messages were rendered.
  Failed(Failure),
}

impl Outcome {
  /// Returns true if the service's answer was rendered.
  pub fn is_rendered(&self) -> bool {
    matches!(self, Outcome::Rendered)
  }
}

/// Why a request rendered the error messages.
#[derive(Debug, thiserror::Error)]
pub enum Failure {
  /// The request itself failed, or the body could not be decoded.
  #[error(transparent)]
  Transport(#[from] api::Error),
  /// The service answered, but without a breakdown or without a tree.
  #[error("response is missing a breakdown or a tree")]
  Incomplete,
  /// The transport (or the worker thread) panicked.
  #[error("request worker panicked")]
  Lost,
}

impl<G: Generate> Orchestrator<G> {
  /// Creates a new [`Orchestrator`] that renders into `breakdown` and `tree`
  /// using the default [`Messages`].
  pub fn new(
    transport: G,
    breakdown: impl Region + 'static,
    tree: impl Region + 'static,
  ) -> Self {
    Self {
      transport: Arc::new(transport),
      breakdown: Arc::new(breakdown),
      tree: Arc::new(tree),
      messages: Arc::new(Messages::default()),
      render_lock: Default::default(),
      next_id: AtomicU64::new(0),
    }
  }

  /// Replaces the messages shown to the user.
  pub fn with_messages(mut self, messages: Messages) -> Self {
    self.messages = Arc::new(messages);
    self
  }

  /// Submits `sentence` for analysis.
  ///
  /// A blank sentence prompts the user and makes no request. Otherwise both
  /// regions show a placeholder immediately, and exactly one request is
  /// issued on a worker thread with `sentence` sent untrimmed. The regions
  /// are updated again once that request completes, whether it succeeded or
  /// not; no error ever escapes this function.
  pub fn submit(&self, sentence: &str) -> Submission {
    if is_blank(sentence) {
      debug!("blank sentence, not submitting");
      let _guard = self.render_lock.lock();
      self.breakdown.set_text(&self.messages.prompt);
      self.tree.clear();
      return Submission::Aborted;
    }

    let id = self.next_id.fetch_add(1, Ordering::SeqCst);
    debug!("request #{}: submitting {:?}", id, sentence);
    {
      let _guard = self.render_lock.lock();
      self.breakdown.set_text(&self.messages.generating_analysis);
      self.tree.set_markup(&self.messages.generating_tree);
    }

    let transport = Arc::clone(&self.transport);
    let breakdown = Arc::clone(&self.breakdown);
    let tree = Arc::clone(&self.tree);
    let messages = Arc::clone(&self.messages);
    let render_lock = Arc::clone(&self.render_lock);
    let sentence = sentence.to_string();

    let handle = thread::spawn(move || {
      let result =
        panic::catch_unwind(AssertUnwindSafe(|| transport.generate(&sentence)));
      let result = match result {
        Ok(r) => r
          .map_err(Failure::from)
          .and_then(|a| a.complete().ok_or(Failure::Incomplete)),
        Err(_) => Err(Failure::Lost),
      };

      let _guard = render_lock.lock();
      match result {
        Ok((b, t)) => {
          debug!("request #{}: rendering {} bytes of tree", id, t.len());
          breakdown.set_text(&b);
          tree.set_markup(&t);
          Outcome::Rendered
        }
        Err(e) => {
          warn!("request #{}: {}", id, e);
          breakdown.set_text(&messages.analysis_error);
          tree.set_text(&messages.tree_error);
          Outcome::Failed(e)
        }
      }
    });

    Submission::Pending(Pending { id, handle })
  }
}

/// Returns true if `sentence` has nothing but whitespace in it.
///
/// A byte-order mark counts as whitespace here, although `char::is_whitespace`
/// disagrees.
fn is_blank(sentence: &str) -> bool {
  sentence.chars().all(|c| c.is_whitespace() || c == '\u{feff}')
}
