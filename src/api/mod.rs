//! A client for the analysis service.

use std::io;
use std::io::Read;

use reqwest::blocking::Client;
use reqwest::header::CACHE_CONTROL;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

use serde::Deserialize;
use serde::Serialize;

use serde_json::Map;
use serde_json::Value;

/// The base URL used by [`Api::new()`].
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

const JSON_UTF8: &str = "application/json; charset=utf-8";
const NO_CACHE: &str = "no-store, no-cache, must-revalidate";

/// An API client.
///
/// This type is the entrypoint for talking to the analysis service. Every
/// call to [`Api::generate()`] is exactly one `POST /generate`; nothing is
/// cached and nothing is retried.
pub struct Api {
  base_url: String,
  cache_control: bool,
  client: Client,
}

/// Options for constructing an [`Api`].
#[derive(Clone, Debug)]
pub struct Options {
  /// The base URL to point the client at.
  pub base_url: String,
  /// Whether to ask intermediaries not to cache the request.
  pub cache_control: bool,
}

impl Default for Options {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
      cache_control: true,
    }
  }
}

/// An [`Api`] client error.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum Error {
  #[error(transparent)]
  Io(#[from] io::Error),

  #[error(transparent)]
  Http(#[from] reqwest::Error),

  #[error(transparent)]
  Json(#[from] serde_json::Error),

  #[error("server answered {status}{}", .message.as_deref().map(|m| format!(": {}", m)).unwrap_or_default())]
  Status {
    status: StatusCode,
    message: Option<String>,
  },
}

/// The body of a `POST /generate` request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Request<'a> {
  /// The sentence to analyze, exactly as the user typed it.
  pub sentence: &'a str,
}

/// The body of a successful `POST /generate` response.
///
/// Either field may be missing; see [`Analysis::complete()`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
  /// The plain-text part-of-speech breakdown.
  #[serde(default)]
  pub breakdown: Option<String>,
  /// The dependency tree, as a markup fragment.
  #[serde(default)]
  pub tree: Option<String>,
}

impl Analysis {
  /// Returns the breakdown and the tree if both are present and non-empty.
  ///
  /// An empty string counts as missing.
  pub fn complete(self) -> Option<(String, String)> {
    match (self.breakdown, self.tree) {
      (Some(b), Some(t)) if !b.is_empty() && !t.is_empty() => Some((b, t)),
      _ => None,
    }
  }
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

impl Api {
  /// Creates a new [`Api`] pointed at [`DEFAULT_BASE_URL`].
  pub fn new() -> Self {
    Self::with_options(Options::default())
  }

  /// Creates a new [`Api`] with the given options.
  pub fn with_options(opts: Options) -> Self {
    Self {
      base_url: opts.base_url.trim_end_matches('/').to_string(),
      cache_control: opts.cache_control,
      client: Client::new(),
    }
  }

  /// Returns the base URL requests are sent to.
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Asks the service to analyze `sentence`.
  ///
  /// `sentence` is sent verbatim. Any non-2xx status is an error, as is a
  /// body that is not a JSON object or does not decode as an [`Analysis`].
  pub fn generate(&self, sentence: &str) -> Result<Analysis, Error> {
    let url = format!("{}/generate", self.base_url);
    let body = serde_json::to_vec(&Request { sentence })?;

    let mut req = self.client.post(&url).header(CONTENT_TYPE, JSON_UTF8);
    if self.cache_control {
      req = req.header(CACHE_CONTROL, NO_CACHE);
    }

    let mut resp = req.body(body).send()?;
    let status = resp.status();
    let mut buf = Vec::new();
    resp.read_to_end(&mut buf)?;

    if !status.is_success() {
      let message = serde_json::from_slice::<ErrorBody>(&buf)
        .ok()
        .map(|b| b.error);
      return Err(Error::Status { status, message });
    }

    // Decoding straight into `Analysis` would also accept a JSON array,
    // filling the fields by position.
    let body: Map<String, Value> = serde_json::from_reader(&mut &buf[..])?;
    Ok(serde_json::from_value(Value::Object(body))?)
  }
}

impl Default for Api {
  fn default() -> Self {
    Self::new()
  }
}

/// A transport that can turn a sentence into an [`Analysis`].
///
/// [`Api`] is the real implementation; the orchestrator only ever sees this
/// trait.
pub trait Generate: Send + Sync + 'static {
  /// Performs one analysis request.
  fn generate(&self, sentence: &str) -> Result<Analysis, Error>;
}

impl Generate for Api {
  fn generate(&self, sentence: &str) -> Result<Analysis, Error> {
    Api::generate(self, sentence)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn complete_needs_both_fields() {
    let a = Analysis {
      breakdown: Some("B".into()),
      tree: Some("<svg></svg>".into()),
    };
    assert_eq!(a.complete(), Some(("B".into(), "<svg></svg>".into())));

    let a = Analysis {
      breakdown: Some("B".into()),
      tree: None,
    };
    assert_eq!(a.complete(), None);
  }

  #[test]
  fn empty_string_is_missing() {
    let a: Analysis =
      serde_json::from_str(r#"{"breakdown": "", "tree": "<svg/>"}"#).unwrap();
    assert_eq!(a.complete(), None);

    let a: Analysis =
      serde_json::from_str(r#"{"breakdown": "B", "tree": null}"#).unwrap();
    assert_eq!(a.complete(), None);
  }

  #[test]
  fn non_string_fields_are_rejected() {
    assert!(serde_json::from_str::<Analysis>(r#"{"breakdown": 1}"#).is_err());
  }

  #[test]
  fn trailing_slash_is_dropped() {
    let api = Api::with_options(Options {
      base_url: "http://localhost:5000/".into(),
      cache_control: false,
    });
    assert_eq!(api.base_url(), "http://localhost:5000");
  }

  #[test]
  fn status_error_display() {
    let e = Error::Status {
      status: StatusCode::BAD_REQUEST,
      message: Some("No sentence provided.".into()),
    };
    assert_eq!(e.to_string(), "server answered 400 Bad Request: No sentence provided.");

    let e = Error::Status {
      status: StatusCode::INTERNAL_SERVER_ERROR,
      message: None,
    };
    assert_eq!(e.to_string(), "server answered 500 Internal Server Error");
  }
}
