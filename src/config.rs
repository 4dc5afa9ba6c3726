//! On-disk configuration.
//!
//! Configuration lives in `sintaxis/config.json` under the platform's config
//! directory. Every field is optional:
//!
//! ```json
//! {
//!   "base_url": "http://127.0.0.1:5000",
//!   "cache_control": true,
//!   "language": "spanish"
//! }
//! ```

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use crate::api;
use crate::api::Api;
use crate::messages::Language;
use crate::messages::Messages;

/// A configuration error.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum Error {
  #[error("could not read {}: {source}", .path.display())]
  Io { path: PathBuf, source: io::Error },

  #[error("could not parse {}: {source}", .path.display())]
  Json {
    path: PathBuf,
    source: serde_json::Error,
  },
}

/// Client configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Where the analysis service lives.
  pub base_url: String,
  /// Whether requests carry cache-disabling headers.
  pub cache_control: bool,
  /// The language of the messages shown to the user.
  pub language: Language,
}

impl Default for Config {
  fn default() -> Self {
    let opts = api::Options::default();
    Self {
      base_url: opts.base_url,
      cache_control: opts.cache_control,
      language: Language::default(),
    }
  }
}

impl Config {
  /// Returns the default location of the config file, if the platform has a
  /// config directory.
  pub fn default_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push("sintaxis");
    path.push("config.json");
    Some(path)
  }

  /// Loads the config from [`Config::default_path()`].
  ///
  /// A missing file (or a platform without a config directory) yields the
  /// defaults.
  pub fn load() -> Result<Self, Error> {
    match Self::default_path() {
      Some(path) => Self::load_from(&path),
      None => Ok(Self::default()),
    }
  }

  /// Loads the config from `path`. A missing file yields the defaults.
  pub fn load_from(path: &Path) -> Result<Self, Error> {
    let bytes = match fs::read(path) {
      Ok(bytes) => bytes,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Ok(Self::default())
      }
      Err(source) => {
        return Err(Error::Io {
          path: path.to_path_buf(),
          source,
        })
      }
    };

    serde_json::from_slice(&bytes).map_err(|source| Error::Json {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Builds an [`Api`] client from this config.
  pub fn api(&self) -> Api {
    Api::with_options(api::Options {
      base_url: self.base_url.clone(),
      cache_control: self.cache_control,
    })
  }

  /// Returns the messages for the configured language.
  pub fn messages(&self) -> Messages {
    Messages::for_language(self.language)
  }
}
