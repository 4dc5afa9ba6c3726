//! Logging setup.
//!
//! The terminal belongs to the UI, so log records are piped into a file
//! instead. The filter defaults to `info` and can be changed with `RUST_LOG`.

use std::error::Error;
use std::fs;
use std::fs::OpenOptions;
use std::path::Path;
use std::path::PathBuf;

use env_logger::Builder;
use env_logger::Env;
use env_logger::Target;

/// Returns the default log file location.
pub fn default_path() -> PathBuf {
  let mut path = dirs::cache_dir().unwrap_or_else(std::env::temp_dir);
  path.push("sintaxis");
  path.push("arbol.log");
  path
}

/// Installs a global logger that appends to `path`.
pub fn init(path: &Path) -> Result<(), Box<dyn Error>> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)?;
  }

  let file = OpenOptions::new().create(true).append(true).open(path)?;

  Builder::from_env(Env::default().default_filter_or("info"))
    .target(Target::Pipe(Box::new(file)))
    .try_init()?;
  Ok(())
}
