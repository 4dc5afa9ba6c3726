//! `sintaxis` is a client for a sentence-analysis service.
//!
//! The service takes a sentence and answers with a plain-text breakdown of
//! its parts of speech and a markup fragment drawing its dependency tree.
//! The [`Orchestrator`] drives one request per submission and renders the
//! answer into two [`Region`]s.

#![deny(missing_docs)]

pub mod api;
pub mod config;
pub mod messages;
pub mod orchestrator;
pub mod region;

pub use api::Api;
pub use config::Config;
pub use messages::Messages;
pub use orchestrator::Orchestrator;
pub use region::Region;
