//! `kennel` - A small service for keeping named text records
//!
//! This library provides the record store, path validation, handlers and
//! HTTP wiring behind the `kennel` binary. Every record is one file on disk,
//! addressed by a name that has been validated before it gets near a path.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod record;
pub mod render;
pub mod router;
pub mod server;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use handlers::Outcome;
pub use logging::init_logging;
pub use record::{Record, RecordName};
pub use render::{HtmlRenderer, RenderSink};
pub use router::{parse_path, Operation, Route};
pub use server::{app, serve, AppState};
pub use storage::{RecordStore, WriteMode};
