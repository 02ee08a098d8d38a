//! Strict INI-style configuration files.
//!
//! Read a file of bracketed sections and `key=value` lines into an ordered
//! in-memory [`Document`], edit it, and write it back with an atomic
//! temp-file-plus-rename save.
//!
//! ```text
//! [Network]
//! host=localhost
//! port=8080
//!
//! [Network]
//! timeout=30
//! ```
//!
//! The crate is organised into four layers:
//!
//! - **[`grammar`]**: recognisers for header and key-value lines
//! - **[`Document`] / [`Section`] / [`KeyValue`]**: the ordered model and its
//!   mutation API
//! - **[`reader`]**: line-by-line loading with bounded line length
//! - **[`fs`]**: atomic saving
//!
//! The grammar is deliberately narrow: section names are ASCII letters,
//! keys are ASCII letters and digits, values are a single run of
//! non-whitespace bytes.  Anything else fails to load.
//!
//! # Examples
//!
//! ```
//! use inicfg::Document;
//!
//! # fn main() -> Result<(), inicfg::IniError> {
//! # let dir = tempfile::tempdir().map_err(|e| inicfg::IniError::Io { path: ".".into(), source: e })?;
//! # let path = dir.path().join("app.ini");
//! let mut doc = Document::new();
//! let net = doc.add_section("Network")?;
//! net.add_key("host", "localhost")?;
//! net.add_key("port", "8080")?;
//! doc.save(&path)?;
//!
//! let mut loaded = Document::read(&path)?;
//! for net in loaded.find_sections_mut("Network")? {
//!     net.set_value("port", "9090")?;
//! }
//! loaded.save_to_source()?;
//! # Ok(())
//! # }
//! ```
//!
//! All types are single-owner and perform no locking; share a document
//! across threads only behind the caller's own synchronisation.
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

mod document;
pub mod error;
pub mod fs;
pub mod grammar;
pub mod reader;

pub use document::{Document, KeyValue, Section};
pub use error::{ErrorKind, IniError, Result};
pub use reader::{MAX_LINE_LENGTH, ReadOptions};
