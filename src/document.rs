//! In-memory document model and mutation API.
//!
//! A [`Document`] owns an ordered list of [`Section`]s; each section owns an
//! ordered list of [`KeyValue`] entries.  Order is always insertion order.
//! Section names may repeat within a document, keys may not repeat within a
//! section.
//!
//! Every mutation either fully applies or leaves the document untouched:
//! arguments are validated and new strings are allocated before anything is
//! linked in.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{IniError, Result};

/// A whole configuration file: an ordered sequence of sections.
///
/// # Examples
///
/// ```
/// use inicfg::Document;
///
/// let mut doc = Document::new();
/// let net = doc.add_section("Network").unwrap();
/// net.add_key("host", "localhost").unwrap();
/// net.add_key("port", "8080").unwrap();
///
/// assert_eq!(doc.to_string(), "\n[Network]\nhost=localhost\nport=8080\n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    source_path: Option<PathBuf>,
    sections: Vec<Section>,
}

/// A named, ordered group of key-value pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    name: String,
    entries: Vec<KeyValue>,
}

/// One `key=value` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyValue {
    key: String,
    value: String,
}

/// Build an owned copy of `s`, reporting allocation failure instead of
/// aborting.
pub(crate) fn duplicate(s: &str) -> Result<String> {
    let mut owned = String::new();
    owned.try_reserve_exact(s.len())?;
    owned.push_str(s);
    Ok(owned)
}

const fn require<'a>(s: &'a str, what: &'static str) -> Result<&'a str> {
    if s.is_empty() {
        Err(IniError::invalid(what))
    } else {
        Ok(s)
    }
}

impl Document {
    /// Create an empty document with no source path.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            source_path: None,
            sections: Vec::new(),
        }
    }

    pub(crate) fn set_source_path(&mut self, path: &Path) {
        self.source_path = Some(path.to_path_buf());
    }

    /// Most recently appended section; key-value lines on load go here.
    pub(crate) fn last_section_mut(&mut self) -> Option<&mut Section> {
        self.sections.last_mut()
    }

    /// Path this document was loaded from, if any.
    #[must_use]
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// All sections in document order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Section at `index` in document order.
    #[must_use]
    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Mutable section at `index` in document order.
    pub fn section_mut(&mut self, index: usize) -> Option<&mut Section> {
        self.sections.get_mut(index)
    }

    /// Number of sections.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the document holds no sections.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Append a new, empty section and return it for population.
    ///
    /// Names are not checked for uniqueness: a document may hold several
    /// sections with the same name.
    ///
    /// # Errors
    ///
    /// [`IniError::InvalidArgument`] if `name` is empty,
    /// [`IniError::OutOfMemory`] if the name cannot be copied.
    pub fn add_section(&mut self, name: &str) -> Result<&mut Section> {
        let name = duplicate(require(name, "section name")?)?;
        self.sections.try_reserve(1)?;
        self.sections.push(Section {
            name,
            entries: Vec::new(),
        });
        self.sections
            .last_mut()
            .ok_or_else(|| IniError::invalid("section name"))
    }

    /// Every section named exactly `name` (case-sensitive), in document
    /// order.  An empty result is not an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use inicfg::Document;
    ///
    /// let doc = Document::parse_str("[A]\nx=1\n[B]\n[A]\ny=2\n").unwrap();
    /// let found = doc.find_sections("A").unwrap();
    /// assert_eq!(found.len(), 2);
    /// assert_eq!(found[1].get("y"), Some("2"));
    /// assert!(doc.find_sections("a").unwrap().is_empty());
    /// ```
    ///
    /// # Errors
    ///
    /// [`IniError::InvalidArgument`] if `name` is empty.
    pub fn find_sections(&self, name: &str) -> Result<Vec<&Section>> {
        let name = require(name, "section name")?;
        Ok(self.sections.iter().filter(|s| s.name == name).collect())
    }

    /// Mutable variant of [`find_sections`](Self::find_sections).
    ///
    /// # Errors
    ///
    /// [`IniError::InvalidArgument`] if `name` is empty.
    pub fn find_sections_mut(&mut self, name: &str) -> Result<Vec<&mut Section>> {
        let name = require(name, "section name")?;
        Ok(self
            .sections
            .iter_mut()
            .filter(|s| s.name == name)
            .collect())
    }

    /// Remove every section named exactly `name`, together with its keys.
    ///
    /// The remaining sections keep their relative order.  Returns the number
    /// of sections removed; zero is not an error.
    ///
    /// # Errors
    ///
    /// [`IniError::InvalidArgument`] if `name` is empty.
    pub fn delete_sections(&mut self, name: &str) -> Result<usize> {
        let name = require(name, "section name")?;
        let before = self.sections.len();
        self.sections.retain(|s| s.name != name);
        Ok(before - self.sections.len())
    }
}

impl fmt::Display for Document {
    /// Render in the on-disk format: each section preceded by a blank line,
    /// then one `key=value` line per entry.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "[{}]", section.name)?;
            for kv in &section.entries {
                writeln!(f, "{}={}", kv.key, kv.value)?;
            }
        }
        Ok(())
    }
}

impl Section {
    /// Section name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[KeyValue] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the section holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry whose key equals `key` exactly.  An empty key never
    /// matches.
    #[must_use]
    pub fn find_key(&self, key: &str) -> Option<&KeyValue> {
        if key.is_empty() {
            return None;
        }
        self.entries.iter().find(|kv| kv.key == key)
    }

    /// Value stored under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.find_key(key).map(KeyValue::value)
    }

    /// Append `key=value` to the end of the section.
    ///
    /// # Examples
    ///
    /// ```
    /// use inicfg::{Document, ErrorKind};
    ///
    /// let mut doc = Document::new();
    /// let s = doc.add_section("Main").unwrap();
    /// s.add_key("mode", "fast").unwrap();
    /// let err = s.add_key("mode", "slow").unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    /// assert_eq!(s.get("mode"), Some("fast"));
    /// ```
    ///
    /// # Errors
    ///
    /// - [`IniError::InvalidArgument`] if `key` or `value` is empty
    /// - [`IniError::AlreadyExists`] if the section already holds `key`
    /// - [`IniError::OutOfMemory`] if the strings cannot be copied
    pub fn add_key(&mut self, key: &str, value: &str) -> Result<&KeyValue> {
        let key = require(key, "key")?;
        let value = require(value, "value")?;
        if self.find_key(key).is_some() {
            return Err(IniError::AlreadyExists {
                key: key.to_string(),
            });
        }
        let entry = KeyValue {
            key: duplicate(key)?,
            value: duplicate(value)?,
        };
        self.entries.try_reserve(1)?;
        self.entries.push(entry);
        self.entries.last().ok_or_else(|| IniError::invalid("key"))
    }

    /// Replace the value stored under an existing `key`.
    ///
    /// The entry keeps its position in the section.
    ///
    /// # Errors
    ///
    /// - [`IniError::InvalidArgument`] if `key` or `value` is empty
    /// - [`IniError::NotFound`] if the section does not hold `key`
    /// - [`IniError::OutOfMemory`] if the value cannot be copied
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let key = require(key, "key")?;
        let value = require(value, "value")?;
        let entry = self
            .entries
            .iter_mut()
            .find(|kv| kv.key == key)
            .ok_or_else(|| IniError::NotFound {
                key: key.to_string(),
            })?;
        entry.value = duplicate(value)?;
        Ok(())
    }

    /// Remove every entry whose key equals `key`; returns how many were
    /// removed (at most one, since keys are unique).
    ///
    /// # Errors
    ///
    /// [`IniError::InvalidArgument`] if `key` is empty.
    pub fn delete_key(&mut self, key: &str) -> Result<usize> {
        let key = require(key, "key")?;
        let before = self.entries.len();
        self.entries.retain(|kv| kv.key != key);
        Ok(before - self.entries.len())
    }
}

impl KeyValue {
    /// Entry key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Entry value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}
