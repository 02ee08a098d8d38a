//! Atomic persistence helpers.
//!
//! A save never writes the target in place.  The rendering goes to a sibling
//! file named `<target>` + [`TEMP_SUFFIX`], which is flushed, synced, and
//! closed before being renamed over the target.  Readers of the target
//! therefore observe either the old or the new content, never a mix.
//!
//! If anything fails before the rename, the target is untouched and the
//! temporary file is left where it is; [`temp_path`] tells the caller where
//! to look.
use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use crate::document::Document;
use crate::error::{IniError, Result};

/// Suffix appended to the target path to name the temporary file.
pub const TEMP_SUFFIX: &str = ".new";

/// Temporary file used while saving to `path`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use inicfg::fs::temp_path;
///
/// assert_eq!(temp_path(Path::new("/etc/app.conf")), Path::new("/etc/app.conf.new"));
/// ```
#[must_use]
pub fn temp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(TEMP_SUFFIX);
    PathBuf::from(tmp)
}

/// Write the rendering of `contents` to `path` via temp file and rename.
///
/// # Errors
///
/// Returns [`IniError::InvalidArgument`] if `path` is empty and
/// [`IniError::Io`] if creating, writing, syncing, or renaming fails.
pub fn write_atomic(path: &Path, contents: &dyn Display) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(IniError::invalid("path"));
    }
    let tmp = temp_path(path);
    let file = File::create(&tmp).map_err(|e| IniError::io(&tmp, e))?;

    let written = write_and_close(file, contents)
        .map_err(|e| IniError::io(&tmp, e))
        .and_then(|()| fs::rename(&tmp, path).map_err(|e| IniError::io(path, e)));

    if let Err(e) = &written {
        tracing::warn!(
            "save of {} failed, leaving {} behind: {e}",
            path.display(),
            tmp.display()
        );
    }
    written
}

/// Stream `contents` into `file`, then flush and sync it.  The handle is
/// closed on return whatever the outcome.
fn write_and_close(file: File, contents: &dyn Display) -> std::io::Result<()> {
    let mut writer = BufWriter::new(file);
    write!(writer, "{contents}")?;
    let file = writer.into_inner().map_err(std::io::IntoInnerError::into_error)?;
    file.sync_all()
}

impl Document {
    /// Save to `path` atomically.
    ///
    /// Each section is written as a blank line, then `[name]`, then one
    /// `key=value` line per entry, all in document order.  `path` need not
    /// equal [`source_path`](Self::source_path).
    ///
    /// # Errors
    ///
    /// See [`write_atomic`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        write_atomic(path, self)?;
        tracing::debug!(
            path = %path.display(),
            sections = self.len(),
            "saved configuration"
        );
        Ok(())
    }

    /// Save back to the file this document was loaded from.
    ///
    /// # Errors
    ///
    /// [`IniError::InvalidArgument`] if the document has no source path;
    /// otherwise see [`write_atomic`].
    pub fn save_to_source(&self) -> Result<()> {
        let path = self
            .source_path()
            .ok_or_else(|| IniError::invalid("source path"))?;
        self.save(path)
    }
}
