//! Loading documents from files, readers, and strings.
//!
//! Input is consumed strictly line by line through a bounded buffer.  Each
//! line is classified by the [`grammar`](crate::grammar) and applied to the
//! document being built through the regular mutation API, so a file with a
//! repeated key fails exactly like a repeated [`Section::add_key`] would.
//!
//! Loading is all-or-nothing: on any failure the partially built document is
//! dropped and only the error is returned.
//!
//! [`Section::add_key`]: crate::Section::add_key

use std::fs::File;
use std::io::{BufRead, BufReader, Read as _};
use std::path::Path;

use crate::document::Document;
use crate::error::{IniError, Result};
use crate::grammar::{self, Line};

/// Default maximum length of one line in bytes, not counting the `\n`
/// terminator.
pub const MAX_LINE_LENGTH: usize = 1024;

/// Label used in [`IniError::Io`] when reading from an anonymous stream.
const STREAM_ORIGIN: &str = "<stream>";

/// Tunables for loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Longest accepted line in bytes, excluding the `\n` terminator.
    /// Longer lines fail with [`IniError::LineTooLong`].
    pub max_line_length: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            max_line_length: MAX_LINE_LENGTH,
        }
    }
}

impl Document {
    /// Load a document from `path` with default [`ReadOptions`].
    ///
    /// The returned document remembers `path` as its
    /// [`source_path`](Self::source_path).
    ///
    /// # Errors
    ///
    /// - [`IniError::InvalidArgument`] if `path` is empty
    /// - [`IniError::Io`] if the file cannot be opened or read
    /// - [`IniError::MalformedInput`] if a line matches neither grammar
    /// - [`IniError::Structural`] if a key-value line precedes every header
    /// - [`IniError::AlreadyExists`] if a section repeats a key
    /// - [`IniError::LineTooLong`] if a line exceeds [`MAX_LINE_LENGTH`]
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        Self::read_with(path, &ReadOptions::default())
    }

    /// Load a document from `path` with explicit options.
    ///
    /// # Errors
    ///
    /// See [`read`](Self::read).
    pub fn read_with(path: impl AsRef<Path>, options: &ReadOptions) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(IniError::invalid("path"));
        }
        let file = File::open(path).map_err(|e| IniError::io(path, e))?;
        let mut doc = parse_lines(BufReader::new(file), options, path)?;
        doc.set_source_path(path);
        tracing::debug!(
            path = %path.display(),
            sections = doc.len(),
            "loaded configuration"
        );
        Ok(doc)
    }

    /// Load a document from any buffered reader.  The result has no source
    /// path.
    ///
    /// # Errors
    ///
    /// See [`read`](Self::read); I/O errors name `<stream>` as their path.
    pub fn from_reader<R: BufRead>(reader: R, options: &ReadOptions) -> Result<Self> {
        parse_lines(reader, options, Path::new(STREAM_ORIGIN))
    }

    /// Parse a document from in-memory text.
    ///
    /// # Examples
    ///
    /// ```
    /// use inicfg::{Document, ErrorKind};
    ///
    /// let doc = Document::parse_str("# demo\n[Main]\nmode = fast\n").unwrap();
    /// assert_eq!(doc.sections()[0].get("mode"), Some("fast"));
    ///
    /// let err = Document::parse_str("mode=fast\n[Main]\n").unwrap_err();
    /// assert_eq!(err.kind(), ErrorKind::Structural);
    /// ```
    ///
    /// # Errors
    ///
    /// See [`read`](Self::read).
    pub fn parse_str(content: &str) -> Result<Self> {
        Self::from_reader(content.as_bytes(), &ReadOptions::default())
    }
}

fn parse_lines<R: BufRead>(
    mut reader: R,
    options: &ReadOptions,
    origin: &Path,
) -> Result<Document> {
    let limit = options.max_line_length;
    // One extra byte so that a line of exactly `limit` bytes still fits
    // together with its terminator.
    let take = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);

    let mut doc = Document::new();
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        let read = reader
            .by_ref()
            .take(take)
            .read_until(b'\n', &mut buf)
            .map_err(|e| IniError::io(origin, e))?;
        if read == 0 {
            break;
        }
        line_no += 1;

        let body = buf.strip_suffix(b"\n").unwrap_or(buf.as_slice());
        if body.len() > limit {
            return Err(IniError::LineTooLong {
                line: line_no,
                limit,
            });
        }
        let text = std::str::from_utf8(body).map_err(|_| IniError::MalformedInput {
            line: line_no,
            content: String::from_utf8_lossy(body).trim().to_string(),
        })?;

        apply_line(&mut doc, text, line_no)?;
    }

    Ok(doc)
}

/// Classify one line and apply it to `doc`.
fn apply_line(doc: &mut Document, text: &str, line_no: usize) -> Result<()> {
    let trimmed = text.trim();
    let is_header = trimmed.starts_with('[');

    if !is_header && !trimmed.is_empty() && !trimmed.starts_with('#') && doc.is_empty() {
        return Err(IniError::Structural {
            line: line_no,
            content: trimmed.to_string(),
        });
    }

    match grammar::classify(text) {
        Some(Line::Blank) => {
            tracing::trace!(line = line_no, "skipping blank or comment line");
        }
        Some(Line::Section(name)) => {
            tracing::trace!(line = line_no, section = name, "section header");
            doc.add_section(name)?;
        }
        Some(Line::Entry { key, value }) => {
            tracing::trace!(line = line_no, key, "key-value pair");
            let section = doc.last_section_mut().ok_or_else(|| IniError::Structural {
                line: line_no,
                content: trimmed.to_string(),
            })?;
            section.add_key(key, value)?;
        }
        None => {
            return Err(IniError::MalformedInput {
                line: line_no,
                content: trimmed.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::{self, Write as _};

    fn write_temp_ini(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.ini");
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    fn kind_of(content: &str) -> ErrorKind {
        Document::parse_str(content)
            .expect_err("content should be rejected")
            .kind()
    }

    // -----------------------------------------------------------------------
    // Successful loads
    // -----------------------------------------------------------------------

    #[test]
    fn parse_simple_document() {
        let doc = Document::parse_str("[Main]\na=1\nb=2\n").unwrap();
        assert_eq!(doc.len(), 1);
        assert_eq!(doc.sections()[0].name(), "Main");
        assert_eq!(doc.sections()[0].get("a"), Some("1"));
        assert_eq!(doc.sections()[0].get("b"), Some("2"));
    }

    #[test]
    fn parse_skips_comments_and_blank_lines() {
        let content = "\n# header comment\n[Main]\n\n   # indented\n\ta=1\n\n";
        let doc = Document::parse_str(content).unwrap();
        assert_eq!(doc.sections()[0].len(), 1);
    }

    #[test]
    fn parse_leading_comment_before_first_section() {
        let doc = Document::parse_str("# only a note\n[Main]\n").unwrap();
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn parse_crlf_line_endings() {
        let doc = Document::parse_str("[Main]\r\nkey=value\r\n").unwrap();
        assert_eq!(doc.sections()[0].get("key"), Some("value"));
    }

    #[test]
    fn parse_without_trailing_newline() {
        let doc = Document::parse_str("[Main]\nkey=value").unwrap();
        assert_eq!(doc.sections()[0].get("key"), Some("value"));
    }

    #[test]
    fn parse_empty_input() {
        assert!(Document::parse_str("").unwrap().is_empty());
        assert!(Document::parse_str("# nothing\n\n").unwrap().is_empty());
    }

    #[test]
    fn parse_keeps_duplicate_sections() {
        let doc = Document::parse_str("[A]\nx=1\n[A]\nx=2\n").unwrap();
        let found = doc.find_sections("A").unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].get("x"), Some("1"));
        assert_eq!(found[1].get("x"), Some("2"));
    }

    // -----------------------------------------------------------------------
    // Rejections
    // -----------------------------------------------------------------------

    #[test]
    fn digit_in_section_name_is_malformed() {
        assert_eq!(kind_of("[1Section]\n"), ErrorKind::MalformedInput);
    }

    #[test]
    fn trailing_garbage_after_header_is_malformed() {
        assert_eq!(kind_of("[Sec]tion]\n"), ErrorKind::MalformedInput);
    }

    #[test]
    fn space_inside_value_is_malformed() {
        assert_eq!(kind_of("[S]\nkey =value extra\n"), ErrorKind::MalformedInput);
    }

    #[test]
    fn malformed_error_reports_line_number() {
        let err = Document::parse_str("[S]\na=1\n\n  bad line  \n").unwrap_err();
        match err {
            IniError::MalformedInput { line, content } => {
                assert_eq!(line, 4);
                assert_eq!(content, "bad line");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn key_before_section_is_structural() {
        assert_eq!(kind_of("key=value\n[S]\n"), ErrorKind::Structural);
    }

    #[test]
    fn garbage_before_section_is_structural() {
        assert_eq!(kind_of("not a pair\n"), ErrorKind::Structural);
    }

    #[test]
    fn repeated_key_in_section_already_exists() {
        assert_eq!(kind_of("[S]\nk=1\nk=2\n"), ErrorKind::AlreadyExists);
    }

    #[test]
    fn repeated_key_in_other_section_is_fine() {
        let doc = Document::parse_str("[S]\nk=1\n[T]\nk=2\n").unwrap();
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let bytes: &[u8] = b"[S]\nk=\xff\xfe\n";
        let err = Document::from_reader(bytes, &ReadOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    // -----------------------------------------------------------------------
    // Line length
    // -----------------------------------------------------------------------

    #[test]
    fn line_at_limit_is_accepted() {
        let options = ReadOptions { max_line_length: 8 };
        let content = "[S]\nk=123456\n";
        let doc = Document::from_reader(content.as_bytes(), &options).unwrap();
        assert_eq!(doc.sections()[0].get("k"), Some("123456"));
    }

    #[test]
    fn line_over_limit_is_too_long() {
        let options = ReadOptions { max_line_length: 8 };
        let content = "[S]\nk=1234567\n";
        let err = Document::from_reader(content.as_bytes(), &options).unwrap_err();
        match err {
            IniError::LineTooLong { line, limit } => {
                assert_eq!(line, 2);
                assert_eq!(limit, 8);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn last_line_over_limit_without_newline_is_too_long() {
        let options = ReadOptions { max_line_length: 4 };
        let err = Document::from_reader("[S]\nk=123".as_bytes(), &options).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LineTooLong);
    }

    #[test]
    fn default_limit_rejects_pathological_line() {
        let content = format!("[S]\nk={}\n", "x".repeat(MAX_LINE_LENGTH));
        assert_eq!(kind_of(&content), ErrorKind::LineTooLong);
    }

    // -----------------------------------------------------------------------
    // Files
    // -----------------------------------------------------------------------

    #[test]
    fn read_sets_source_path() {
        let (_dir, path) = write_temp_ini("[Main]\na=1\n");
        let doc = Document::read(&path).unwrap();
        assert_eq!(doc.source_path(), Some(path.as_path()));
    }

    #[test]
    fn read_missing_file_is_io_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Document::read(dir.path().join("absent.ini")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        match err {
            IniError::Io { source, .. } => assert_eq!(source.kind(), io::ErrorKind::NotFound),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn read_empty_path_is_invalid() {
        assert_eq!(
            Document::read("").unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
    }

    #[test]
    fn parse_str_has_no_source_path() {
        let doc = Document::parse_str("[Main]\n").unwrap();
        assert_eq!(doc.source_path(), None);
    }

    #[test]
    fn stream_read_error_is_io() {
        struct Failing;
        impl io::Read for Failing {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("disk on fire"))
            }
        }
        let err = Document::from_reader(BufReader::new(Failing), &ReadOptions::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("<stream>"));
    }
}
