// SPDX-License-Identifier: MIT OR Apache-2.0
#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Structured stack traces parsed from the host's captured backtrace text.
//!
//! [`std::backtrace::Backtrace`] renders captured frames as text:
//!
//! ```text
//!    0: wf_error::ApiError::from_options
//!              at /src/crates/wf-error/src/error.rs:88:27
//!    1: service::handlers::lookup_user
//!              at /src/service/handlers.rs:141:9
//! ```
//!
//! [`parse`] turns that rendering into an inspectable [`StackTrace`] — an
//! ordered list of `{function, file, line}` records, innermost frame first —
//! that serializes cleanly into a wire payload. Lines that match neither a
//! frame header nor a location continuation are skipped, so a disabled or
//! unsupported backtrace parses to an empty trace.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single resolved call-site record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StackFrame {
    /// Demangled function path, e.g. `service::handlers::lookup_user`.
    pub function: String,
    /// Source file the frame resolved to, when symbolication found one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// 1-based line number within `file`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl StackFrame {
    /// Create a frame with no source location.
    #[must_use]
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            file: None,
            line: None,
        }
    }

    /// Attach a source location to the frame.
    #[must_use]
    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.function)?;
        if let Some(file) = &self.file {
            write!(f, " at {file}")?;
            if let Some(line) = self.line {
                write!(f, ":{line}")?;
            }
        }
        Ok(())
    }
}

/// Ordered sequence of [`StackFrame`]s, innermost call first.
///
/// Serializes transparently as a JSON array of frame objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct StackTrace(pub Vec<StackFrame>);

impl StackTrace {
    /// Create an empty trace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames in capture order, innermost first.
    #[must_use]
    pub fn frames(&self) -> &[StackFrame] {
        &self.0
    }

    /// Number of frames in the trace.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the trace holds no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a frame to the end of the trace.
    pub fn push(&mut self, frame: StackFrame) {
        self.0.push(frame);
    }
}

impl FromIterator<StackFrame> for StackTrace {
    fn from_iter<I: IntoIterator<Item = StackFrame>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, frame) in self.0.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{index:>4}: {frame}")?;
        }
        Ok(())
    }
}

/// Parse the text rendering of a captured backtrace into structured frames.
///
/// Recognizes the two line shapes the std renderer emits: `N: function`
/// frame headers and `at path:line:col` location continuations (the column
/// is dropped). Anything else — including the `disabled backtrace`
/// placeholder — is ignored.
///
/// # Examples
///
/// ```
/// let trace = wf_stack::parse(
///     "   0: app::load\n             at /src/app.rs:10:5\n   1: app::main\n",
/// );
/// assert_eq!(trace.len(), 2);
/// assert_eq!(trace.frames()[0].function, "app::load");
/// assert_eq!(trace.frames()[0].line, Some(10));
/// assert!(trace.frames()[1].file.is_none());
/// ```
#[must_use]
pub fn parse(raw: &str) -> StackTrace {
    let mut frames: Vec<StackFrame> = Vec::new();
    for line in raw.lines() {
        let line = line.trim();
        if let Some(location) = line.strip_prefix("at ") {
            // Continuation line: attaches to the frame header above it.
            if let Some(frame) = frames.last_mut() {
                let (file, line) = split_location(location.trim());
                frame.file = file;
                frame.line = line;
            }
            continue;
        }
        if let Some((index, function)) = line.split_once(':') {
            let function = function.trim();
            if !index.is_empty()
                && index.bytes().all(|b| b.is_ascii_digit())
                && !function.is_empty()
            {
                frames.push(StackFrame::new(function));
            }
        }
    }
    StackTrace(frames)
}

/// Split a `path:line:col` (or `path:line`) location into path and line.
fn split_location(location: &str) -> (Option<String>, Option<u32>) {
    if location.is_empty() {
        return (None, None);
    }
    let mut tail = location.rsplitn(3, ':');
    let last = tail.next();
    let middle = tail.next();
    let head = tail.next();
    if let (Some(path), Some(line), Some(col)) = (head, middle, last) {
        if line.parse::<u32>().is_ok() && col.parse::<u32>().is_ok() {
            return (Some(path.to_string()), line.parse().ok());
        }
    }
    if let Some((path, line)) = location.rsplit_once(':') {
        if let Ok(line) = line.parse::<u32>() {
            return (Some(path.to_string()), Some(line));
        }
    }
    (Some(location.to_string()), None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAMPLE: &str = "\
   0: wf_error::ApiError::from_options
             at /src/crates/wf-error/src/error.rs:88:27
   1: service::handlers::lookup_user
             at /src/service/handlers.rs:141:9
   2: tokio::runtime::task::raw::poll
";

    // -- Parsing ---------------------------------------------------------

    #[test]
    fn parses_frames_with_locations() {
        let trace = parse(SAMPLE);
        assert_eq!(trace.len(), 3);
        assert_eq!(trace.frames()[0].function, "wf_error::ApiError::from_options");
        assert_eq!(
            trace.frames()[0].file.as_deref(),
            Some("/src/crates/wf-error/src/error.rs")
        );
        assert_eq!(trace.frames()[0].line, Some(88));
    }

    #[test]
    fn frame_without_location_keeps_none() {
        let trace = parse(SAMPLE);
        let last = &trace.frames()[2];
        assert_eq!(last.function, "tokio::runtime::task::raw::poll");
        assert!(last.file.is_none());
        assert!(last.line.is_none());
    }

    #[test]
    fn disabled_backtrace_parses_to_empty() {
        assert!(parse("disabled backtrace").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn stray_location_line_is_ignored() {
        // A continuation with no preceding header has nothing to attach to.
        let trace = parse("             at /src/app.rs:10:5\n   0: app::main\n");
        assert_eq!(trace.len(), 1);
        assert!(trace.frames()[0].file.is_none());
    }

    #[test]
    fn location_without_column_still_splits() {
        let (file, line) = split_location("/src/app.rs:10");
        assert_eq!(file.as_deref(), Some("/src/app.rs"));
        assert_eq!(line, Some(10));
    }

    #[test]
    fn unparseable_location_becomes_bare_file() {
        let (file, line) = split_location("<unknown>");
        assert_eq!(file.as_deref(), Some("<unknown>"));
        assert_eq!(line, None);
    }

    // -- Serialization ---------------------------------------------------

    #[test]
    fn serializes_as_array_of_frame_objects() {
        let trace: StackTrace = [
            StackFrame::new("app::load").with_location("/src/app.rs", 10),
            StackFrame::new("app::main"),
        ]
        .into_iter()
        .collect();
        let value = serde_json::to_value(&trace).unwrap();
        assert_eq!(
            value,
            json!([
                {"function": "app::load", "file": "/src/app.rs", "line": 10},
                {"function": "app::main"}
            ])
        );
    }

    #[test]
    fn serde_roundtrip_preserves_frames() {
        let trace = parse(SAMPLE);
        let text = serde_json::to_string(&trace).unwrap();
        let back: StackTrace = serde_json::from_str(&text).unwrap();
        assert_eq!(trace, back);
    }

    // -- Display ---------------------------------------------------------

    #[test]
    fn display_renders_numbered_frames() {
        let trace = parse(SAMPLE);
        let rendered = trace.to_string();
        assert!(rendered.contains("0: wf_error::ApiError::from_options"));
        assert!(rendered.contains("at /src/service/handlers.rs:141"));
    }
}
