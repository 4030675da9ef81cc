//! Host services the engine calls out to: clock, clipboard, cursor, log sink and path joining.

use std::sync::Mutex;
use std::time::Instant;

/// Severity of a message routed through [`SystemInterface::log_message`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Always,
    Error,
    Assert,
    Warning,
    Info,
    Debug,
}

/// Implemented by the embedding application.
///
/// Every method has a default so hosts only override what they actually provide.
pub trait SystemInterface: Send + Sync {
    /// Seconds since the application started.
    fn elapsed_time(&self) -> f64 {
        0.0
    }

    /// Returns `true` to continue after an assert-level message.
    fn log_message(&self, level: LogLevel, message: &str) -> bool {
        match level {
            LogLevel::Always | LogLevel::Info => tracing::info!(target: "stylebind", "{message}"),
            LogLevel::Error | LogLevel::Assert => tracing::error!(target: "stylebind", "{message}"),
            LogLevel::Warning => tracing::warn!(target: "stylebind", "{message}"),
            LogLevel::Debug => tracing::debug!(target: "stylebind", "{message}"),
        }
        true
    }

    fn set_mouse_cursor(&self, _cursor_name: &str) {}

    fn set_clipboard_text(&self, _text: &str) {}

    fn clipboard_text(&self) -> String {
        String::new()
    }

    /// Resolves `path` relative to the document at `document_path`.
    fn join_path(&self, document_path: &str, path: &str) -> String {
        join_path(document_path, path)
    }
}

/// Monotonic clock plus an in-process clipboard.
#[derive(Debug)]
pub struct DefaultSystem {
    start: Instant,
    clipboard: Mutex<String>,
    cursor: Mutex<String>,
}

impl Default for DefaultSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultSystem {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            clipboard: Mutex::new(String::new()),
            cursor: Mutex::new(String::new()),
        }
    }

    /// Name of the cursor last requested by the engine.
    pub fn mouse_cursor(&self) -> String {
        self.cursor
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl SystemInterface for DefaultSystem {
    fn elapsed_time(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    fn set_mouse_cursor(&self, cursor_name: &str) {
        let mut cursor = self
            .cursor
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cursor.clear();
        cursor.push_str(cursor_name);
    }

    fn set_clipboard_text(&self, text: &str) {
        let mut clipboard = self
            .clipboard
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        clipboard.clear();
        clipboard.push_str(text);
    }

    fn clipboard_text(&self) -> String {
        self.clipboard
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// Joins `path` onto the directory of `document_path` and normalises the result.
///
/// Paths carrying their own protocol (`file://…`) or starting with `/` replace the document
/// directory entirely. Backslashes are treated as separators.
pub fn join_path(document_path: &str, path: &str) -> String {
    let path = path.replace('\\', "/");
    if split_protocol(&path).0.is_some() || path.starts_with('/') {
        return normalize_path(&path);
    }

    let document = document_path.replace('\\', "/");
    let directory = match document.rfind('/') {
        Some(slash) => &document[..=slash],
        None => "",
    };
    normalize_path(&format!("{directory}{path}"))
}

/// Collapses `name/..` pairs and redundant `.` segments, keeping any protocol prefix.
///
/// A `..` with nothing left to consume is kept as-is, so `/../x` stays outside the root.
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let (protocol, rest) = split_protocol(&path);
    let (root, body) = match rest.strip_prefix('/') {
        Some(body) => ("/", body),
        None => ("", rest),
    };

    let segments: Vec<&str> = body.split('/').collect();
    let mut out: Vec<&str> = Vec::with_capacity(segments.len());
    for (i, segment) in segments.iter().copied().enumerate() {
        let is_last = i + 1 == segments.len();
        match segment {
            "." if !is_last && !segments[i + 1].is_empty() => {}
            ".." => match out.last() {
                Some(&prev) if !prev.is_empty() && prev != ".." && prev != "." => {
                    out.pop();
                }
                _ => out.push(segment),
            },
            _ => out.push(segment),
        }
    }

    let mut joined = String::with_capacity(path.len());
    if let Some(protocol) = protocol {
        joined.push_str(protocol);
        joined.push_str("://");
    }
    joined.push_str(root);
    joined.push_str(&out.join("/"));
    joined
}

fn split_protocol(path: &str) -> (Option<&str>, &str) {
    if let Some(at) = path.find("://") {
        let scheme = &path[..at];
        if scheme.len() > 1
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        {
            return (Some(scheme), &path[at + 3..]);
        }
    }
    (None, path)
}

#[cfg(test)]
#[path = "../tests/unit/system.rs"]
mod tests;
