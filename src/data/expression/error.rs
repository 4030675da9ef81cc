use std::fmt;

use crate::foundation::error::StyleError;

/// Lex or parse failure at a byte offset of the expression source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExprError {
    pub(crate) offset: usize,
    pub(crate) message: String,
}

impl ExprError {
    pub(crate) fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }

    /// Attaches the source text, with a caret under the failing position.
    pub(crate) fn into_style_error(self, source: &str) -> StyleError {
        let caret = " ".repeat(source[..self.offset.min(source.len())].chars().count());
        StyleError::parse(format!(
            "{} at position {} in data expression\n  {source}\n  {caret}^",
            self.message, self.offset
        ))
    }
}

impl fmt::Display for ExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expr error at byte {}: {}", self.offset, self.message)
    }
}

impl std::error::Error for ExprError {}
