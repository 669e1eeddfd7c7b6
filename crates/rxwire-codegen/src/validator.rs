//! Output validator
//!
//! Every assembled artifact is parsed as a Rust source file before it leaves
//! the pass. Only syntax is checked; names and types are not resolved.

use std::fmt;

/// First parse error found in an artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Parser message
    pub message: String,

    /// 1-based line
    pub line: usize,

    /// 1-based column
    pub column: usize,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

impl std::error::Error for SyntaxError {}

/// Syntax-only check for generated source
pub struct OutputValidator;

impl OutputValidator {
    /// Parse `text` as a complete source file
    ///
    /// Source positions recorded by the parse are released before returning.
    pub fn validate(text: &str) -> Result<(), SyntaxError> {
        let result = syn::parse_file(text).map(|_| ()).map_err(|e| {
            let start = e.span().start();
            SyntaxError {
                message: e.to_string(),
                line: start.line,
                column: start.column + 1,
            }
        });
        proc_macro2::extra::invalidate_current_thread_spans();
        result
    }
}
