//! Error codes for the Dotscape diagnostic system.
//!
//! Codes are organized by severity:
//! - `E1xx` - Fatal input errors
//! - `W2xx` - Skipped fragments

use std::fmt;

/// Codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Fatal Errors (E1xx)
    // =========================================================================
    /// Empty input.
    ///
    /// The input contains nothing but whitespace and comments.
    E100,

    /// Unreadable input.
    ///
    /// No graph header was found and no node or edge statement could be
    /// recognized.
    E101,

    // =========================================================================
    // Skipped Fragments (W2xx)
    // =========================================================================
    /// Unexpected token.
    ///
    /// A token that does not start any statement shape was skipped.
    W200,

    /// Malformed attribute.
    ///
    /// A fragment inside an attribute list is not a `key=value` pair.
    W201,

    /// Incomplete edge.
    ///
    /// An edge operator is missing its source or target.
    W202,

    /// Unterminated construct.
    ///
    /// A quoted string or attribute list was opened but never closed.
    W203,

    /// Edge operator mismatch.
    ///
    /// `->` was used in an undirected graph or `--` in a directed graph.
    /// The edge is still created.
    W204,

    /// Unclosed graph body.
    ///
    /// The graph header opens a body with `{` that is never closed.
    W205,
}

impl ErrorCode {
    /// Returns the code as a static string (e.g., "W201").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::W200 => "W200",
            ErrorCode::W201 => "W201",
            ErrorCode::W202 => "W202",
            ErrorCode::W203 => "W203",
            ErrorCode::W204 => "W204",
            ErrorCode::W205 => "W205",
        }
    }

    /// Returns a short description of this code.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "empty input",
            ErrorCode::E101 => "unreadable input",
            ErrorCode::W200 => "unexpected token",
            ErrorCode::W201 => "malformed attribute",
            ErrorCode::W202 => "incomplete edge",
            ErrorCode::W203 => "unterminated construct",
            ErrorCode::W204 => "edge operator mismatch",
            ErrorCode::W205 => "unclosed graph body",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E100.to_string(), "E100");
        assert_eq!(ErrorCode::W204.to_string(), "W204");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E101.description(), "unreadable input");
        assert_eq!(ErrorCode::W201.description(), "malformed attribute");
    }
}
