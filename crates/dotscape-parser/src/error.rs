//! Error and diagnostic system for the Dotscape parser.
//!
//! Parsing is best effort: malformed fragments are skipped and reported as
//! warnings, and only empty or unreadable input is an error.
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning with an optional code, labeled source spans and
//! help text. Fatal diagnostics are wrapped in [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use dotscape_parser::error::{Diagnostic, ErrorCode};
//! # use dotscape_parser::Span;
//!
//! let diag = Diagnostic::warning("malformed attribute `=red`")
//!     .with_code(ErrorCode::W201)
//!     .with_label(Span::new(12..16), "skipped")
//!     .with_help("attributes are written as key=value");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
