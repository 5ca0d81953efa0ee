//! Filter expression engine boundary.
//!
//! The codec only needs to know whether a filter string compiles. It asks a
//! [`FilterValidator`], so callers and tests can plug in their own engine.
//! [`EventFilterSyntax`] is the built-in one, backed by [`EventFilter::parse`].

pub mod lexer;
pub mod parser;

pub use lexer::CompareOp;
pub use parser::EventFilter;

use crate::error::FilterSyntaxError;

/// Compiles filter strings on behalf of the codec.
pub trait FilterValidator {
    /// Returns an error if `filter` is not a valid expression.
    fn validate(&self, filter: &str) -> Result<(), FilterSyntaxError>;
}

impl<F> FilterValidator for F
where
    F: Fn(&str) -> Result<(), FilterSyntaxError>,
{
    fn validate(&self, filter: &str) -> Result<(), FilterSyntaxError> {
        self(filter)
    }
}

/// Validator for the event filter language.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventFilterSyntax;

impl FilterValidator for EventFilterSyntax {
    fn validate(&self, filter: &str) -> Result<(), FilterSyntaxError> {
        EventFilter::parse(filter).map(|_| ())
    }
}
