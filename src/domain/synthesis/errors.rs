//! Synthesis Context - Errors

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SynthesisTextError {
    #[error("Please enter some text.")]
    Empty,

    #[error("Text is too long: {chars} characters (max {max})")]
    TooLong { chars: usize, max: usize },
}
