//! Story Context - Errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoryError {
    #[error("Empty story: no slides to show")]
    Empty,

    #[error("Empty paragraph at slide {0}")]
    EmptyParagraph(usize),
}
