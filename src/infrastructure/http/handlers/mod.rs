//! HTTP Handlers

mod library;
mod passthrough;
mod ping;
mod slideshow;

pub use library::*;
pub use passthrough::*;
pub use ping::*;
pub use slideshow::*;
