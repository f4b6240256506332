//! Query Handlers 实现

mod library_handlers;
mod slideshow_handlers;

pub use library_handlers::*;
pub use slideshow_handlers::*;
