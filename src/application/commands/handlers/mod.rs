//! Command Handlers 实现

mod slideshow_handlers;

pub use slideshow_handlers::*;
