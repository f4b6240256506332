//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod backend;
pub mod library;
pub mod openai;

pub use backend::*;
pub use library::*;
pub use openai::*;
