//! Helper functions for templates and generated paths

mod date;
mod url;

pub use date::*;
pub use url::*;
