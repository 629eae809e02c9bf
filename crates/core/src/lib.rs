//! Schema-driven form filling: declare fields, collect them from an operator
//! until every value validates, and render the result into a document.

pub mod config;
pub mod engine;
pub mod markers;
pub mod schema;
pub mod templates;
pub mod words;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
