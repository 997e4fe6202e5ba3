//! The data-to-chart pipeline stages.
//!
//! Each stage is a plain function over a [`JsonSource`](crate::http::JsonSource)
//! or over already-fetched records. None of them touch session state; the
//! [`session`](crate::session) module decides when a stage's output is applied.
//!
//! ```text
//! discover ──▶ (pick endpoint) ──▶ fetch ──▶ infer_schema ──▶ (pick columns) ──▶ chart::configure
//! ```

pub mod discover;
pub mod fetch;
pub mod schema;

pub use discover::{discover, endpoints_from_body};
pub use fetch::{fetch, normalize_body};
pub use schema::infer_schema;
