//! apichart: point at a JSON API, discover its resources, fetch one, and
//! chart the columns you pick.
//!
//! The pipeline runs leaf-first:
//!
//! 1. [`pipeline::discover`] lists the sub-resources of a base URL
//! 2. [`pipeline::fetch`] normalizes one sub-resource into [`record::Record`]s
//! 3. [`pipeline::infer_schema`] names the columns
//! 4. [`chart::configure`] derives series colors and the Y bound
//! 5. a renderer draws a [`chart::ChartView`]
//!
//! [`session::Session`] ties the steps together for interactive use.

pub mod chart;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod http;
pub mod pipeline;
pub mod record;
pub mod session;
pub mod web;
