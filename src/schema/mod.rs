//! Schema module - data model for pipeline composition.
//!
//! Node and topology types, dataset handles and run configuration. The
//! types here carry no behaviour of their own: sampling lives in
//! `composer` and model semantics live in `models`.

mod config;
mod dataset;
mod node;
mod pipeline;

pub use config::*;
pub use dataset::*;
pub use node::*;
pub use pipeline::*;
