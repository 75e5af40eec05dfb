//! Stereo block-processing graph.
//!
//! Effect processors implement [`node::GraphNode`] and are wired in series by
//! the effects rack. The rack's final stage hands its block to an
//! [`output::OutputSink`], the single downstream connection point.

/// Core traits shared by all graph nodes.
pub mod node;
/// Downstream connection point for the rendered stereo signal.
pub mod output;

pub use node::{GraphNode, RenderCtx};
pub use output::OutputSink;
