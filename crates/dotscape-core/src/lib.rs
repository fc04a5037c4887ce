//! Dotscape Core Types and Definitions
//!
//! This crate provides the foundational types shared by every Dotscape crate:
//!
//! - **Geometry**: Points, sizes and bounds ([`geometry`] module)
//! - **Model**: The node/edge graph produced by the parser and positioned by
//!   the layout engine ([`model`] module)

pub mod geometry;
pub mod model;
