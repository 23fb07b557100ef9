//! Core pipeline orchestration and state for NeuralStack.
//!
//! This crate ties together discovery, content generation, validation, and
//! distribution into a single recorded pass (see [`pipeline::run_pipeline`]),
//! and owns the on-disk ledgers in [`store`].

pub mod discovery;
pub mod distribution;
pub mod pipeline;
pub mod store;
pub mod validation;
