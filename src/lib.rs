//! Human-gated Python code execution tool.
//!
//! An orchestrating agent hands over raw code text; the crate strips
//! markdown formatting, shows the result to a human operator, and only runs
//! it in a fresh interpreter process (under a wall-clock deadline) after an
//! explicit confirmation. The single report string returned to the
//! orchestrator distinguishes "not run" from "ran but produced nothing"
//! from "ran and failed".

pub mod cli;
pub mod config;
pub mod executor;
pub mod normalizer;
pub mod printer;
pub mod tool;
