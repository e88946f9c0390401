//! smartbot - contextual bandit core for a SMART Recovery companion.
//!
//! Recommends one of a fixed set of coping tools from a numeric context
//! vector (LinUCB) and learns from user feedback.

pub mod app;
pub mod bandit;
pub mod cli;
pub mod config;
pub mod error;
#[cfg(test)]
pub mod test_utils;

pub use error::{Result, SmartbotError};
