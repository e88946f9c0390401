//! E2E test suite entry point.

#[path = "../common/mod.rs"]
mod common;
mod explain_workflow;
mod learning_workflow;
mod persistence_workflow;
