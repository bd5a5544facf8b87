//! Integration tests for validation and gating.
//!
//! These tests run the classifier over fixture files and drive the load
//! gate against real files on disk.

mod binary;
mod gate;
mod text;
