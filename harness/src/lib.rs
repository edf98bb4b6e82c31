//! Reconscore Harness: golden fixtures and serving-side plumbing for the kernel.
//!
//! The harness drives the kernel's scoring pipeline
//! (`load` → `evaluate`) over synthetic inputs, freezes the results as a
//! golden fixture set, and later re-verifies any pipeline implementation
//! against that set.
//!
//! The harness does NOT implement scoring; it delegates to the kernel.
//! It owns everything that touches the filesystem: artifact files, fixture
//! files, configuration, and the load-once model cache.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod artifact_file;
pub mod cache;
pub mod config;
pub mod fixture;
pub mod fixture_file;
pub mod generate;
pub mod verify;
