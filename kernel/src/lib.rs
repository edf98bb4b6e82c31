//! Reconscore Kernel: the deterministic scoring core.
//!
//! # API Surface
//!
//! - [`artifact::load::load`] -- parse and validate artifact bytes into an immutable [`artifact::model::Model`]
//! - [`contract::validate`] -- check an ordered feature-name list against a model's contract
//! - [`score::scorer::score`] -- residual magnitude of a feature vector under a model
//! - [`score::classify::classify`] -- strict threshold decision on a residual
//! - [`score::evaluate`] -- score + classify in one call (and [`score::evaluate_named`] for labelled input)
//!
//! # Module Dependency Direction
//!
//! `proof` ← `artifact` ← `contract` ← `score`
//!
//! One-way only. `proof` depends on nothing internal. Nothing in the kernel
//! touches the filesystem or holds global state: callers thread a `&Model`
//! (usually behind an `Arc`) through every call.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod artifact;
pub mod contract;
pub mod proof;
pub mod score;
