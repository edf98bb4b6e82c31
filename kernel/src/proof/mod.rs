//! Proof module: canonical JSON and domain-separated hashing.
//!
//! Depends on nothing else in the kernel. `artifact` uses it for model
//! digests; the harness uses it for fixture-set digests.

pub mod canon;
pub mod hash;
pub mod hash_domain;
