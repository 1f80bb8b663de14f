//! Runtime utilities shared across Eventline crates.
//!
//! This crate carries the pieces with no event-domain knowledge:
//! - `cache`: the request-keyed cache with single-flight recomputation and
//!   failure-tolerant expiry extension
//! - `time`: the clock abstraction used for deterministic time-based tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod cache;
pub mod time;
