//! Real-time retargeting of motion-capture skeletal animation onto
//! differently-proportioned humanoid rigs.
//!
//! This crate is renderer- and host-agnostic: the host owns both joint
//! hierarchies and steps the engine once per simulation tick. Works with
//! Mixamo-style rigged characters in T-pose out of the box; other naming
//! conventions bind through explicit joint mappings.

#![forbid(unsafe_code)]

mod binder;
mod config;
mod error;
mod model;
mod runtime;

pub use binder::*;
pub use config::*;
pub use error::*;
pub use model::*;
pub use runtime::*;

#[cfg(test)]
mod binder_tests;
