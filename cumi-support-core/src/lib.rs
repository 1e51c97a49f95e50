//! Core types for the CUMI live-support widget
//!
//! This crate provides the foundational types, configuration, and
//! conversation primitives used by all other cumi-support components.

pub mod config;
pub mod error;
pub mod logging;
pub mod session;

pub use error::{Error, Result};
