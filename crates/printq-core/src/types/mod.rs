//! Core type definitions used across the PrintQ workspace.

pub mod id;

pub use id::*;
