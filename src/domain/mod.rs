//! Domain models for modfold
//!
//! This module contains pure domain objects representing core business entities.
//! These types are free of I/O and carry the naming rules shared across the pipeline.

pub mod module;

pub use module::{Manifest, ModuleDescriptor, ModuleKind};
