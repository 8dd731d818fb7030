//! Command implementations for the modfold CLI

pub mod clean;
pub mod completions;
pub mod helpers;
pub mod inspect;
pub mod process;
pub mod version;
