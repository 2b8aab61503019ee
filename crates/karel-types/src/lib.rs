//! Shared types for the Karel engine.
//!
//! This crate defines the grid world model, compass directions, source
//! line access and diagnostic types used across all engine stages.

mod direction;
mod error;
mod span;
mod world;

pub use direction::{Direction, ParseDirectionError};
pub use error::{Diagnostic, DiagnosticCode, Diagnostics, Severity, MAX_DIAGNOSTICS};
pub use span::SourceFile;
pub use world::{BeeperBag, BeeperPile, Pose, Position, Wall, World};
