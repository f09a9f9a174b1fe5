//! Repository modules implementing storage operations for all Scry entities.
//!
//! Each module adds methods to `ScryDb` via `impl ScryDb` blocks.

pub mod citation;
pub mod digest;
pub mod paper;
