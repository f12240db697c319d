//! Domain models for the Waikane flood data server.
//!
//! - [`Artifact`]: one of the four JSON datasets the notebook produces and the
//!   server hands out unchanged.

mod artifact;

pub use artifact::*;
