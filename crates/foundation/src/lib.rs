pub mod bounds;
pub mod time;
pub mod timescale;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use time::*;
