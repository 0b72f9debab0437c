//! Translation between view state and the upstream SPARQL service.
//!
//! - [`template`]: validated parameters rendered into the fixed query text
//! - [`results`]: SPARQL JSON bindings parsed into typed records
//! - [`geometry`]: WKT point literals

pub mod geometry;
pub mod results;
pub mod template;

pub use geometry::*;
pub use results::*;
pub use template::*;
