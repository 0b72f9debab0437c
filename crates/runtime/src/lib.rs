pub mod debounce;
pub mod sequence;
pub mod timeline;
pub mod viewport;

pub use debounce::*;
pub use sequence::*;
pub use timeline::*;
pub use viewport::*;
