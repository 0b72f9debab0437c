//! Client side of the explorer: the per-view session, the async loop that
//! drives it, and the transport to the relay.

pub mod driver;
pub mod map_slot;
pub mod session;
pub mod transport;

pub use driver::{drive, ViewEvent};
pub use map_slot::{MapSlot, MapSlotError};
pub use session::{Completion, ExplorerSession, PendingQuery};
pub use transport::{BoxFuture, FetchError, HttpTransport, QueryTransport};
