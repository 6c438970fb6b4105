//! TTL cache for expensive per-document loads.

mod clock;
mod lock;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::TtlCache;
