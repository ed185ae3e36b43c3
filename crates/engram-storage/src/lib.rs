//! Engram Storage - Reference backends for the memory partitions
//!
//! Three in-process implementations of the `MessageStore` contract:
//! - `InMemoryMessageStore`: concurrent id-keyed map, no ordering guarantees
//! - `LongTermMessageStore`: same map, descending-time fetch ordering
//! - `ShortTermStore`: per-conversation windows with FIFO trim and TTL expiry
//!
//! All stores are individually thread-safe; callers never need external
//! locking.

pub mod long_term;
pub mod message_store;
pub mod short_term;

pub use long_term::LongTermMessageStore;
pub use message_store::InMemoryMessageStore;
pub use short_term::{ShortTermConfig, ShortTermStore};
