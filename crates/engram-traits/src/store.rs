//! Persistence contract for memory partitions
//!
//! Every memory partition binds to one `MessageStore`. Implementations must
//! be individually thread-safe: the memory manager layers no locking of its
//! own on top of them. Side effects are confined to the store instance; one
//! store never observes another's writes.

use crate::error::Result;
use crate::message::Message;
use crate::query::MemoryQuery;

/// CRUD plus filtered fetch over stored messages.
pub trait MessageStore: Send + Sync {
    /// Persist one message, returning the stored value.
    fn save(&self, message: Message) -> Result<Message>;

    /// Persist a batch; an empty input is a no-op returning an empty batch.
    fn save_all(&self, messages: Vec<Message>) -> Result<Vec<Message>> {
        messages.into_iter().map(|m| self.save(m)).collect()
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Message>>;

    /// Returns `true` iff something was removed.
    fn delete_by_id(&self, id: &str) -> Result<bool>;

    /// Remove every message held by this store.
    fn delete_all(&self) -> Result<()>;

    fn count(&self) -> Result<usize>;

    /// Filter the full store by `query.expression`, then truncate to
    /// `query.limit` (`0` ⇒ unlimited). Result order is unspecified unless
    /// the implementation documents otherwise.
    fn fetch_candidates(&self, query: &MemoryQuery) -> Result<Vec<Message>>;
}
