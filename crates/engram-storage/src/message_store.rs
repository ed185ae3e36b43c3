//! In-memory message store - concurrent id-keyed reference backend.

use dashmap::DashMap;

use engram_traits::error::Result;
use engram_traits::message::Message;
use engram_traits::query::MemoryQuery;
use engram_traits::store::MessageStore;

/// Reference `MessageStore` over a concurrent map keyed by message id.
///
/// Filtering iterates the full map, so candidate order is unspecified.
#[derive(Debug, Default)]
pub struct InMemoryMessageStore {
    messages: DashMap<String, Message>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageStore for InMemoryMessageStore {
    fn save(&self, message: Message) -> Result<Message> {
        self.messages.insert(message.id.clone(), message.clone());
        Ok(message)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Message>> {
        Ok(self.messages.get(id).map(|entry| entry.value().clone()))
    }

    fn delete_by_id(&self, id: &str) -> Result<bool> {
        Ok(self.messages.remove(id).is_some())
    }

    fn delete_all(&self) -> Result<()> {
        self.messages.clear();
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.messages.len())
    }

    fn fetch_candidates(&self, query: &MemoryQuery) -> Result<Vec<Message>> {
        let mut matched: Vec<Message> = self
            .messages
            .iter()
            .filter(|entry| query.expression.evaluate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        if query.limit > 0 {
            matched.truncate(query.limit);
        }
        Ok(matched)
    }
}
