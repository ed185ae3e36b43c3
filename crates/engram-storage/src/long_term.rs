//! Long-term message store - descending-time reference backend.
//!
//! Stand-in for a document-store backend. Differs from
//! `InMemoryMessageStore` only in its fetch contract: candidates come back
//! newest first before the limit is applied, which is what long-term
//! retrieval callers rely on.

use dashmap::DashMap;

use engram_traits::error::Result;
use engram_traits::message::Message;
use engram_traits::query::MemoryQuery;
use engram_traits::store::MessageStore;

/// Long-term `MessageStore` with descending-timestamp fetch ordering.
#[derive(Debug, Default)]
pub struct LongTermMessageStore {
    messages: DashMap<String, Message>,
}

impl LongTermMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MessageStore for LongTermMessageStore {
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

        // Newest first, then truncate, so the limit keeps the most recent.
        matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        if query.limit > 0 {
            matched.truncate(query.limit);
        }
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_fetch_orders_newest_first() {
        let store = LongTermMessageStore::new();
        let base = Utc::now();
        for i in 0..4 {
            store
                .save(
                    Message::builder("conv-1")
                        .id(format!("m-{i}"))
                        .timestamp(base + Duration::seconds(i))
                        .build(),
                )
                .unwrap();
        }

        let matched = store.fetch_candidates(&MemoryQuery::all(2)).unwrap();
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].id, "m-3");
        assert_eq!(matched[1].id, "m-2");
    }
}
