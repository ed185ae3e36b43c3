//! Short-term conversation store - bounded recent history per conversation.
//!
//! Messages are grouped by conversation id. Each conversation keeps at most
//! `max_messages` items (FIFO eviction by arrival order, not timestamp) and
//! the whole conversation expires once nothing has been written to it for
//! `ttl` (measured from last write).
//!
//! Appends are linearizable per conversation key: the concurrent map's entry
//! API gives a writer exclusive access to one conversation's window, so
//! concurrent appends to the same conversation cannot lose updates during
//! trimming.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;

use engram_traits::error::Result;
use engram_traits::message::Message;
use engram_traits::query::MemoryQuery;
use engram_traits::store::MessageStore;

/// Default per-conversation message cap
pub const DEFAULT_MAX_MESSAGES: usize = 10;

/// Default conversation time-to-live (24 hours)
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Capacity policy for the short-term partition.
#[derive(Debug, Clone)]
pub struct ShortTermConfig {
    /// Maximum messages retained per conversation
    pub max_messages: usize,
    /// Conversation expiry measured from last write
    pub ttl: Duration,
}

impl Default for ShortTermConfig {
    fn default() -> Self {
        Self {
            max_messages: DEFAULT_MAX_MESSAGES,
            ttl: DEFAULT_TTL,
        }
    }
}

impl ShortTermConfig {
    pub fn with_max_messages(mut self, max_messages: usize) -> Self {
        self.max_messages = max_messages;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

#[derive(Debug)]
struct ConversationWindow {
    messages: VecDeque<Message>,
    last_write: DateTime<Utc>,
}

impl ConversationWindow {
    fn new() -> Self {
        Self {
            messages: VecDeque::new(),
            last_write: Utc::now(),
        }
    }
}

/// Short-term `MessageStore` keyed by conversation id.
#[derive(Debug)]
pub struct ShortTermStore {
    conversations: DashMap<String, ConversationWindow>,
    config: ShortTermConfig,
}

impl Default for ShortTermStore {
    fn default() -> Self {
        Self::new(ShortTermConfig::default())
    }
}

impl ShortTermStore {
    pub fn new(config: ShortTermConfig) -> Self {
        Self {
            conversations: DashMap::new(),
            config,
        }
    }

    /// Most recent messages for one conversation, oldest first, capped at
    /// `limit` (`0` ⇒ the whole retained window).
    pub fn get(&self, conversation_id: &str, limit: usize) -> Vec<Message> {
        self.purge_expired();
        let Some(window) = self.conversations.get(conversation_id) else {
            return Vec::new();
        };
        let messages = &window.messages;
        let skip = if limit > 0 {
            messages.len().saturating_sub(limit)
        } else {
            0
        };
        messages.iter().skip(skip).cloned().collect()
    }

    /// Number of conversations currently retained.
    pub fn conversation_count(&self) -> usize {
        self.conversations.len()
    }

    /// Drop conversations whose last write is older than the TTL.
    fn purge_expired(&self) {
        let Ok(ttl) = chrono::Duration::from_std(self.config.ttl) else {
            return;
        };
        let cutoff = Utc::now() - ttl;
        self.conversations.retain(|conversation_id, window| {
            let keep = window.last_write >= cutoff;
            if !keep {
                debug!(conversation_id, "Expiring idle conversation");
            }
            keep
        });
    }
}

impl MessageStore for ShortTermStore {
    fn save(&self, message: Message) -> Result<Message> {
        self.purge_expired();

        let mut window = self
            .conversations
            .entry(message.conversation_id.clone())
            .or_insert_with(ConversationWindow::new);
        window.messages.push_back(message.clone());
        window.last_write = Utc::now();

        // FIFO trim by arrival order
        let max = self.config.max_messages;
        while max > 0 && window.messages.len() > max {
            window.messages.pop_front();
        }

        Ok(message)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Message>> {
        for window in self.conversations.iter() {
            if let Some(found) = window.messages.iter().find(|m| m.id == id) {
                return Ok(Some(found.clone()));
            }
        }
        Ok(None)
    }

    fn delete_by_id(&self, id: &str) -> Result<bool> {
        for mut window in self.conversations.iter_mut() {
            if let Some(idx) = window.messages.iter().position(|m| m.id == id) {
                window.messages.remove(idx);
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn delete_all(&self) -> Result<()> {
        self.conversations.clear();
        Ok(())
    }

    fn count(&self) -> Result<usize> {
        Ok(self
            .conversations
            .iter()
            .map(|window| window.messages.len())
            .sum())
    }

    fn fetch_candidates(&self, query: &MemoryQuery) -> Result<Vec<Message>> {
        self.purge_expired();

        let mut matched = Vec::new();
        for window in self.conversations.iter() {
            matched.extend(
                window
                    .messages
                    .iter()
                    .filter(|m| query.expression.evaluate(m))
                    .cloned(),
            );
        }
        if query.limit > 0 {
            matched.truncate(query.limit);
        }
        Ok(matched)
    }
}
