//! Recording in-memory `Gateway` for service and resolver tests.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
};

use serenity::async_trait;

use crate::{
    error::{gateway::GatewayError, AppError},
    gateway::{card::Card, Gateway, MessageRef, Outgoing},
};

pub const MOCK_BOT_ID: u64 = 999;

#[derive(Default)]
struct Recorded {
    sent: Vec<(MessageRef, Outgoing)>,
    edits: Vec<(MessageRef, Card)>,
    markers: Vec<(MessageRef, String)>,
}

/// Gateway double that records every call and answers reactions from canned data.
///
/// Posted messages get increasing ids starting at 5000.
pub struct MockGateway {
    next_message_id: AtomicU64,
    reactors: HashMap<(u64, String), HashSet<u64>>,
    counts: HashMap<(u64, String), u64>,
    missing_channels: HashSet<u64>,
    fail_sends: bool,
    recorded: Mutex<Recorded>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            next_message_id: AtomicU64::new(5000),
            reactors: HashMap::new(),
            counts: HashMap::new(),
            missing_channels: HashSet::new(),
            fail_sends: false,
            recorded: Mutex::new(Recorded::default()),
        }
    }

    /// Users returned by `get_reactors` for `marker` on `message_id`.
    pub fn with_reactors(mut self, message_id: u64, marker: &str, users: &[u64]) -> Self {
        self.reactors.insert(
            (message_id, marker.to_string()),
            users.iter().copied().collect(),
        );
        self
    }

    /// Platform count returned by `count_reactions` for `marker` on `message_id`.
    pub fn with_count(mut self, message_id: u64, marker: &str, count: u64) -> Self {
        self.counts.insert((message_id, marker.to_string()), count);
        self
    }

    /// Makes `fetch_channel` report the channel as missing.
    pub fn with_missing_channel(mut self, channel_id: u64) -> Self {
        self.missing_channels.insert(channel_id);
        self
    }

    /// Makes every `send_message` fail with a permission error.
    pub fn failing_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    pub fn sent(&self) -> Vec<(MessageRef, Outgoing)> {
        self.recorded.lock().unwrap().sent.clone()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|(_, message)| match message {
                Outgoing::Text(text) => Some(text),
                Outgoing::Card(_) => None,
            })
            .collect()
    }

    pub fn sent_cards(&self) -> Vec<Card> {
        self.sent()
            .into_iter()
            .filter_map(|(_, message)| match message {
                Outgoing::Card(card) => Some(card),
                Outgoing::Text(_) => None,
            })
            .collect()
    }

    pub fn edits(&self) -> Vec<(MessageRef, Card)> {
        self.recorded.lock().unwrap().edits.clone()
    }

    pub fn markers(&self) -> Vec<(MessageRef, String)> {
        self.recorded.lock().unwrap().markers.clone()
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn send_message(
        &self,
        channel_id: u64,
        message: Outgoing,
    ) -> Result<MessageRef, AppError> {
        if self.fail_sends {
            return Err(GatewayError::Forbidden("Missing Access".to_string()).into());
        }
        if self.missing_channels.contains(&channel_id) {
            return Err(GatewayError::NotFound("Unknown Channel".to_string()).into());
        }

        let message_ref = MessageRef::new(
            channel_id,
            self.next_message_id.fetch_add(1, Ordering::SeqCst),
        );
        self.recorded.lock().unwrap().sent.push((message_ref, message));

        Ok(message_ref)
    }

    async fn edit_message(&self, message: MessageRef, card: Card) -> Result<(), AppError> {
        self.recorded.lock().unwrap().edits.push((message, card));
        Ok(())
    }

    async fn add_marker(&self, message: MessageRef, marker: &str) -> Result<(), AppError> {
        self.recorded
            .lock()
            .unwrap()
            .markers
            .push((message, marker.to_string()));
        Ok(())
    }

    async fn get_reactors(
        &self,
        message: MessageRef,
        marker: &str,
    ) -> Result<HashSet<u64>, AppError> {
        Ok(self
            .reactors
            .get(&(message.message_id, marker.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn count_reactions(&self, message: MessageRef, marker: &str) -> Result<u64, AppError> {
        Ok(self
            .counts
            .get(&(message.message_id, marker.to_string()))
            .copied()
            .unwrap_or(0))
    }

    async fn fetch_channel(&self, channel_id: u64) -> Result<(), AppError> {
        if self.missing_channels.contains(&channel_id) {
            return Err(GatewayError::NotFound("Unknown Channel".to_string()).into());
        }
        Ok(())
    }

    fn bot_user_id(&self) -> u64 {
        MOCK_BOT_ID
    }
}
