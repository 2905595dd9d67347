//! Topic/subscription messaging with explicit acknowledgment.
//!
//! Delivery is at-least-once: a message stays in flight until it is acked, and a
//! nack puts it back at the head of the backlog for redelivery.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Notify;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One delivery attempt of a published message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub message_id: MessageId,
    pub payload: Vec<u8>,
    /// Starts at 1 and grows with every nack.
    pub attempt: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    #[error("topic '{0}' does not exist")]
    UnknownTopic(String),
    #[error("subscription '{subscription}' is bound to topic '{topic}'")]
    SubscriptionMismatch { subscription: String, topic: String },
    #[error("message {id} is not in flight on subscription '{subscription}'")]
    NotInFlight { subscription: String, id: MessageId },
    #[error("broker is closed")]
    Closed,
    #[error("broker unavailable: {0}")]
    Unavailable(String),
}

/// Publishing side of the broker.
pub trait MessageBroker: Send + Sync {
    fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<MessageId, BrokerError>;
}

/// Pull-based consumer bound to a topic.
#[async_trait]
pub trait Subscription: Send + Sync {
    fn name(&self) -> &str;
    /// Wait for the next message. `None` once the broker is closed and the backlog is drained.
    async fn receive(&self) -> Option<Delivery>;
    fn ack(&self, id: MessageId) -> Result<(), BrokerError>;
    fn nack(&self, id: MessageId) -> Result<(), BrokerError>;
}

/// Counters exposed for diagnostics and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubscriptionStats {
    pub pending: usize,
    pub in_flight: usize,
    pub acknowledged: u64,
    pub delivered: u64,
}

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<Delivery>,
    in_flight: HashMap<MessageId, Delivery>,
    acknowledged: u64,
    delivered: u64,
    closed: bool,
}

#[derive(Debug)]
struct SubscriptionQueue {
    name: String,
    topic: String,
    state: Mutex<QueueState>,
    notify: Notify,
}

impl SubscriptionQueue {
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn enqueue(&self, delivery: Delivery) {
        self.lock().pending.push_back(delivery);
        self.notify.notify_one();
    }

    fn close(&self) {
        self.lock().closed = true;
        self.notify.notify_waiters();
    }

    fn not_in_flight(&self, id: MessageId) -> BrokerError {
        BrokerError::NotInFlight {
            subscription: self.name.clone(),
            id,
        }
    }
}

#[derive(Debug, Default)]
struct BrokerState {
    topics: HashMap<String, Vec<Arc<SubscriptionQueue>>>,
    subscriptions: HashMap<String, Arc<SubscriptionQueue>>,
    next_id: u64,
    closed: bool,
}

/// Process-local broker. Every subscription on a topic receives its own copy.
#[derive(Debug, Default, Clone)]
pub struct InMemoryBroker {
    state: Arc<Mutex<BrokerState>>,
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BrokerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create_topic(&self, topic: &str) {
        self.lock().topics.entry(topic.to_string()).or_default();
    }

    /// Create the named subscription on `topic`, or reattach to it if it exists.
    pub fn subscribe(&self, topic: &str, name: &str) -> Result<InMemorySubscription, BrokerError> {
        let mut state = self.lock();
        if state.closed {
            return Err(BrokerError::Closed);
        }

        if let Some(queue) = state.subscriptions.get(name) {
            if queue.topic != topic {
                return Err(BrokerError::SubscriptionMismatch {
                    subscription: name.to_string(),
                    topic: queue.topic.clone(),
                });
            }
            return Ok(InMemorySubscription {
                queue: Arc::clone(queue),
            });
        }

        let queue = Arc::new(SubscriptionQueue {
            name: name.to_string(),
            topic: topic.to_string(),
            state: Mutex::new(QueueState::default()),
            notify: Notify::new(),
        });
        state
            .topics
            .get_mut(topic)
            .ok_or_else(|| BrokerError::UnknownTopic(topic.to_string()))?
            .push(Arc::clone(&queue));
        state.subscriptions.insert(name.to_string(), Arc::clone(&queue));

        Ok(InMemorySubscription { queue })
    }

    /// Stop accepting publishes and release receivers once their backlog drains.
    pub fn close(&self) {
        let queues: Vec<Arc<SubscriptionQueue>> = {
            let mut state = self.lock();
            state.closed = true;
            state.subscriptions.values().cloned().collect()
        };
        for queue in queues {
            queue.close();
        }
    }

    pub fn stats(&self, subscription: &str) -> Option<SubscriptionStats> {
        let queue = self.lock().subscriptions.get(subscription).cloned()?;
        Some(InMemorySubscription { queue }.stats())
    }
}

impl MessageBroker for InMemoryBroker {
    fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<MessageId, BrokerError> {
        let (message_id, queues) = {
            let mut state = self.lock();
            if state.closed {
                return Err(BrokerError::Closed);
            }
            let queues = state
                .topics
                .get(topic)
                .cloned()
                .ok_or_else(|| BrokerError::UnknownTopic(topic.to_string()))?;
            state.next_id += 1;
            (MessageId(state.next_id), queues)
        };

        for queue in &queues {
            queue.enqueue(Delivery {
                message_id,
                payload: payload.clone(),
                attempt: 1,
            });
        }

        debug!(%message_id, topic, subscribers = queues.len(), "message published");
        Ok(message_id)
    }
}

/// Handle on one named subscription of an [`InMemoryBroker`].
#[derive(Debug, Clone)]
pub struct InMemorySubscription {
    queue: Arc<SubscriptionQueue>,
}

impl InMemorySubscription {
    pub fn stats(&self) -> SubscriptionStats {
        let state = self.queue.lock();
        SubscriptionStats {
            pending: state.pending.len(),
            in_flight: state.in_flight.len(),
            acknowledged: state.acknowledged,
            delivered: state.delivered,
        }
    }

    /// Take the next message if one is ready, without waiting.
    pub fn try_receive(&self) -> Option<Delivery> {
        let mut state = self.queue.lock();
        let delivery = state.pending.pop_front()?;
        state.delivered += 1;
        state
            .in_flight
            .insert(delivery.message_id, delivery.clone());
        Some(delivery)
    }
}

#[async_trait]
impl Subscription for InMemorySubscription {
    fn name(&self) -> &str {
        &self.queue.name
    }

    async fn receive(&self) -> Option<Delivery> {
        loop {
            let notified = self.queue.notify.notified();
            if let Some(delivery) = self.try_receive() {
                return Some(delivery);
            }
            if self.queue.lock().closed {
                return None;
            }
            notified.await;
        }
    }

    fn ack(&self, id: MessageId) -> Result<(), BrokerError> {
        let mut state = self.queue.lock();
        state
            .in_flight
            .remove(&id)
            .ok_or_else(|| self.queue.not_in_flight(id))?;
        state.acknowledged += 1;
        Ok(())
    }

    fn nack(&self, id: MessageId) -> Result<(), BrokerError> {
        {
            let mut state = self.queue.lock();
            let mut delivery = state
                .in_flight
                .remove(&id)
                .ok_or_else(|| self.queue.not_in_flight(id))?;
            delivery.attempt += 1;
            state.pending.push_front(delivery);
        }
        self.queue.notify.notify_one();
        Ok(())
    }
}
