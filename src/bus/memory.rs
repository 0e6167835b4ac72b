//! In-memory event bus backend.
//!
//! One reader/writer lock guards the subscriber registry. `publish` holds it
//! in shared mode only long enough to snapshot a topic's subscriber list;
//! delivery attempts run as independent spawned tasks outside the critical
//! section. `subscribe` and `close` take the exclusive lock briefly to mutate
//! the registry.

use std::collections::HashMap;
use tokio::sync::{mpsc, RwLock};
use tokio_util::sync::CancellationToken;

use super::{Event, EventBus, EventHandler, SubscriptionOptions};
use crate::types::{BusConfig, Error, Result, SubscriberId};

/// An event in flight to one subscriber, paired with the publisher's token.
type Delivery = (CancellationToken, Event);

/// A registered subscriber: its id and the sending half of its bounded
/// inbound queue. The receiving half lives in the dispatch task.
#[derive(Debug)]
struct SubscriberEntry {
    id: SubscriberId,
    tx: mpsc::Sender<Delivery>,
}

#[derive(Debug, Default)]
struct BusState {
    topics: HashMap<String, Vec<SubscriberEntry>>,
    closed: bool,
}

/// Process-local pub/sub broker.
///
/// Once closed the bus is terminal: publish, subscribe, and close all fail.
#[derive(Debug)]
pub struct MemoryEventBus {
    state: RwLock<BusState>,
    queue_capacity: usize,
}

impl MemoryEventBus {
    /// Create a bus with the given per-subscriber queue capacity (min 1).
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            state: RwLock::new(BusState::default()),
            queue_capacity: queue_capacity.max(1),
        }
    }

    pub fn from_config(config: &BusConfig) -> Self {
        Self::new(config.subscriber_queue_capacity)
    }
}

impl Default for MemoryEventBus {
    fn default() -> Self {
        Self::from_config(&BusConfig::default())
    }
}

#[async_trait::async_trait]
impl EventBus for MemoryEventBus {
    async fn publish(&self, cancel: &CancellationToken, topic: &str, event: Event) -> Result<()> {
        event.validate()?;
        if topic.is_empty() {
            return Err(Error::validation("topic must not be empty"));
        }

        // Shared lock only to snapshot the subscriber list; concurrent
        // publishes do not serialize on each other.
        let senders: Vec<(SubscriberId, mpsc::Sender<Delivery>)> = {
            let state = self.state.read().await;
            if state.closed {
                return Err(Error::BusClosed);
            }
            state
                .topics
                .get(topic)
                .map(|subs| {
                    subs.iter()
                        .map(|s| (s.id.clone(), s.tx.clone()))
                        .collect()
                })
                .unwrap_or_default()
        };

        tracing::debug!(
            topic,
            event_id = %event.id,
            subscribers = senders.len(),
            "publishing event"
        );

        for (sub_id, tx) in senders {
            let cancel = cancel.clone();
            let event = event.clone();
            // Each delivery attempt is independent: it blocks on a full
            // queue until space frees or the publisher's token fires,
            // whichever comes first. A cancelled or rejected delivery is
            // invisible to the publisher.
            tokio::spawn(async move {
                tokio::select! {
                    sent = tx.send((cancel.clone(), event)) => {
                        if sent.is_err() {
                            tracing::debug!(subscriber = %sub_id, "subscriber queue closed, event dropped");
                        }
                    }
                    _ = cancel.cancelled() => {
                        tracing::debug!(subscriber = %sub_id, "publish cancelled, event dropped");
                    }
                }
            });
        }

        Ok(())
    }

    async fn subscribe(
        &self,
        topic: &str,
        handler: EventHandler,
        opts: SubscriptionOptions,
    ) -> Result<SubscriberId> {
        let (tx, mut rx) = mpsc::channel::<Delivery>(self.queue_capacity);
        let id = SubscriberId::new();

        {
            let mut state = self.state.write().await;
            if state.closed {
                return Err(Error::BusClosed);
            }
            state
                .topics
                .entry(topic.to_string())
                .or_default()
                .push(SubscriberEntry {
                    id: id.clone(),
                    tx,
                });
        }

        tracing::debug!(
            topic,
            subscriber = %id,
            group = opts.group.as_deref().unwrap_or(""),
            name = opts.name.as_deref().unwrap_or(""),
            "subscriber registered"
        );

        // One dispatch task per subscriber: strictly in-order delivery, and
        // a handler that blocks stalls only this subscriber. The task exits
        // once the queue is closed and drained.
        let task_id = id.clone();
        let task_topic = topic.to_string();
        tokio::spawn(async move {
            while let Some((cancel, event)) = rx.recv().await {
                handler(cancel, event).await;
            }
            tracing::debug!(topic = %task_topic, subscriber = %task_id, "dispatch task exited");
        });

        Ok(id)
    }

    async fn close(&self) -> Result<()> {
        let mut state = self.state.write().await;
        if state.closed {
            return Err(Error::BusClosed);
        }
        state.closed = true;
        // Dropping the senders closes each subscriber's queue; dispatch
        // tasks drain whatever is buffered and then exit.
        state.topics.clear();
        tracing::info!("event bus closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::{Mutex, Semaphore};
    use tokio::time::{sleep, timeout};

    /// Handler that appends event ids to a shared log.
    fn collecting_handler() -> (EventHandler, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        let handler: EventHandler = Arc::new(move |_cancel, event: Event| {
            let log = log.clone();
            Box::pin(async move {
                log.lock().await.push(event.id.clone());
            })
        });
        (handler, seen)
    }

    /// Handler that consumes one gate permit before recording each event.
    fn gated_handler(gate: Arc<Semaphore>) -> (EventHandler, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        let handler: EventHandler = Arc::new(move |_cancel, event: Event| {
            let log = log.clone();
            let gate = gate.clone();
            Box::pin(async move {
                gate.acquire().await.expect("gate closed").forget();
                log.lock().await.push(event.id.clone());
            })
        });
        (handler, seen)
    }

    async fn wait_for_len(seen: &Arc<Mutex<Vec<String>>>, n: usize) {
        timeout(Duration::from_secs(2), async {
            loop {
                if seen.lock().await.len() >= n {
                    break;
                }
                sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("timed out waiting for deliveries");
    }

    #[tokio::test]
    async fn publish_to_zero_subscribers_is_noop() {
        let bus = MemoryEventBus::default();
        let cancel = CancellationToken::new();
        let event = Event::new("test.event", "tests");

        bus.publish(&cancel, "test.event", event).await.unwrap();
    }

    #[tokio::test]
    async fn publish_rejects_invalid_event() {
        let bus = MemoryEventBus::default();
        let cancel = CancellationToken::new();

        let mut event = Event::new("test.event", "tests");
        event.id = String::new();
        let err = bus.publish(&cancel, "test.event", event).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = bus
            .publish(&cancel, "", Event::new("test.event", "tests"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn subscriber_sees_events_in_publish_order() {
        let bus = MemoryEventBus::default();
        let cancel = CancellationToken::new();
        let (handler, seen) = collecting_handler();

        bus.subscribe("orders", handler, SubscriptionOptions::new())
            .await
            .unwrap();

        let mut expected = Vec::new();
        for _ in 0..3 {
            let event = Event::new("orders", "tests");
            expected.push(event.id.clone());
            bus.publish(&cancel, "orders", event).await.unwrap();
            // Let the delivery task enqueue before the next publish so
            // arrival order is deterministic.
            wait_for_len(&seen, expected.len()).await;
        }

        assert_eq!(*seen.lock().await, expected);
    }

    #[tokio::test]
    async fn fan_out_reaches_all_subscribers() {
        let bus = MemoryEventBus::default();
        let cancel = CancellationToken::new();
        let (h1, seen1) = collecting_handler();
        let (h2, seen2) = collecting_handler();

        bus.subscribe("orders", h1, SubscriptionOptions::new().with_name("a"))
            .await
            .unwrap();
        bus.subscribe("orders", h2, SubscriptionOptions::new().with_name("b"))
            .await
            .unwrap();

        bus.publish(&cancel, "orders", Event::new("orders", "tests"))
            .await
            .unwrap();

        wait_for_len(&seen1, 1).await;
        wait_for_len(&seen2, 1).await;
    }

    #[tokio::test]
    async fn topics_are_isolated() {
        let bus = MemoryEventBus::default();
        let cancel = CancellationToken::new();
        let (handler, seen) = collecting_handler();

        bus.subscribe("orders", handler, SubscriptionOptions::new())
            .await
            .unwrap();

        bus.publish(&cancel, "payments", Event::new("payments", "tests"))
            .await
            .unwrap();
        sleep(Duration::from_millis(50)).await;

        assert!(seen.lock().await.is_empty());
    }

    #[tokio::test]
    async fn cancelled_publish_with_full_queue_drops_event() {
        // Capacity 1, and a gated handler keeping the dispatch task busy.
        let bus = MemoryEventBus::new(1);
        let gate = Arc::new(Semaphore::new(0));
        let (handler, seen) = gated_handler(gate.clone());
        let cancel = CancellationToken::new();

        bus.subscribe("orders", handler, SubscriptionOptions::new())
            .await
            .unwrap();

        // First event is pulled by the dispatch task and parks in the
        // handler; second fills the queue.
        let e1 = Event::new("orders", "tests");
        let e2 = Event::new("orders", "tests");
        let expected = vec![e1.id.clone(), e2.id.clone()];
        bus.publish(&cancel, "orders", e1).await.unwrap();
        bus.publish(&cancel, "orders", e2).await.unwrap();
        sleep(Duration::from_millis(50)).await;

        // Queue is full and the token is already cancelled: publish still
        // returns promptly and the event is silently dropped.
        let cancelled = CancellationToken::new();
        cancelled.cancel();
        let dropped = Event::new("orders", "tests");
        timeout(
            Duration::from_millis(500),
            bus.publish(&cancelled, "orders", dropped),
        )
        .await
        .expect("publish must not block")
        .unwrap();

        // Release the handler; only the first two events were delivered.
        gate.add_permits(2);
        wait_for_len(&seen, 2).await;
        sleep(Duration::from_millis(50)).await;
        assert_eq!(*seen.lock().await, expected);
    }

    #[tokio::test]
    async fn publish_after_close_fails() {
        let bus = MemoryEventBus::default();
        bus.close().await.unwrap();

        let cancel = CancellationToken::new();
        let err = bus
            .publish(&cancel, "orders", Event::new("orders", "tests"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BusClosed));
    }

    #[tokio::test]
    async fn subscribe_after_close_fails() {
        let bus = MemoryEventBus::default();
        bus.close().await.unwrap();

        let (handler, _) = collecting_handler();
        let err = bus
            .subscribe("orders", handler, SubscriptionOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BusClosed));
    }

    #[tokio::test]
    async fn close_twice_is_an_error() {
        let bus = MemoryEventBus::default();
        bus.close().await.unwrap();
        assert!(matches!(bus.close().await.unwrap_err(), Error::BusClosed));
    }

    #[tokio::test]
    async fn close_drains_buffered_events() {
        let bus = MemoryEventBus::new(4);
        let gate = Arc::new(Semaphore::new(0));
        let (handler, seen) = gated_handler(gate.clone());
        let cancel = CancellationToken::new();

        bus.subscribe("orders", handler, SubscriptionOptions::new())
            .await
            .unwrap();

        for _ in 0..3 {
            bus.publish(&cancel, "orders", Event::new("orders", "tests"))
                .await
                .unwrap();
        }
        // Let the delivery tasks enqueue before closing.
        sleep(Duration::from_millis(50)).await;

        bus.close().await.unwrap();

        // The dispatch task drains what was buffered before exiting.
        gate.add_permits(3);
        wait_for_len(&seen, 3).await;
    }
}
