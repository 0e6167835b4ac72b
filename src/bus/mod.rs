//! Topic-based publish/subscribe event bus.
//!
//! The bus is the only way modules talk to each other: publishers and
//! subscribers never hold references to one another, only to the bus.
//!
//! Delivery rules:
//!   - **At-most-once, best-effort**: no acknowledgment, no retry, and no
//!     failure signal back to the publisher.
//!   - **Per-subscriber FIFO**: each subscriber observes events for its topic
//!     in arrival order; there is no ordering across subscribers or topics.
//!   - **Cancellable**: a delivery attempt blocked on a full queue races the
//!     publisher's cancellation token and silently drops when it fires.

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::types::{Result, SubscriberId};

mod event;
mod memory;

pub use event::{Event, SPEC_VERSION};
pub use memory::MemoryEventBus;

/// Handler invoked by a subscriber's dispatch task, one event at a time.
///
/// The token is the one supplied to the `publish` call that produced the
/// event, so handlers can observe publisher-side cancellation.
pub type EventHandler =
    Arc<dyn Fn(CancellationToken, Event) -> BoxFuture<'static, ()> + Send + Sync>;

/// Options attached to a subscription, used for dispatch-task log context.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionOptions {
    pub group: Option<String>,
    pub name: Option<String>,
}

impl SubscriptionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumer group label.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Consumer name label.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Publish/subscribe contract implemented by bus backends.
///
/// The in-memory backend is [`MemoryEventBus`]; networked backends are an
/// external concern and plug in behind this same trait.
#[async_trait]
pub trait EventBus: Send + Sync + std::fmt::Debug {
    /// Publish an event to all subscribers of `topic`.
    ///
    /// Returns as soon as delivery attempts are dispatched; it never waits
    /// for handlers. Publishing to a topic with no subscribers is a no-op.
    async fn publish(&self, cancel: &CancellationToken, topic: &str, event: Event) -> Result<()>;

    /// Register a handler for `topic` and start its dispatch task.
    async fn subscribe(
        &self,
        topic: &str,
        handler: EventHandler,
        opts: SubscriptionOptions,
    ) -> Result<SubscriberId>;

    /// Close the bus. Terminal: a closed bus rejects everything, including
    /// a second close.
    async fn close(&self) -> Result<()>;
}
