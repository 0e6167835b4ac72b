//! Event type and publish-boundary validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::types::{Error, Result};

/// Spec version stamped on events built by [`Event::new`].
pub const SPEC_VERSION: &str = "1.0";

/// A generic event carried by the bus.
///
/// The wire field names follow the CloudEvents-style shape (`specversion`,
/// `type`); the bus itself never serializes events, that is left to
/// transport adapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub source: String,
    #[serde(rename = "specversion")]
    pub spec_version: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: HashMap<String, Value>,
    pub time: DateTime<Utc>,
}

impl Event {
    /// Build an event with a fresh random id and the current time.
    pub fn new(event_type: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source: source.into(),
            spec_version: SPEC_VERSION.to_string(),
            event_type: event_type.into(),
            data: HashMap::new(),
            time: Utc::now(),
        }
    }

    /// Attach a data field.
    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    /// Reject events without a valid id and type.
    ///
    /// Enforced at the publish boundary; an invalid event is never delivered.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() || self.event_type.is_empty() {
            return Err(Error::validation("event must have a valid id and type"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn new_event_is_valid() {
        let ev = Event::new("order.created", "orders");
        assert!(ev.validate().is_ok());
        assert_eq!(ev.spec_version, SPEC_VERSION);
        assert!(!ev.id.is_empty());
    }

    #[test]
    fn empty_id_or_type_is_rejected() {
        let mut ev = Event::new("order.created", "orders");
        ev.id = String::new();
        assert!(ev.validate().is_err());

        let mut ev = Event::new("order.created", "orders");
        ev.event_type = String::new();
        assert!(ev.validate().is_err());
    }

    #[test]
    fn serde_uses_wire_field_names() {
        let ev = Event::new("order.created", "orders").with_data("total", json!(42));
        let value = serde_json::to_value(&ev).unwrap();

        assert_eq!(value["type"], "order.created");
        assert_eq!(value["specversion"], "1.0");
        assert_eq!(value["data"]["total"], 42);
    }
}
