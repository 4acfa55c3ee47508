//! Serializable entity snapshot

use serde::Serialize;
use serde_json::{Map, Value};

/// Entity platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Sensor,
    BinarySensor,
    DeviceTracker,
    Switch,
    Button,
    Number,
    Select,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Sensor => "sensor",
            Platform::BinarySensor => "binary_sensor",
            Platform::DeviceTracker => "device_tracker",
            Platform::Switch => "switch",
            Platform::Button => "button",
            Platform::Number => "number",
            Platform::Select => "select",
        }
    }
}

/// Rendered state of one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityState {
    /// `<vin>_<suffix>`, stable across restarts
    pub unique_id: String,
    pub platform: Platform,
    /// Name used in API routes (`/switches/{key}/on`)
    pub key: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_class: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_class: Option<&'static str>,
    /// `null` when the record carries no value
    pub state: Value,
    pub available: bool,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
}

impl EntityState {
    pub(crate) fn new(
        platform: Platform,
        vin: &str,
        suffix: &str,
        key: &'static str,
        name: &'static str,
        icon: &'static str,
    ) -> Self {
        Self {
            unique_id: format!("{}_{}", vin, suffix),
            platform,
            key,
            name,
            icon,
            device_class: None,
            unit: None,
            state_class: None,
            state: Value::Null,
            available: false,
            attributes: Map::new(),
        }
    }

    pub(crate) fn device_class(mut self, device_class: Option<&'static str>) -> Self {
        self.device_class = device_class;
        self
    }

    pub(crate) fn unit(mut self, unit: Option<&'static str>) -> Self {
        self.unit = unit;
        self
    }

    pub(crate) fn state_class(mut self, state_class: Option<&'static str>) -> Self {
        self.state_class = state_class;
        self
    }

    pub(crate) fn state(mut self, state: impl Into<Value>) -> Self {
        self.state = state.into();
        self
    }

    pub(crate) fn available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    pub(crate) fn attribute(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }
}
