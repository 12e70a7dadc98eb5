//! The sensor record and the rule that decides when it is alarming.

use serde::{Deserialize, Serialize, Serializer};

/// Readings strictly above this temperature (°C) raise an alert.
pub const TEMPERATURE_ALERT_THRESHOLD: f64 = 50.0;

/// Largest magnitude at which every integer is exactly representable as `f64`.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// The latest reading reported by the device.
///
/// Serialized as `{"temperature": <number>, "fire": <bool>}`, which is the
/// shape polling clients expect from `/status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SensorState {
    #[serde(serialize_with = "serialize_temperature")]
    pub temperature: f64,
    #[serde(rename = "fire")]
    pub fire_detected: bool,
}

impl SensorState {
    /// Whether this reading should trigger an alert.
    ///
    /// The temperature comparison is strict: exactly 50 °C is not an alert.
    pub fn requires_alert(&self) -> bool {
        self.temperature > TEMPERATURE_ALERT_THRESHOLD || self.fire_detected
    }

    /// Text sent to the alert recipient for this reading.
    pub fn alert_message(&self) -> String {
        format!(
            "FIRE ALERT: temperature {}°C, flame detected: {}",
            self.temperature,
            if self.fire_detected { "yes" } else { "no" }
        )
    }
}

/// A report from the device, as received on the wire.
///
/// Both fields are optional. A missing (or `null`) field takes its default
/// rather than the previous value, so every update replaces the whole
/// record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct SensorUpdate {
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default, alias = "fireDetected")]
    pub fire: Option<bool>,
}

impl SensorUpdate {
    /// Resolve the update into the record it replaces the current one with.
    pub fn into_state(self) -> SensorState {
        SensorState {
            temperature: self.temperature.unwrap_or_default(),
            fire_detected: self.fire.unwrap_or_default(),
        }
    }
}

/// Emit whole-number temperatures as JSON integers (`0`, not `0.0`).
fn serialize_temperature<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
