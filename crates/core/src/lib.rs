//! Firewatch core domain.
//!
//! Holds the sensor record, the alert rule, the [`Notifier`] seam and the
//! [`StateRelay`] that ties them together. No HTTP and no provider code
//! lives here; the API and alert crates build on top of it.

pub mod error;
pub mod notifier;
pub mod relay;
pub mod sensor;
pub mod types;

pub use notifier::Notifier;
pub use relay::{AlertOutcome, StateRelay};
pub use sensor::{SensorState, SensorUpdate};
