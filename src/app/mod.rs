//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the connectivity rules for the fan controller:
//! validated network identities, the link-state machine, and the events
//! it emits. All interaction with hardware happens through **port traits**
//! defined in [`ports`], keeping this layer fully testable without a
//! radio or a real clock.

pub mod events;
pub mod identity;
pub mod manager;
pub mod ports;
