//! FanControl firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module, so the library
//! builds and tests on the host without the Xtensa toolchain.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod diagnostics;
pub mod error;

// Hardware-facing modules; the ESP-IDF implementations inside are guarded
// by cfg attributes, with host simulations filling in everywhere else.
pub mod adapters;
