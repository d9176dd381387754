//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements | Connects to                |
//! |------------|------------|----------------------------|
//! | `log_sink` | EventSink  | Serial log output          |
//! | `time`     | TimePort   | ESP32 system timer, FreeRTOS delay |
//! | `wifi`     | RadioPort  | ESP-IDF WiFi driver (AP + STA)     |

pub mod log_sink;
pub mod time;
pub mod wifi;
