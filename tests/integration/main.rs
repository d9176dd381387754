//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the connectivity core
//! against mock adapters. All tests run on the host (x86_64) with no
//! real hardware required.

mod mode_exclusivity_tests;
mod sta_mode_tests;
