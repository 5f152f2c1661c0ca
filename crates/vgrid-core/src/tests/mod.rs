//! Test module for vgrid-core
//!
//! This module contains tests for:
//! - Collection loading, filtering and sort policies
//! - The composed display (redisplay, in-place updates, navigation, layout)
//! - The change notification bridge
//! - Reloading settings and host files from disk

// Test modules use exact float comparisons
#![allow(clippy::float_cmp)]

mod config_reload_tests;
