//! Tests for the Template Stamper
//!
//! Organized into focused submodules, one per stamping stage.

use super::*;

// Test helper functions
mod helpers;
