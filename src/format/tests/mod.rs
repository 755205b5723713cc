//! Unit tests for the annotation file format.
//!
//! These tests cover layout detection, reading every accepted layout, and
//! write/read round trips through real files.

mod legacy_tests;
mod roundtrip_tests;
