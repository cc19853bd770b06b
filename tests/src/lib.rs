//! # FieldGate Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── integration/      # Cross-crate scenarios
//! │   ├── bridging.rs   # Validate → forward → respond pipeline
//! │   └── command_path.rs # Backend → device command ingress
//! │
//! └── properties/       # Law-style property tests
//!     └── crypto_laws.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p fieldgate-tests
//!
//! # By category
//! cargo test -p fieldgate-tests integration::
//! cargo test -p fieldgate-tests properties::
//! ```

#![allow(dead_code)]

pub mod integration;
pub mod properties;
