//! Integration testing module
//!
//! End-to-end tests for the DFXP decoder:
//! - Sniffing and parsing sample documents
//! - Frame extraction over full and segmented windows
//! - WebVTT segment generation and validation
//! - Property tests for buffer sizing and time expressions

pub mod fixtures;
pub mod validation;
