//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **sheets**: Google Sheets v4 store for student rows.
//!
//! Adapters translate between domain rows and wire payloads. They hold no
//! business rules.

pub mod sheets;
