//! Inbound adapters: the HTTP surface driving the student use cases.

pub mod http;
