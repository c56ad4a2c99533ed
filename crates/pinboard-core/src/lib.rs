//! HTTP plumbing shared by the pinboard binaries: health probes, request-id
//! and trace layers, tracing bootstrap and serde helpers.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
