/// Streamgate - an HTTP control plane for nginx stream forwarding rules
///
/// This crate exposes a small authenticated JSON API to create, list and
/// delete named TCP forwarding rules. Each rule is persisted as one nginx
/// `stream` config fragment; every mutation is verified with `nginx -t`
/// before it is allowed to survive, and applied with `nginx -s reload`.
// Re-export public modules with explicit visibility controls
pub mod config;
pub mod ports;
pub mod tracing_setup;

// These modules are implementation details and should not be directly used by users
pub(crate) mod adapters;
pub(crate) mod core;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export the specific types needed by the binary crate
pub use crate::adapters::fs_store::FsStreamStore;
pub use crate::adapters::http::server::ApiServer;
pub use crate::adapters::nginx::NginxController;
pub use crate::core::{Reconciler, StreamDefinition};
