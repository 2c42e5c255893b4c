pub mod proxy_controller;
pub mod stream_store;

pub use proxy_controller::{ControllerError, ProxyController};
pub use stream_store::{StoreError, StreamStore};
