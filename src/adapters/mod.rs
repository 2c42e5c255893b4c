pub mod fs_store;
pub mod http;
pub mod nginx;

pub use fs_store::FsStreamStore;
pub use nginx::NginxController;
