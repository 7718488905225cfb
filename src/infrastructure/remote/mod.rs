//! Remote infrastructure - HTTP access to the registry service

mod factory;
mod http_client;

pub use factory::HttpRemoteClientFactory;
pub use http_client::HttpRemoteClient;
