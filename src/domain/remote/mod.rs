//! Remote domain - the registry service contract

mod bundle;
mod client;
mod error;
mod filter;
mod pager;

pub use bundle::Bundle;
pub use client::{RemoteClient, RemoteClientFactory};
pub use error::FetchError;
pub use filter::QueryFilter;
pub use pager::fetch_all_pages;

#[cfg(test)]
pub use client::{MockRemoteClient, MockRemoteClientFactory};
