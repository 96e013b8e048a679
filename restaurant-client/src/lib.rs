#[cfg(feature = "http")]
mod client;
pub mod error;
#[cfg(feature = "http")]
pub mod http_client;
pub mod models;
pub mod session;
pub mod state;
pub mod storage;

#[cfg(feature = "http")]
pub use client::RestaurantClient;
