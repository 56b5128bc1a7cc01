pub mod block;
pub mod client;
pub mod types;

pub use block::{block_ip, BlockRequest};
pub use client::{CheckPointClient, HttpTransport};
