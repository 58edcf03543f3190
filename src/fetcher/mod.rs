pub mod client;
pub mod errors;
pub mod pipeline;
pub mod target;
pub mod types;

pub use client::Fetcher;
pub use errors::FetchError;
pub use target::{is_private_target, normalize_url};
pub use types::{FetchRoute, FetchedPage, FetcherSettings};
