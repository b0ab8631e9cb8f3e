pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub(crate) mod scraper;
pub mod store;

pub use client::VgcClient;
pub use error::{HarvestError, Result};
pub use model::*;
pub use scraper::{event_id_from_url, event_url, Html, PageSource};
