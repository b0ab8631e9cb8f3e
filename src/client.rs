use tracing::instrument;

use crate::error::Result;
use crate::model::{Event, Species, Standing};
use crate::scraper::{self, Html, PageSource};

/// The entry point for harvesting tournament and species pages.
///
/// `VgcClient` wraps a [`PageSource`], by default a [`reqwest::Client`], and
/// exposes one method per page type.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> vgc_harvest::Result<()> {
/// use vgc_harvest::VgcClient;
///
/// let client = VgcClient::new();
/// let events = client.get_events().await?;
/// println!("Found {} events", events.len());
/// # Ok(())
/// # }
/// ```
pub struct VgcClient<S = reqwest::Client> {
    source: S,
}

impl VgcClient {
    /// Create a new client with default settings.
    pub fn new() -> Self {
        Self {
            source: reqwest::Client::new(),
        }
    }

    /// Create a new client using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure timeouts, proxies, headers, etc.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { source: client }
    }
}

impl Default for VgcClient {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PageSource> VgcClient<S> {
    /// Create a client that reads pages from any [`PageSource`].
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Fetch every event listed on the tournament index, in page order.
    pub async fn get_events(&self) -> Result<Vec<Event>> {
        scraper::events::get_events(&self.source).await
    }

    /// Fetch the standings of a single event.
    pub async fn get_standings(&self, event_id: u32) -> Result<Vec<Standing>> {
        scraper::standings::get_standings(&self.source, event_id).await
    }

    /// Fetch the standings of several events, concatenated in the given order.
    pub async fn get_all_standings(&self, event_ids: &[u32]) -> Result<Vec<Standing>> {
        scraper::standings::get_all_standings(&self.source, event_ids).await
    }

    /// Fetch the species catalog, ordered by national dex number.
    pub async fn get_species(&self) -> Result<Vec<Species>> {
        scraper::species::get_species(&self.source).await
    }

    /// Fetch the ruleset label of an event.
    pub async fn get_ruleset(&self, event_id: u32) -> Result<String> {
        scraper::format::get_ruleset(&self.source, event_id).await
    }
}

impl PageSource for reqwest::Client {
    #[instrument(skip(self))]
    async fn get_document(&self, url: &str) -> Result<Html> {
        scraper::get_document(self, url).await
    }
}
