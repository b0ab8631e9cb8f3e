use serde::Serialize;
use tracing::{info, instrument};

use crate::client::VgcClient;
use crate::error::Result;
use crate::model::Tables;
use crate::normalize::{
    dedupe_standings, explode_standings, resolve_events, retain_known_events, species_rows,
};
use crate::scraper::PageSource;
use crate::store::{load_tables, Store};

/// Row counts of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub events: usize,
    pub species: usize,
    pub standings: usize,
}

/// Harvest every page and assemble the three load-ready tables.
///
/// Nothing is written anywhere; an error from any page aborts the harvest.
#[instrument(skip_all)]
pub async fn harvest<S: PageSource>(client: &VgcClient<S>) -> Result<Tables> {
    info!("parsing the tournament index");
    let events = client.get_events().await?;
    info!(count = events.len(), "extracted events");

    let event_ids: Vec<u32> = events.iter().map(|e| e.id).collect();

    info!("harvesting event standings");
    let standings = client.get_all_standings(&event_ids).await?;

    info!(players = standings.len(), "exploding team rosters");
    let standings = dedupe_standings(explode_standings(standings));

    info!("parsing the species catalog");
    let species = species_rows(client.get_species().await?);
    info!(count = species.len(), "extracted species");

    info!("fetching event rulesets");
    let mut labelled = Vec::with_capacity(events.len());
    for event in events {
        let label = client.get_ruleset(event.id).await?;
        labelled.push((event, label));
    }
    let events = resolve_events(labelled)?;
    let standings = retain_known_events(standings, &events);

    Ok(Tables {
        events,
        species,
        standings,
    })
}

/// One full-refresh run: harvest, reset and load the store, then rebuild the
/// rankings.
pub async fn run<S: PageSource>(
    client: &VgcClient<S>,
    store: &mut impl Store,
) -> Result<RunSummary> {
    let tables = harvest(client).await?;
    load(store, tables).await
}

/// Replace the store's contents with `tables` and rebuild the rankings.
#[instrument(skip_all)]
pub async fn load(store: &mut impl Store, tables: Tables) -> Result<RunSummary> {
    info!("populating database tables");
    load_tables(store, &tables).await?;

    info!("building rankings");
    store.run_ranking().await?;

    let summary = RunSummary {
        events: tables.events.len(),
        species: tables.species.len(),
        standings: tables.standings.len(),
    };
    info!(?summary, "run finished");
    Ok(summary)
}
