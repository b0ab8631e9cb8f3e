use ::scraper::{ElementRef, Selector};
use tracing::{debug, info, instrument};

use crate::error::{HarvestError, Result};
use crate::model::Standing;
use crate::scraper::{
    self, cell, cell_text, event_id_from_url, event_url, nested_title, row_cells, PageSource,
};

const CONTEXT: &str = "standings";

#[instrument(skip(source))]
pub(crate) async fn get_standings(
    source: &impl PageSource,
    event_id: u32,
) -> Result<Vec<Standing>> {
    let url = event_url(event_id);
    let url_id = event_id_from_url(&url)?;
    if url_id != event_id {
        return Err(HarvestError::malformed(
            CONTEXT,
            format!("detail url {url} names event {url_id}, expected {event_id}"),
        ));
    }

    let document = source.get_document(&url).await?;
    let standings = parse_standings(url_id, &document)?;
    debug!(count = standings.len(), event_id, "parsed standings");
    Ok(standings)
}

/// Harvest the standings of every event, one page at a time, in the given
/// order. The first failure ends the harvest.
#[instrument(skip_all, fields(events = event_ids.len()))]
pub(crate) async fn get_all_standings(
    source: &impl PageSource,
    event_ids: &[u32],
) -> Result<Vec<Standing>> {
    let mut standings = Vec::new();
    for (done, &event_id) in event_ids.iter().enumerate() {
        standings.extend(get_standings(source, event_id).await?);
        info!(
            event_id,
            processed = done + 1,
            total = event_ids.len(),
            "processed event standings"
        );
    }
    Ok(standings)
}

pub(crate) fn parse_standings(event_id: u32, document: &scraper::Html) -> Result<Vec<Standing>> {
    let table_selector = Selector::parse(".table")?;
    let row_selector = Selector::parse("tbody tr")?;
    let span_selector = Selector::parse("span")?;

    let table = document
        .select(&table_selector)
        .next()
        .ok_or(HarvestError::ElementNotFound {
            context: "standings table",
        })?;

    table
        .select(&row_selector)
        .map(|row| parse_standing_row(event_id, &row, &span_selector))
        .collect()
}

fn parse_standing_row(
    event_id: u32,
    row: &ElementRef,
    span_selector: &Selector,
) -> Result<Standing> {
    let cells = row_cells(row);

    let placement = cell_text(&cell(&cells, 0, CONTEXT)?);
    let player = cell_text(&cell(&cells, 1, CONTEXT)?);
    let country = nested_title(&cell(&cells, 2, CONTEXT)?, span_selector, CONTEXT)?;

    // Team sprites: the species name is the tooltip of each icon.
    let team = cell(&cells, 3, CONTEXT)?
        .select(span_selector)
        .map(|sprite| {
            sprite
                .value()
                .attr("title")
                .map(|t| t.trim().to_string())
                .ok_or_else(|| HarvestError::malformed(CONTEXT, "team sprite has no title"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Standing {
        event_id,
        placement,
        player,
        country,
        team,
    })
}
