use ::scraper::{ElementRef, Selector};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::error::{HarvestError, Result};
use crate::model::Event;
use crate::scraper::{self, cell, cell_text, event_id_from_url, nested_title, row_cells, PageSource};

const CONTEXT: &str = "tournament";

/// Tournament index with every filter set to "all".
pub(crate) fn events_url() -> String {
    format!(
        "{}/events/?time=all&type=all&region=all&format=all",
        scraper::LIMITLESS_URL
    )
}

#[instrument(skip(source))]
pub(crate) async fn get_events(source: &impl PageSource) -> Result<Vec<Event>> {
    let url = events_url();
    let document = source.get_document(&url).await?;
    let events = parse_events(&document)?;
    debug!(count = events.len(), "parsed tournament index");
    Ok(events)
}

pub(crate) fn parse_events(document: &scraper::Html) -> Result<Vec<Event>> {
    let table_selector = Selector::parse(".table")?;
    let row_selector = Selector::parse("tbody tr")?;
    let span_selector = Selector::parse("span")?;
    let link_selector = Selector::parse("a")?;

    let table = document
        .select(&table_selector)
        .next()
        .ok_or(HarvestError::ElementNotFound {
            context: "tournament table",
        })?;

    let events: Vec<Event> = table
        .select(&row_selector)
        .map(|row| parse_event_row(&row, &span_selector, &link_selector))
        .collect::<Result<_>>()?;

    if let Some(id) = events.iter().map(|e| e.id).duplicates().next() {
        return Err(HarvestError::malformed(
            CONTEXT,
            format!("event {id} is listed more than once"),
        ));
    }
    Ok(events)
}

fn parse_event_row(
    row: &ElementRef,
    span_selector: &Selector,
    link_selector: &Selector,
) -> Result<Event> {
    let cells = row_cells(row);

    let date = cell_text(&cell(&cells, 0, CONTEXT)?);
    let country = nested_title(&cell(&cells, 1, CONTEXT)?, span_selector, CONTEXT)?;

    let name_cell = cell(&cells, 2, CONTEXT)?;
    let href = name_cell
        .select(link_selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .ok_or_else(|| HarvestError::malformed(CONTEXT, "event name has no link"))?;
    let id = event_id_from_url(href)?;
    let name = cell_text(&name_cell);

    let num_players = cell_text(&cell(&cells, 3, CONTEXT)?);
    let winner = cell_text(&cell(&cells, 4, CONTEXT)?);

    Ok(Event {
        id,
        date,
        country,
        name,
        num_players,
        winner,
    })
}
