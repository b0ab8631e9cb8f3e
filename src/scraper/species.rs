use ::scraper::{ElementRef, Selector};
use tracing::{debug, instrument};

use crate::error::{HarvestError, Result};
use crate::model::Species;
use crate::scraper::{self, cell, cell_text, normalize_img_url, row_cells, PageSource};

const CONTEXT: &str = "species";

pub(crate) fn species_url() -> String {
    format!(
        "{}/wiki/List_of_Pok%C3%A9mon_by_name",
        scraper::BULBAPEDIA_URL
    )
}

#[instrument(skip(source))]
pub(crate) async fn get_species(source: &impl PageSource) -> Result<Vec<Species>> {
    let url = species_url();
    let document = source.get_document(&url).await?;
    let species = parse_species(&document)?;
    debug!(count = species.len(), "parsed species catalog");
    Ok(species)
}

/// Collect species from every table on the page that looks like a species
/// table, ordered by national dex number.
///
/// The page also carries navigation and legend tables. A table in which any
/// row fails to parse is dropped whole.
pub(crate) fn parse_species(document: &scraper::Html) -> Result<Vec<Species>> {
    let table_selector = Selector::parse("table")?;
    let row_selector = Selector::parse("tr")?;
    let img_selector = Selector::parse("img")?;

    let mut species = Vec::new();
    for (index, table) in document.select(&table_selector).enumerate() {
        let parsed: Result<Vec<Species>> = table
            .select(&row_selector)
            .skip(1)
            .map(|row| parse_species_row(&row, &img_selector))
            .collect();
        match parsed {
            Ok(rows) => species.extend(rows),
            Err(e) => debug!(table = index, error = %e, "skipping non-species table"),
        }
    }

    species.sort_by_key(|s| s.id);
    species.dedup_by_key(|s| s.id);
    Ok(species)
}

fn parse_species_row(row: &ElementRef, img_selector: &Selector) -> Result<Species> {
    let cells = row_cells(row);

    let raw_id = cell_text(&cell(&cells, 0, CONTEXT)?);
    let id = raw_id
        .trim_start_matches('#')
        .trim()
        .parse::<u32>()
        .map_err(|e| HarvestError::malformed(CONTEXT, format!("bad dex number {raw_id:?}: {e}")))?;

    let img_url = cell(&cells, 1, CONTEXT)?
        .select(img_selector)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(|src| normalize_img_url(src, scraper::BULBAPEDIA_URL))
        .ok_or_else(|| HarvestError::malformed(CONTEXT, "missing sprite image"))?;

    let name = cell_text(&cell(&cells, 2, CONTEXT)?);
    let type_1 = cell_text(&cell(&cells, 3, CONTEXT)?);
    // Single-typed species span the type column, so the row is one cell short.
    let type_2 = cells.get(4).map(cell_text);

    Ok(Species {
        id,
        name,
        type_1,
        type_2,
        img_url,
    })
}
