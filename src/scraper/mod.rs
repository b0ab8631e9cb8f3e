pub(crate) mod events;
pub(crate) mod format;
pub(crate) mod species;
pub(crate) mod standings;

use std::future::Future;

pub use ::scraper::Html;
use ::scraper::{ElementRef, Selector};
use itertools::Itertools;
use tracing::debug;

use crate::error::{HarvestError, Result};

pub(crate) const LIMITLESS_URL: &str = "https://limitlessvgc.com";
pub(crate) const BULBAPEDIA_URL: &str = "https://bulbapedia.bulbagarden.net";

/// Anything that can turn a URL into a parsed HTML document.
///
/// The harvesters only talk to this trait, so a run can be pointed at the
/// live sites through [`crate::VgcClient`] or at canned pages in tests.
pub trait PageSource {
    fn get_document(&self, url: &str) -> impl Future<Output = Result<Html>>;
}

/// Fetch a URL and parse the response body as an HTML document.
pub(crate) async fn get_document(client: &reqwest::Client, url: &str) -> Result<Html> {
    debug!(url, "fetching page");

    let response = client.get(url).send().await.map_err(|e| HarvestError::Http {
        url: url.to_owned(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(HarvestError::UnexpectedStatus {
            url: url.to_owned(),
            status,
        });
    }

    let body = response.text().await.map_err(|e| HarvestError::ResponseBody {
        url: url.to_owned(),
        source: e,
    })?;

    Ok(Html::parse_document(&body))
}

/// URL of an event's detail page.
pub fn event_url(event_id: u32) -> String {
    format!("{LIMITLESS_URL}/events/{event_id}/")
}

/// Parse the numeric event id from the last path segment of an event link or
/// detail-page URL. Query strings and trailing slashes are ignored.
pub fn event_id_from_url(url: &str) -> Result<u32> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let segment = path
        .split('/')
        .rfind(|s| !s.is_empty())
        .ok_or_else(|| HarvestError::malformed("event link", format!("no path in {url:?}")))?;
    segment.parse::<u32>().map_err(|e| {
        HarvestError::malformed("event link", format!("bad id {segment:?} in {url:?}: {e}"))
    })
}

/// Full text of a cell, trimmed, with every inner whitespace run (line
/// breaks included) collapsed to a single space.
pub(crate) fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().split_whitespace().join(" ")
}

/// The `<td>` children of a table row, in order.
pub(crate) fn row_cells<'a>(row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "td")
        .collect()
}

/// Fetch cell `index` of a row, failing with a malformed-row error.
pub(crate) fn cell<'a>(
    cells: &[ElementRef<'a>],
    index: usize,
    context: &'static str,
) -> Result<ElementRef<'a>> {
    cells.get(index).copied().ok_or_else(|| {
        HarvestError::malformed(context, format!("expected column {index}, found {}", cells.len()))
    })
}

/// Read the `title` of the first element matching `selector` inside `cell`.
///
/// Flags and sprite icons render as glyphs; their readable name only lives in
/// the tooltip attribute.
pub(crate) fn nested_title(
    cell: &ElementRef,
    selector: &Selector,
    context: &'static str,
) -> Result<String> {
    let element = cell
        .select(selector)
        .next()
        .ok_or_else(|| HarvestError::malformed(context, "missing annotated element"))?;
    element
        .value()
        .attr("title")
        .map(|t| t.trim().to_string())
        .ok_or_else(|| HarvestError::malformed(context, "annotated element has no title"))
}

/// Normalize a potentially relative image URL to an absolute one on `base`.
pub(crate) fn normalize_img_url(src: &str, base: &str) -> String {
    if src.starts_with("//") {
        format!("https:{src}")
    } else if src.starts_with('/') {
        format!("{base}{src}")
    } else {
        src.to_string()
    }
}
