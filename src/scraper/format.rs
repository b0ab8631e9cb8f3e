use ::scraper::Selector;
use tracing::{info, instrument};

use crate::error::{HarvestError, Result};
use crate::scraper::{self, cell_text, event_url, PageSource};

/// Fetch the ruleset label shown in an event's info box, e.g. `"VGC 2022"`.
///
/// The label may be empty; mapping it to a generation is left to the caller.
#[instrument(skip(source))]
pub(crate) async fn get_ruleset(source: &impl PageSource, event_id: u32) -> Result<String> {
    let document = source.get_document(&event_url(event_id)).await?;
    let label = parse_ruleset(&document)?;
    info!(event_id, label = %label, "fetched ruleset");
    Ok(label)
}

pub(crate) fn parse_ruleset(document: &scraper::Html) -> Result<String> {
    let infobox_selector = Selector::parse(".infobox-text")?;
    let link_selector = Selector::parse("a")?;

    let infobox = document
        .select(&infobox_selector)
        .next()
        .ok_or(HarvestError::ElementNotFound {
            context: "event info box",
        })?;
    let link = infobox
        .select(&link_selector)
        .next()
        .ok_or(HarvestError::ElementNotFound {
            context: "ruleset link",
        })?;
    Ok(cell_text(&link))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::Html;
    use crate::scraper::standings::tests::standings_page;
    use crate::scraper::tests::FixtureSource;

    #[test]
    fn test_parse_ruleset_takes_first_link() {
        let html = standings_page(&[], "Scarlet & Violet - Regulation C");
        let label = parse_ruleset(&Html::parse_document(&html)).unwrap();
        assert_eq!(label, "Scarlet & Violet - Regulation C");
    }

    #[test]
    fn test_missing_info_box() {
        let err = parse_ruleset(&Html::parse_document("<div>no box</div>")).unwrap_err();
        assert!(matches!(err, HarvestError::ElementNotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_ruleset() {
        let source =
            FixtureSource::default().with_page(event_url(9), standings_page(&[], "VGC 2022"));
        assert_eq!(get_ruleset(&source, 9).await.unwrap(), "VGC 2022");
    }
}
