use std::collections::HashSet;

use itertools::Itertools;
use tracing::{debug, warn};

use crate::error::Result;
use crate::model::{Event, EventRow, Generation, Species, SpeciesRow, Standing, StandingEntry};

/// Turn every team member of every standing into its own row.
///
/// A player without a recorded team contributes no rows, and blank species
/// names are dropped.
pub fn explode_standings(standings: Vec<Standing>) -> Vec<StandingEntry> {
    standings
        .into_iter()
        .flat_map(|standing| {
            let Standing {
                event_id,
                placement,
                player,
                country,
                team,
            } = standing;
            team.into_iter()
                .filter(|pokemon| !pokemon.is_empty())
                .map(move |pokemon_name| StandingEntry {
                    event_id: event_id.into(),
                    placement: placement.clone(),
                    player_name: player.clone(),
                    player_country: country.clone(),
                    pokemon_name,
                })
        })
        .collect()
}

/// Keep the first row for each (event, placement, player, species), in order.
pub fn dedupe_standings(entries: Vec<StandingEntry>) -> Vec<StandingEntry> {
    let before = entries.len();
    let unique: Vec<StandingEntry> = entries
        .into_iter()
        .unique_by(|e| {
            (
                e.event_id,
                e.placement.clone(),
                e.player_name.clone(),
                e.pokemon_name.clone(),
            )
        })
        .collect();
    debug!(dropped = before - unique.len(), "deduplicated standings");
    unique
}

/// Pair events with their ruleset labels and map each label to a generation.
///
/// Events with an empty label are left out. Any other label without a
/// generation fails the whole batch.
pub fn resolve_events(events: Vec<(Event, String)>) -> Result<Vec<EventRow>> {
    events
        .into_iter()
        .filter(|(event, label)| {
            if label.is_empty() {
                warn!(event_id = event.id, "event has no ruleset, skipping");
            }
            !label.is_empty()
        })
        .map(|(event, label)| {
            Generation::from_ruleset(&label).map(|format| EventRow::new(event, format))
        })
        .collect()
}

/// Drop standings whose event was not retained, so every row in
/// `pokemon_stats` joins to a row in `events`.
pub fn retain_known_events(
    entries: Vec<StandingEntry>,
    events: &[EventRow],
) -> Vec<StandingEntry> {
    let known: HashSet<i64> = events.iter().map(|e| e.event_id).collect();
    let before = entries.len();
    let kept: Vec<StandingEntry> = entries
        .into_iter()
        .filter(|e| known.contains(&e.event_id))
        .collect();
    if kept.len() < before {
        warn!(dropped = before - kept.len(), "dropped standings of skipped events");
    }
    kept
}

pub fn species_rows(species: Vec<Species>) -> Vec<SpeciesRow> {
    species.into_iter().map(SpeciesRow::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarvestError;

    fn standing(placement: &str, player: &str, team: &[&str]) -> Standing {
        Standing {
            event_id: 12345,
            placement: placement.to_string(),
            player: player.to_string(),
            country: "Brazil".to_string(),
            team: team.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn event(id: u32) -> Event {
        Event {
            id,
            date: "01 Jun 24".to_string(),
            country: "Brazil".to_string(),
            name: format!("Event {id}"),
            num_players: "64".to_string(),
            winner: "Someone".to_string(),
        }
    }

    #[test]
    fn test_explode_two_member_team() {
        let entries = explode_standings(vec![standing("1", "Ana", &["Pikachu", "Charizard"])]);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].pokemon_name, "Pikachu");
        assert_eq!(entries[1].pokemon_name, "Charizard");
        for entry in &entries {
            assert_eq!(entry.event_id, 12345);
            assert_eq!(entry.placement, "1");
            assert_eq!(entry.player_name, "Ana");
            assert_eq!(entry.player_country, "Brazil");
        }
    }

    #[test]
    fn test_explode_empty_team() {
        assert!(explode_standings(vec![standing("9", "Ana", &[])]).is_empty());
    }

    #[test]
    fn test_explode_drops_blank_species() {
        let entries = explode_standings(vec![standing("1", "Ana", &["", "Pikachu", ""])]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].pokemon_name, "Pikachu");
    }

    #[test]
    fn test_dedupe_keeps_first_and_order() {
        let entries = explode_standings(vec![
            standing("1", "Ana", &["Pikachu", "Charizard"]),
            standing("2", "Bea", &["Pikachu"]),
            standing("1", "Ana", &["Pikachu"]),
        ]);
        let unique = dedupe_standings(entries);

        let keys: Vec<_> = unique
            .iter()
            .map(|e| (e.placement.as_str(), e.player_name.as_str(), e.pokemon_name.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![("1", "Ana", "Pikachu"), ("1", "Ana", "Charizard"), ("2", "Bea", "Pikachu")]
        );

        let distinct: HashSet<_> = unique
            .iter()
            .map(|e| (e.event_id, &e.placement, &e.player_name, &e.pokemon_name))
            .collect();
        assert_eq!(distinct.len(), unique.len());
    }

    #[test]
    fn test_resolve_events() {
        let rows = resolve_events(vec![
            (event(1), "VGC 2022".to_string()),
            (event(2), String::new()),
            (event(3), "Scarlet & Violet - Regulation H".to_string()),
        ])
        .unwrap();

        let resolved: Vec<_> = rows.iter().map(|r| (r.event_id, r.format)).collect();
        assert_eq!(resolved, vec![(1, Generation::Gen8), (3, Generation::Gen9)]);
        assert_eq!(rows[0].event_name, "Event 1");
        assert_eq!(rows[0].event_date, "01 Jun 24");
    }

    #[test]
    fn test_retain_known_events() {
        let events = resolve_events(vec![
            (event(12345), "VGC 2022".to_string()),
            (event(2), String::new()),
        ])
        .unwrap();
        let mut other = standing("1", "Bea", &["Pikachu"]);
        other.event_id = 2;
        let entries = explode_standings(vec![standing("1", "Ana", &["Pikachu"]), other]);

        let kept = retain_known_events(entries, &events);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].event_id, 12345);
        assert_eq!(kept[0].player_name, "Ana");
    }

    #[test]
    fn test_resolve_events_unknown_label() {
        let err = resolve_events(vec![
            (event(1), "VGC 2022".to_string()),
            (event(2), "Mystery Cup".to_string()),
        ])
        .unwrap_err();
        assert!(matches!(err, HarvestError::UnknownFormat { label } if label == "Mystery Cup"));
    }
}
