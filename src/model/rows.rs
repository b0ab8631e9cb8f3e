use serde::Serialize;

use super::{Event, Generation, Species};

/// A row of the `events` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRow {
    pub event_id: i64,
    pub event_date: String,
    pub event_country: String,
    pub event_name: String,
    pub num_players: String,
    pub winner: String,
    pub format: Generation,
}

impl EventRow {
    pub fn new(event: Event, format: Generation) -> Self {
        Self {
            event_id: event.id.into(),
            event_date: event.date,
            event_country: event.country,
            event_name: event.name,
            num_players: event.num_players,
            winner: event.winner,
            format,
        }
    }
}

/// A row of the `pokemon_stats` table: one species used by one player in
/// one event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StandingEntry {
    pub event_id: i64,
    pub placement: String,
    pub player_name: String,
    pub player_country: String,
    pub pokemon_name: String,
}

/// A row of the `pokemon` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpeciesRow {
    pub pokemon_id: i64,
    pub pokemon_name: String,
    pub type_1: String,
    pub type_2: Option<String>,
    pub img_url: String,
}

impl From<Species> for SpeciesRow {
    fn from(species: Species) -> Self {
        Self {
            pokemon_id: species.id.into(),
            pokemon_name: species.name,
            type_1: species.type_1,
            type_2: species.type_2,
            img_url: species.img_url,
        }
    }
}

/// The three load-ready tables of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tables {
    pub events: Vec<EventRow>,
    pub species: Vec<SpeciesRow>,
    pub standings: Vec<StandingEntry>,
}
