use serde::Serialize;

/// One tournament as listed on the tournament index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub id: u32,
    pub date: String,
    pub country: String,
    pub name: String,
    pub num_players: String,
    pub winner: String,
}
