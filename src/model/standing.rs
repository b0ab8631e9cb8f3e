use serde::Serialize;

/// A player's final placement in one event, with the team they brought.
///
/// `team` keeps the order shown on the page and may be empty when the player
/// never submitted a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub event_id: u32,
    pub placement: String,
    pub player: String,
    pub country: String,
    pub team: Vec<String>,
}
