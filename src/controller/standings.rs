use crate::error::LeagueError;
use crate::score::{TeamStanding, flight_standings};
use crate::storage::Storage;

/// Standings for a flight from its recorded match results.
///
/// # Errors
///
/// Returns `MissingPrerequisite` if the flight has no teams and `Db` if the
/// teams or results cannot be read.
pub async fn standings_for_flight(
    storage: &dyn Storage,
    flight_id: i64,
) -> Result<Vec<TeamStanding>, LeagueError> {
    let teams = storage.teams_in_flight(flight_id).await?;
    if teams.is_empty() {
        return Err(LeagueError::MissingPrerequisite(format!(
            "flight {flight_id} has no teams"
        )));
    }
    let results = storage.match_results(flight_id).await?;
    Ok(flight_standings(&teams, &results))
}
