use axum::Router;

mod leaderboard;

/// Function for creating the router containing all the
/// application routes
pub fn router() -> Router {
    leaderboard::router()
}
