pub mod leaderboard;

pub type LeaderboardEntry = leaderboard::Model;
