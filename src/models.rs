use serde_derive::Deserialize;
use serde_derive::Serialize;

/// Public profile resource for a player, `/pub/player/{username}`.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub username: String,
    pub url: String,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub joined: u64,
    #[serde(default)]
    pub status: String,
    pub avatar: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub last_online: Option<u64>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastRating {
    pub rating: u32,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinLossDraw {
    #[serde(default)]
    pub win: u32,
    #[serde(default)]
    pub loss: u32,
    #[serde(default)]
    pub draw: u32,
}

/// One time-class block of the stats resource: latest rating plus the
/// lifetime win/loss/draw record.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeClassStats {
    pub last: Option<LastRating>,
    pub record: Option<WinLossDraw>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleRushBest {
    pub score: u32,
    pub total_attempts: u32,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleRush {
    pub best: Option<PuzzleRushBest>,
}

/// Stats resource, `/pub/player/{username}/stats`. Every block is optional;
/// a player may never have played a given time class.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub chess_daily: Option<TimeClassStats>,
    pub chess_rapid: Option<TimeClassStats>,
    pub chess_blitz: Option<TimeClassStats>,
    pub chess_bullet: Option<TimeClassStats>,
    pub puzzle_rush: Option<PuzzleRush>,
}

/// One side of a completed game: who played it, their post-game rating, and
/// the raw terminal result code ("win", "checkmated", "timeout", ...).
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamePlayer {
    pub username: String,
    #[serde(default)]
    pub rating: u32,
    #[serde(default)]
    pub result: String,
}

/// One completed game from a monthly archive.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    #[serde(default)]
    pub url: String,
    /// "600" or "600+5" (base seconds, optional increment seconds).
    #[serde(default)]
    pub time_control: String,
    #[serde(default)]
    pub end_time: u64,
    #[serde(default)]
    pub rated: bool,
    /// Open string set: "rapid", "blitz", "bullet", "daily", ...
    #[serde(default)]
    pub time_class: String,
    pub uuid: Option<String>,
    pub white: GamePlayer,
    pub black: GamePlayer,
}

/// Archive index resource: monthly archive URLs, chronological, oldest first.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivesResponse {
    pub archives: Vec<String>,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamesResponse {
    pub games: Vec<Game>,
}

/// Everything one successful refresh produces. Built fresh per search and
/// never mutated afterwards.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub profile: PlayerProfile,
    pub stats: PlayerStats,
    pub games: Vec<Game>,
}
