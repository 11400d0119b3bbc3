use crate::models::{Game, GamePlayer, PlayerStats, WinLossDraw};
use chrono::DateTime;
use tracing::debug;

/// Weights for the estimated over-the-board rating. This is a heuristic
/// carried over from the dashboard's first version, not a statistically
/// derived model; treat the output as a rough indicator only.
pub const OTB_RAPID_WEIGHT: f64 = 0.6;
pub const OTB_BLITZ_WEIGHT: f64 = 0.4;

/// Result codes that count as a draw. Everything that is neither "win" nor
/// in this set is treated as a loss, including codes we have never seen.
const DRAW_CODES: [&str; 6] = [
    "agreed",
    "repetition",
    "stalemate",
    "insufficient",
    "50move",
    "timevsinsufficient",
];

const LOSS_CODES: [&str; 5] = ["checkmated", "timeout", "resigned", "abandoned", "lose"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeClass {
    Win,
    Draw,
    Loss,
}

/// Maps a raw per-player result code to its semantic outcome.
pub fn classify(result_code: &str) -> OutcomeClass {
    if result_code == "win" {
        return OutcomeClass::Win;
    }
    if DRAW_CODES.contains(&result_code) {
        return OutcomeClass::Draw;
    }
    if !LOSS_CODES.contains(&result_code) {
        debug!("Unrecognized result code '{}', counting as loss", result_code);
    }
    OutcomeClass::Loss
}

/// Human-readable label for one game from the subject's point of view.
/// A win is described by the opponent's terminal code; otherwise the
/// subject's own code decides. Unknown codes come back verbatim.
pub fn describe(my_code: &str, opponent_code: &str) -> String {
    if my_code == "win" {
        return match opponent_code {
            "checkmated" => "Won by Checkmate",
            "timeout" => "Won by Timeout",
            "resigned" => "Won by Resignation",
            "abandoned" => "Won by Abandonment",
            _ => "Won",
        }
        .to_string();
    }

    match my_code {
        "checkmated" => "Checkmated",
        "timeout" => "Lost on Time",
        "resigned" => "Resigned",
        "abandoned" => "Abandoned",
        "agreed" => "Draw by Agreement",
        "repetition" => "Draw by Repetition",
        "stalemate" => "Stalemate",
        "insufficient" => "Insufficient Material",
        "50move" => "50-Move Rule",
        "timevsinsufficient" => "Draw (Time vs Insufficient)",
        other => other,
    }
    .to_string()
}

/// Resolves which seat the subject occupied, if any. Username comparison is
/// case-insensitive. Returns (subject, opponent).
pub fn subject_seat<'a>(game: &'a Game, subject: &str) -> Option<(&'a GamePlayer, &'a GamePlayer)> {
    if game.white.username.eq_ignore_ascii_case(subject) {
        Some((&game.white, &game.black))
    } else if game.black.username.eq_ignore_ascii_case(subject) {
        Some((&game.black, &game.white))
    } else {
        None
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorStats {
    pub total: u32,
    pub wins: u32,
    pub draws: u32,
}

impl ColorStats {
    /// Win percentage rounded to the nearest whole number; 0 with no games.
    pub fn win_rate_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (f64::from(self.wins) / f64::from(self.total) * 100.0).round() as u32
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorBreakdown {
    pub white: ColorStats,
    pub black: ColorStats,
}

/// Folds a batch of games into per-color totals for the subject. Games
/// where the subject played neither side are skipped.
pub fn aggregate_by_color(games: &[Game], subject: &str) -> ColorBreakdown {
    let mut breakdown = ColorBreakdown::default();
    for game in games {
        let (stats, result) = if game.white.username.eq_ignore_ascii_case(subject) {
            (&mut breakdown.white, &game.white.result)
        } else if game.black.username.eq_ignore_ascii_case(subject) {
            (&mut breakdown.black, &game.black.result)
        } else {
            continue;
        };
        stats.total += 1;
        match classify(result) {
            OutcomeClass::Win => stats.wins += 1,
            OutcomeClass::Draw => stats.draws += 1,
            OutcomeClass::Loss => {}
        }
    }
    breakdown
}

/// Win percentage of a lifetime win/loss/draw record; 0 when empty.
pub fn record_win_rate(record: &WinLossDraw) -> u32 {
    let total = record.win + record.loss + record.draw;
    if total == 0 {
        return 0;
    }
    (f64::from(record.win) / f64::from(total) * 100.0).round() as u32
}

/// One chart row. Sparse: only the field matching the game's time class is
/// set; a daily game sets none of them.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct SeriesPoint {
    pub date: String,
    pub timestamp: u64,
    pub rapid: Option<u32>,
    pub blitz: Option<u32>,
    pub bullet: Option<u32>,
}

/// Projects the subject's rated games onto three parallel rating series,
/// oldest first. Returns an empty vec when fewer than two points survive
/// filtering; a single point cannot support a trend line.
pub fn build_series(games: &[Game], subject: &str) -> Vec<SeriesPoint> {
    let mut rated: Vec<&Game> = games
        .iter()
        .filter(|g| g.rated && subject_seat(g, subject).is_some())
        .collect();
    // Stable sort: ties on end_time keep their original relative order.
    rated.sort_by_key(|g| g.end_time);

    if rated.len() < 2 {
        return Vec::new();
    }

    rated
        .into_iter()
        .filter_map(|game| {
            let (me, _) = subject_seat(game, subject)?;
            let date = DateTime::from_timestamp(game.end_time as i64, 0)
                .map(|d| d.format("%b %-d").to_string())
                .unwrap_or_default();
            let mut point = SeriesPoint {
                date,
                timestamp: game.end_time,
                ..SeriesPoint::default()
            };
            match game.time_class.as_str() {
                "rapid" => point.rapid = Some(me.rating),
                "blitz" => point.blitz = Some(me.rating),
                "bullet" => point.bullet = Some(me.rating),
                _ => {}
            }
            Some(point)
        })
        .collect()
}

/// Chart axis bounds: 50 points of headroom either side of the observed
/// ratings. None when the series carries no ratings at all.
pub fn axis_bounds(series: &[SeriesPoint]) -> Option<(i64, i64)> {
    let ratings: Vec<u32> = series
        .iter()
        .flat_map(|p| [p.rapid, p.blitz, p.bullet])
        .flatten()
        .collect();
    let min = *ratings.iter().min()?;
    let max = *ratings.iter().max()?;
    Some((i64::from(min) - 50, i64::from(max) + 50))
}

/// Estimated over-the-board rating from the latest rapid and blitz ratings.
/// With both present the fixed 0.6/0.4 weighting applies; with one, that
/// rating stands alone. None means no estimate, never "rated 0".
pub fn estimate_otb(stats: &PlayerStats) -> Option<u32> {
    let last_rating = |block: &Option<crate::models::TimeClassStats>| {
        block
            .as_ref()
            .and_then(|s| s.last.as_ref())
            .map_or(0, |l| l.rating)
    };
    let rapid = last_rating(&stats.chess_rapid);
    let blitz = last_rating(&stats.chess_blitz);

    let estimate = if rapid > 0 && blitz > 0 {
        (f64::from(rapid) * OTB_RAPID_WEIGHT + f64::from(blitz) * OTB_BLITZ_WEIGHT).round() as u32
    } else if rapid > 0 {
        rapid
    } else {
        blitz
    };

    (estimate > 0).then_some(estimate)
}
