use crate::analytics::{
    aggregate_by_color, axis_bounds, build_series, classify, describe, estimate_otb,
    record_win_rate, subject_seat, OutcomeClass,
};
use crate::models::{DashboardData, Game, PlayerProfile, PlayerStats};
use chrono::DateTime;

const GAME_LIST_LIMIT: usize = 20;

/// "600" -> "10 min", "600+5" -> "10 min+5". Daily descriptors like
/// "1/86400" don't parse as seconds and pass through verbatim.
pub fn format_time_control(time_control: &str) -> String {
    let mut parts = time_control.splitn(2, '+');
    let base = parts.next().unwrap_or_default();
    let Ok(seconds) = base.parse::<u64>() else {
        return time_control.to_string();
    };
    let minutes = seconds / 60;
    match parts.next() {
        Some(increment) => format!("{} min+{}", minutes, increment),
        None => format!("{} min", minutes),
    }
}

fn epoch_label(epoch_secs: u64, format: &str) -> String {
    DateTime::from_timestamp(epoch_secs as i64, 0)
        .map(|d| d.format(format).to_string())
        .unwrap_or_default()
}

pub fn render_profile(profile: &PlayerProfile, stats: &PlayerStats) -> String {
    let mut lines = Vec::new();

    let mut heading = profile.username.clone();
    if let Some(title) = &profile.title {
        heading = format!("{} [{}]", heading, title);
    }
    lines.push(heading);

    if let Some(name) = &profile.name {
        lines.push(name.clone());
    }
    if let Some(location) = &profile.location {
        lines.push(location.clone());
    }
    lines.push(format!(
        "{} followers | member since {}",
        profile.followers,
        epoch_label(profile.joined, "%b %Y")
    ));
    if let Some(otb) = estimate_otb(stats) {
        lines.push(format!(
            "Est. OTB rating: {} (based on online performance)",
            otb
        ));
    }
    lines.push(profile.url.clone());

    lines.join("\n")
}

pub fn render_win_rates(stats: &PlayerStats) -> String {
    let blocks = [
        ("Rapid", &stats.chess_rapid),
        ("Blitz", &stats.chess_blitz),
        ("Bullet", &stats.chess_bullet),
    ];
    let mut lines = vec!["Win Rate".to_string()];
    for (label, block) in blocks {
        let Some(record) = block.as_ref().and_then(|b| b.record.as_ref()) else {
            continue;
        };
        lines.push(format!(
            "  {:<7} {:>3}%  ({} W / {} D / {} L)",
            label,
            record_win_rate(record),
            record.win,
            record.draw,
            record.loss
        ));
    }
    if lines.len() == 1 {
        return String::new();
    }
    lines.join("\n")
}

pub fn render_stat_cards(stats: &PlayerStats) -> String {
    let mut lines = Vec::new();
    if let Some(last) = stats.chess_rapid.as_ref().and_then(|b| b.last.as_ref()) {
        lines.push(format!("Current Rapid: {}", last.rating));
    }
    match stats.puzzle_rush.as_ref().and_then(|p| p.best.as_ref()) {
        Some(best) => lines.push(format!(
            "Puzzle Rush Best: {} ({} attempts)",
            best.score, best.total_attempts
        )),
        None => lines.push("No Puzzle Data".to_string()),
    }
    lines.join("\n")
}

pub fn render_color_performance(games: &[Game], subject: &str) -> String {
    let breakdown = aggregate_by_color(games, subject);
    let mut lines = vec![format!("Performance by Color (last {} games)", games.len())];
    for (label, stats) in [("White", breakdown.white), ("Black", breakdown.black)] {
        lines.push(format!(
            "  Playing {:<5} {:>3}% win rate  ({} games, {} wins, {} draws)",
            label,
            stats.win_rate_percent(),
            stats.total,
            stats.wins,
            stats.draws
        ));
    }
    lines.join("\n")
}

/// Rating series as rows, oldest first. Empty when the series itself is
/// empty, in which case the section is omitted entirely.
pub fn render_rating_series(games: &[Game], subject: &str) -> String {
    let series = build_series(games, subject);
    if series.is_empty() {
        return String::new();
    }

    let mut lines = match axis_bounds(&series) {
        Some((min, max)) => vec![format!("Rating Monitor ({}-{})", min, max)],
        None => vec!["Rating Monitor".to_string()],
    };
    for point in &series {
        let mut cells = Vec::new();
        if let Some(rating) = point.rapid {
            cells.push(format!("rapid {}", rating));
        }
        if let Some(rating) = point.blitz {
            cells.push(format!("blitz {}", rating));
        }
        if let Some(rating) = point.bullet {
            cells.push(format!("bullet {}", rating));
        }
        lines.push(format!("  {:<6} {}", point.date, cells.join("  ")));
    }
    lines.join("\n")
}

pub fn render_game_list(games: &[Game], subject: &str) -> String {
    let mut lines = vec!["Recent Matches".to_string()];
    for game in games.iter().take(GAME_LIST_LIMIT) {
        let Some((me, opponent)) = subject_seat(game, subject) else {
            continue;
        };
        let badge = match classify(&me.result) {
            OutcomeClass::Win => 'W',
            OutcomeClass::Draw => 'D',
            OutcomeClass::Loss => 'L',
        };
        lines.push(format!(
            "  {} vs {} ({})  {}  {}  [{} {}]",
            badge,
            opponent.username,
            opponent.rating,
            format_time_control(&game.time_control),
            describe(&me.result, &opponent.result),
            game.time_class,
            me.rating
        ));
    }
    if lines.len() == 1 {
        lines.push("  No games this month".to_string());
    }
    lines.join("\n")
}

/// Full dashboard for one successful refresh.
pub fn render_dashboard(data: &DashboardData) -> String {
    let subject = &data.profile.username;
    let sections = [
        render_profile(&data.profile, &data.stats),
        render_win_rates(&data.stats),
        render_stat_cards(&data.stats),
        render_color_performance(&data.games, subject),
        render_rating_series(&data.games, subject),
        render_game_list(&data.games, subject),
    ];
    sections
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GamePlayer, LastRating, TimeClassStats, WinLossDraw};

    fn subject_game(result: &str, opponent_result: &str, rated: bool, end_time: u64) -> Game {
        Game {
            time_control: "600".to_string(),
            time_class: "rapid".to_string(),
            rated,
            end_time,
            white: GamePlayer {
                username: "Hero".to_string(),
                rating: 1500,
                result: result.to_string(),
            },
            black: GamePlayer {
                username: "Villain".to_string(),
                rating: 1480,
                result: opponent_result.to_string(),
            },
            ..Game::default()
        }
    }

    #[test]
    fn test_format_time_control() {
        assert_eq!(format_time_control("600"), "10 min");
        assert_eq!(format_time_control("600+5"), "10 min+5");
        assert_eq!(format_time_control("1/86400"), "1/86400");
    }

    #[test]
    fn test_render_profile_includes_otb_estimate() {
        let profile = PlayerProfile {
            username: "hero".to_string(),
            url: "https://www.chess.com/member/hero".to_string(),
            followers: 10,
            joined: 1178556600,
            title: Some("FM".to_string()),
            ..PlayerProfile::default()
        };
        let stats = PlayerStats {
            chess_rapid: Some(TimeClassStats {
                last: Some(LastRating { rating: 1500 }),
                record: None,
            }),
            chess_blitz: Some(TimeClassStats {
                last: Some(LastRating { rating: 1400 }),
                record: None,
            }),
            ..PlayerStats::default()
        };
        let text = render_profile(&profile, &stats);
        assert!(text.contains("hero [FM]"));
        assert!(text.contains("Est. OTB rating: 1460"));
        assert!(text.contains("member since May 2007"));
    }

    #[test]
    fn test_render_profile_omits_otb_without_stats() {
        let profile = PlayerProfile {
            username: "hero".to_string(),
            ..PlayerProfile::default()
        };
        let text = render_profile(&profile, &PlayerStats::default());
        assert!(!text.contains("OTB"));
    }

    #[test]
    fn test_render_win_rates() {
        let stats = PlayerStats {
            chess_rapid: Some(TimeClassStats {
                last: None,
                record: Some(WinLossDraw {
                    win: 3,
                    loss: 1,
                    draw: 0,
                }),
            }),
            ..PlayerStats::default()
        };
        let text = render_win_rates(&stats);
        assert!(text.contains("Rapid"));
        assert!(text.contains("75%"));
        assert!(!text.contains("Blitz"));
    }

    #[test]
    fn test_render_win_rates_empty_without_records() {
        assert!(render_win_rates(&PlayerStats::default()).is_empty());
    }

    #[test]
    fn test_render_game_list_labels() {
        let games = vec![subject_game("win", "checkmated", true, 100)];
        let text = render_game_list(&games, "hero");
        assert!(text.contains("W vs Villain (1480)"));
        assert!(text.contains("Won by Checkmate"));
        assert!(text.contains("10 min"));
    }

    #[test]
    fn test_render_game_list_placeholder_when_empty() {
        let text = render_game_list(&[], "hero");
        assert!(text.contains("No games this month"));
    }

    #[test]
    fn test_render_rating_series_omitted_below_two_points() {
        let games = vec![subject_game("win", "resigned", true, 100)];
        assert!(render_rating_series(&games, "hero").is_empty());
    }

    #[test]
    fn test_render_rating_series_rows() {
        let games = vec![
            subject_game("win", "resigned", true, 1700000000),
            subject_game("checkmated", "win", true, 1700086400),
        ];
        let text = render_rating_series(&games, "hero");
        assert!(text.contains("Rating Monitor (1450-1550)"));
        assert_eq!(text.matches("rapid 1500").count(), 2);
    }

    #[test]
    fn test_render_color_performance() {
        let games = vec![
            subject_game("win", "resigned", true, 100),
            subject_game("agreed", "agreed", false, 200),
        ];
        let text = render_color_performance(&games, "hero");
        assert!(text.contains("Playing White  50% win rate  (2 games, 1 wins, 1 draws)"));
        assert!(text.contains("Playing Black   0% win rate  (0 games, 0 wins, 0 draws)"));
    }
}
