// src/render.rs
//
// Terminal tables for the leaderboard and the awards.

use prettytable::{format, Cell, Row, Table};
use tracing::warn;

use crate::score::{LeaderboardEntry, Outcome, Superlative};

const LEADERBOARD_HEADER: [&str; 12] = [
    "#", "Owner", "Rings", "Ring Years", "W", "L", "Win %", "PF", "PA", "Diff", "Moves",
    "GOAT Score",
];

/// Keep only the named owners, in leaderboard order. Names are matched after
/// trimming, case-insensitively. An empty filter keeps everyone.
pub fn filter_owners<'a>(entries: &'a [LeaderboardEntry], owners: &[String]) -> Vec<&'a LeaderboardEntry> {
    if owners.is_empty() {
        return entries.iter().collect();
    }
    let wanted: Vec<String> = owners.iter().map(|o| o.trim().to_lowercase()).collect();
    for name in &wanted {
        if !entries.iter().any(|e| e.owner().to_lowercase() == *name) {
            warn!(owner = %name, "owner not in leaderboard");
        }
    }
    entries
        .iter()
        .filter(|e| wanted.contains(&e.owner().to_lowercase()))
        .collect()
}

fn header(titles: &[&str]) -> Row {
    Row::new(
        titles
            .iter()
            .map(|t| Cell::new(t).style_spec("bFg"))
            .collect(),
    )
}

fn num(text: String) -> Cell {
    Cell::new(&text).style_spec("r")
}

fn whole(v: f64) -> String {
    format!("{:.0}", v)
}

/// Rank is the position in the full leaderboard, so it survives filtering.
pub fn leaderboard_table(all: &[LeaderboardEntry], shown: &[&LeaderboardEntry]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(header(&LEADERBOARD_HEADER));

    for e in shown {
        let rank = all
            .iter()
            .position(|x| std::ptr::eq(x, *e))
            .map(|i| (i + 1).to_string())
            .unwrap_or_default();
        let s = &e.summary;
        table.add_row(Row::new(vec![
            num(rank),
            Cell::new(&s.owner),
            num(s.championships.to_string()),
            Cell::new(&s.championship_years_display()),
            num(whole(s.total_wins)),
            num(whole(s.total_losses)),
            num(format!("{:.3}", s.win_rate)),
            num(format!("{:.1}", s.total_points_for)),
            num(format!("{:.1}", s.total_points_against)),
            num(format!("{:.1}", s.point_differential)),
            num(whole(s.total_transactions)),
            num(format!("{:.1}", e.legacy_score)),
        ]));
    }
    table
}

/// Whole numbers print bare, small fractions (variances) keep four places.
fn award_value(v: f64) -> String {
    if v.fract() == 0.0 {
        whole(v)
    } else if v.abs() < 1.0 {
        format!("{:.4}", v)
    } else {
        format!("{:.1}", v)
    }
}

pub fn superlatives_table(awards: &[Superlative]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(header(&["Award", "Owner", "Value", "Detail"]));

    for award in awards {
        let row = match &award.outcome {
            Outcome::Winner {
                owner,
                value,
                detail,
            } => vec![
                Cell::new(award.title).style_spec("b"),
                Cell::new(owner),
                num(award_value(*value)),
                Cell::new(detail),
            ],
            Outcome::NotAvailable { reason } => vec![
                Cell::new(award.title).style_spec("b"),
                Cell::new(reason).style_spec("i"),
                Cell::new(""),
                Cell::new(""),
            ],
        };
        table.add_row(Row::new(row));
    }
    table
}
