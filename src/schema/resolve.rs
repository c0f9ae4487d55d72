// src/schema/resolve.rs

use std::collections::HashMap;
use tracing::{debug, instrument};

use super::types::{ColumnAliases, LogicalField};
use crate::error::SchemaError;
use crate::process::utils::normalize_header;

/// A resolved header: its position in the table and its text as found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub index: usize,
    pub header: String,
}

/// Every logical field mapped to a real column. Only built when all eight resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    columns: [ResolvedColumn; 8],
}

impl ColumnMap {
    pub fn get(&self, field: LogicalField) -> &ResolvedColumn {
        &self.columns[field as usize]
    }

    pub fn index(&self, field: LogicalField) -> usize {
        self.get(field).index
    }
}

/// Map each logical field to the first of its aliases present in `headers`.
///
/// Matching ignores case, surrounding whitespace and byte-order marks. When a
/// header appears twice the leftmost one is used. Fails with the complete list
/// of unresolved fields plus every header actually found.
#[instrument(level = "debug", skip_all, fields(headers = headers.len()))]
pub fn resolve(headers: &[String], aliases: &ColumnAliases) -> Result<ColumnMap, SchemaError> {
    let mut by_norm: HashMap<String, usize> = HashMap::with_capacity(headers.len());
    for (i, h) in headers.iter().enumerate() {
        by_norm.entry(normalize_header(h)).or_insert(i);
    }

    let mut resolved = Vec::with_capacity(LogicalField::ALL.len());
    let mut missing = Vec::new();

    for field in LogicalField::ALL {
        let hit = aliases
            .for_field(field)
            .iter()
            .find_map(|alias| by_norm.get(&normalize_header(alias)).copied());
        match hit {
            Some(index) => {
                debug!(%field, header = %headers[index], "resolved column");
                resolved.push((field, index));
            }
            None => missing.push(field),
        }
    }

    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns {
            missing,
            resolved: resolved
                .into_iter()
                .map(|(f, i)| (f, headers[i].clone()))
                .collect(),
            found: headers.to_vec(),
        });
    }

    // `resolved` is in LogicalField::ALL order, which matches the discriminants.
    let columns = std::array::from_fn(|slot| {
        let (_, index) = resolved[slot];
        ResolvedColumn {
            index,
            header: headers[index].clone(),
        }
    });
    Ok(ColumnMap { columns })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolves_spreadsheet_headers() {
        let h = headers(&[
            "\u{feff}Owner(s)",
            "Season",
            "Fantasy Champ",
            "Wins",
            "Losses",
            "PF",
            "PA",
            "Transactions",
        ]);
        let map = resolve(&h, &ColumnAliases::default()).unwrap();
        assert_eq!(map.index(LogicalField::Owner), 0);
        assert_eq!(map.get(LogicalField::Owner).header, "\u{feff}Owner(s)");
        assert_eq!(map.index(LogicalField::Transactions), 7);
    }

    #[test]
    fn resolves_case_and_whitespace_insensitively_in_any_order() {
        let h = headers(&[
            " total moves ",
            "pts against",
            "POINTS FOR",
            "l",
            "w",
            "CHAMP",
            "ff year",
            "team owner",
        ]);
        let map = resolve(&h, &ColumnAliases::default()).unwrap();
        assert_eq!(map.index(LogicalField::Owner), 7);
        assert_eq!(map.index(LogicalField::Season), 6);
        assert_eq!(map.index(LogicalField::Champion), 5);
        assert_eq!(map.index(LogicalField::Wins), 4);
        assert_eq!(map.index(LogicalField::Losses), 3);
        assert_eq!(map.index(LogicalField::PointsFor), 2);
        assert_eq!(map.index(LogicalField::PointsAgainst), 1);
        assert_eq!(map.index(LogicalField::Transactions), 0);
    }

    #[test]
    fn earlier_alias_wins_over_later_one() {
        // "Owner" precedes "Username" in the alias list.
        let h = headers(&[
            "Username", "Owner", "Season", "Champ", "W", "L", "PF", "PA", "Moves",
        ]);
        let map = resolve(&h, &ColumnAliases::default()).unwrap();
        assert_eq!(map.get(LogicalField::Owner).header, "Owner");
    }

    #[test]
    fn resolves_pulled_standings_headers() {
        let h = headers(&[
            "season",
            "draft_slot",
            "roster_id",
            "username",
            "display_name",
            "wins",
            "losses",
            "pf",
            "max_pf",
            "pa",
            "playoff_wins",
            "playoff_losses",
            "champion",
            "total_transactions",
        ]);
        let map = resolve(&h, &ColumnAliases::default()).unwrap();
        assert_eq!(map.get(LogicalField::Owner).header, "username");
        assert_eq!(map.get(LogicalField::Transactions).header, "total_transactions");
    }

    #[test]
    fn missing_wins_is_reported_with_the_other_seven_resolved() {
        let h = headers(&[
            "Owner", "Season", "Champ", "Victories", "Losses", "PF", "PA", "Moves",
        ]);
        let err = resolve(&h, &ColumnAliases::default()).unwrap_err();
        let SchemaError::MissingColumns {
            missing,
            resolved,
            found,
        } = err.clone();
        assert_eq!(missing, vec![LogicalField::Wins]);
        assert_eq!(resolved.len(), 7);
        assert!(resolved.iter().all(|(f, _)| *f != LogicalField::Wins));
        assert_eq!(found, h);

        let msg = err.to_string();
        assert!(msg.contains("wins"));
        assert!(msg.contains("\"Victories\""));
    }

    #[test]
    fn custom_aliases_override_defaults() {
        let mut aliases = ColumnAliases::default();
        aliases.wins = vec!["Victories".to_string()];
        let h = headers(&[
            "Owner", "Season", "Champ", "Victories", "Losses", "PF", "PA", "Moves",
        ]);
        let map = resolve(&h, &aliases).unwrap();
        assert_eq!(map.index(LogicalField::Wins), 3);
    }
}
