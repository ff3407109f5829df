//! Schedule - The fixed programme sheet
//!
//! Fifteen rows of four cells. A concrete cell such as `B2` names a helmet
//! color and a lineup number; a nomination cell such as `V/R` names the two
//! colors a heat 14/15 gate may end up with.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::gate::{Gate, HelmetColor, Side};

pub const HEAT_COUNT: usize = 15;
/// Last heat before the nomination heats
pub const LAST_REGULAR_HEAT: u8 = 13;
pub const NOMINATION_HEATS: [u8; 2] = [14, 15];

/// Elitserien 2.15.7, in programme order
pub const ELITSERIEN_2_15_7: [[&str; 4]; HEAT_COUNT] = [
    ["B2", "V1", "R1", "G2"],
    ["G7", "R6", "V6", "B7"],
    ["R3", "V3", "B4", "G4"],
    ["V5", "B5", "G7", "R6"],
    ["B7", "G4", "R2", "V6"],
    ["G2", "R3", "V1", "B4"],
    ["G4", "R1", "V3", "B2"],
    ["B4", "G7", "R3", "V5"],
    ["B5", "G2", "R6", "V1"],
    ["V6", "B7", "G5", "R1"],
    ["V3", "B4", "G2", "R5"],
    ["V1", "B2", "G4", "R3"],
    ["R1", "G5", "B5", "V3"],
    ["V/R", "V/R", "G/B", "G/B"],
    ["R/V", "R/V", "B/G", "B/G"],
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Schedule must have 15 heats, got {0}")]
    WrongHeatCount(usize),

    #[error("Heat {heat} must have 4 cells, got {count}")]
    WrongCellCount { heat: u8, count: usize },

    #[error("Heat {heat}: cannot parse cell '{token}'")]
    BadToken { heat: u8, token: String },

    #[error("Heat {heat}: lineup number {lineup} is outside 1-7")]
    BadLineup { heat: u8, lineup: u8 },

    #[error("Heat {heat}: nomination cells are only allowed in heats 14 and 15")]
    PlaceholderOutsideNomination { heat: u8 },

    #[error("Heat {heat}: cell '{token}' must offer one color per side")]
    BadChoice { heat: u8, token: String },

    #[error("Heat {heat} mixes rider cells and nomination cells")]
    MixedRow { heat: u8 },

    #[error("Heat {heat} must have two home and two away cells")]
    Unbalanced { heat: u8 },

    #[error("Heat {heat} lists {side} lineup number {lineup} twice")]
    DuplicateLineup { heat: u8, side: Side, lineup: u8 },
}

/// One cell of the programme, already bound to its gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GateCell {
    Rider { color: HelmetColor, lineup: u8 },
    Choice { choices: [HelmetColor; 2] },
}

impl GateCell {
    /// Parse a single token without gate context
    fn parse(heat: u8, token: &str) -> Result<GateCell, ScheduleError> {
        let bad = || ScheduleError::BadToken {
            heat,
            token: token.to_string(),
        };
        let token = token.trim();

        if let Some((left, right)) = token.split_once('/') {
            let first = single_color(left).ok_or_else(bad)?;
            let second = single_color(right).ok_or_else(bad)?;
            if first.side() == second.side() {
                return Err(ScheduleError::BadChoice {
                    heat,
                    token: token.to_string(),
                });
            }
            return Ok(GateCell::Choice {
                choices: [first, second],
            });
        }

        let mut chars = token.chars();
        let color = chars
            .next()
            .and_then(HelmetColor::from_code)
            .ok_or_else(bad)?;
        let lineup: u8 = chars.as_str().parse().map_err(|_| bad())?;
        if !(1..=7).contains(&lineup) {
            return Err(ScheduleError::BadLineup { heat, lineup });
        }
        Ok(GateCell::Rider { color, lineup })
    }

    pub fn side(&self) -> Option<Side> {
        match self {
            GateCell::Rider { color, .. } => Some(color.side()),
            GateCell::Choice { .. } => None,
        }
    }
}

fn single_color(s: &str) -> Option<HelmetColor> {
    let mut chars = s.trim().chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    HelmetColor::from_code(c)
}

/// A parsed, gate-ordered programme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    rows: Vec<[GateCell; 4]>,
}

impl Schedule {
    pub fn elitserien() -> Self {
        // The built-in table is covered by tests; parsing it cannot fail.
        match Self::parse(&ELITSERIEN_2_15_7) {
            Ok(schedule) => schedule,
            Err(e) => unreachable!("built-in schedule is invalid: {}", e),
        }
    }

    /// Parse programme rows (heat 1 first)
    ///
    /// Concrete rows are re-bound so home cells take gates 1 and 3 and away
    /// cells gates 2 and 4, keeping their programme order. Nomination rows
    /// are positional.
    pub fn parse<I, R, T>(rows: I) -> Result<Self, ScheduleError>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| row.into_iter().map(|t| t.as_ref().to_string()).collect())
            .collect();
        if rows.len() != HEAT_COUNT {
            return Err(ScheduleError::WrongHeatCount(rows.len()));
        }

        let mut parsed = Vec::with_capacity(HEAT_COUNT);
        for (idx, tokens) in rows.iter().enumerate() {
            let heat = (idx + 1) as u8;
            if tokens.len() != 4 {
                return Err(ScheduleError::WrongCellCount {
                    heat,
                    count: tokens.len(),
                });
            }

            let cells = tokens
                .iter()
                .map(|t| GateCell::parse(heat, t))
                .collect::<Result<Vec<_>, _>>()?;
            parsed.push(bind_row(heat, &cells)?);
        }

        Ok(Self { rows: parsed })
    }

    /// Cells of a heat (1-15), indexed by gate
    pub fn row(&self, heat_number: u8) -> Option<&[GateCell; 4]> {
        let idx = usize::from(heat_number).checked_sub(1)?;
        self.rows.get(idx)
    }

    pub fn rows(&self) -> impl Iterator<Item = (u8, &[GateCell; 4])> {
        self.rows
            .iter()
            .enumerate()
            .map(|(idx, row)| ((idx + 1) as u8, row))
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::elitserien()
    }
}

fn bind_row(heat: u8, cells: &[GateCell]) -> Result<[GateCell; 4], ScheduleError> {
    let choices = cells
        .iter()
        .filter(|c| matches!(c, GateCell::Choice { .. }))
        .count();

    if choices == cells.len() {
        if !NOMINATION_HEATS.contains(&heat) {
            return Err(ScheduleError::PlaceholderOutsideNomination { heat });
        }
        return Ok([cells[0], cells[1], cells[2], cells[3]]);
    }
    if choices > 0 {
        return Err(ScheduleError::MixedRow { heat });
    }

    let home: Vec<GateCell> = cells
        .iter()
        .copied()
        .filter(|c| c.side() == Some(Side::Home))
        .collect();
    let away: Vec<GateCell> = cells
        .iter()
        .copied()
        .filter(|c| c.side() == Some(Side::Away))
        .collect();
    if home.len() != 2 || away.len() != 2 {
        return Err(ScheduleError::Unbalanced { heat });
    }

    for (side, pair) in [(Side::Home, &home), (Side::Away, &away)] {
        if let (GateCell::Rider { lineup: a, .. }, GateCell::Rider { lineup: b, .. }) =
            (pair[0], pair[1])
        {
            if a == b {
                return Err(ScheduleError::DuplicateLineup {
                    heat,
                    side,
                    lineup: a,
                });
            }
        }
    }

    let mut bound = [home[0]; 4];
    for (side, pair) in [(Side::Home, &home), (Side::Away, &away)] {
        let gates: [Gate; 2] = side.gates();
        bound[gates[0].index()] = pair[0];
        bound[gates[1].index()] = pair[1];
    }
    Ok(bound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_schedule_parses() {
        let schedule = Schedule::parse(&ELITSERIEN_2_15_7).unwrap();
        assert_eq!(schedule.rows().count(), HEAT_COUNT);
    }

    #[test]
    fn test_rows_are_bound_by_side() {
        let schedule = Schedule::elitserien();

        // Heat 2 is printed G7 R6 V6 B7
        let row = schedule.row(2).unwrap();
        assert_eq!(
            row[Gate::One.index()],
            GateCell::Rider {
                color: HelmetColor::Red,
                lineup: 6
            }
        );
        assert_eq!(
            row[Gate::Two.index()],
            GateCell::Rider {
                color: HelmetColor::Yellow,
                lineup: 7
            }
        );
        assert_eq!(
            row[Gate::Three.index()],
            GateCell::Rider {
                color: HelmetColor::Blue,
                lineup: 7
            }
        );
        for (heat, row) in schedule.rows() {
            for gate in Gate::ALL {
                if let Some(side) = row[gate.index()].side() {
                    assert_eq!(side, gate.side(), "heat {} gate {}", heat, gate);
                }
            }
        }
    }

    #[test]
    fn test_nomination_rows_are_positional() {
        let schedule = Schedule::elitserien();
        let row = schedule.row(14).unwrap();
        assert_eq!(
            row[0],
            GateCell::Choice {
                choices: [HelmetColor::White, HelmetColor::Red]
            }
        );
        assert!(schedule.row(16).is_none());
        assert!(schedule.row(0).is_none());
    }

    #[test]
    fn test_main_riders_have_four_scheduled_rides() {
        let schedule = Schedule::elitserien();
        for side in [Side::Home, Side::Away] {
            for lineup in 1..=7u8 {
                let rides = schedule
                    .rows()
                    .flat_map(|(_, row)| row.iter())
                    .filter(|c| {
                        matches!(c, GateCell::Rider { color, lineup: l }
                            if color.side() == side && *l == lineup)
                    })
                    .count();
                let expected = if lineup <= 5 { 4 } else { 3 };
                assert_eq!(rides, expected, "{} lineup {}", side, lineup);
            }
        }
    }

    #[test]
    fn test_rejects_placeholder_outside_nomination() {
        let mut rows: Vec<Vec<String>> = ELITSERIEN_2_15_7
            .iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect();
        rows[3] = vec!["V/R".into(), "V/R".into(), "G/B".into(), "G/B".into()];
        assert_eq!(
            Schedule::parse(&rows),
            Err(ScheduleError::PlaceholderOutsideNomination { heat: 4 })
        );
    }

    #[test]
    fn test_rejects_bad_cells() {
        let mut rows: Vec<Vec<&str>> = ELITSERIEN_2_15_7.iter().map(|r| r.to_vec()).collect();

        rows[0] = vec!["B2", "V1", "R1", "G9"];
        assert_eq!(
            Schedule::parse(&rows),
            Err(ScheduleError::BadLineup { heat: 1, lineup: 9 })
        );

        rows[0] = vec!["B2", "V1", "R1", "B3"];
        assert_eq!(
            Schedule::parse(&rows),
            Err(ScheduleError::Unbalanced { heat: 1 })
        );

        rows[0] = vec!["B2", "V1", "R2", "G3"];
        assert!(matches!(
            Schedule::parse(&rows),
            Err(ScheduleError::DuplicateLineup { heat: 1, .. })
        ));

        rows[0] = vec!["X2", "V1", "R1", "G2"];
        assert!(matches!(
            Schedule::parse(&rows),
            Err(ScheduleError::BadToken { heat: 1, .. })
        ));

        rows[0] = vec!["B2", "V1", "R1", "G2"];
        rows[14] = vec!["R/B", "R/V", "B/G", "B/G"];
        assert!(matches!(
            Schedule::parse(&rows),
            Err(ScheduleError::BadChoice { heat: 15, .. })
        ));

        rows.pop();
        assert_eq!(Schedule::parse(&rows), Err(ScheduleError::WrongHeatCount(14)));
    }
}
