//! Gates, sides and helmet colors
//!
//! Gates 1 and 3 always belong to the home side, gates 2 and 4 to the away
//! side. Each side races in two helmet colors.

use serde::{Deserialize, Serialize};

use super::rider::RiderId;

/// Home or away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    /// The two gates this side starts from, in binding order
    pub fn gates(&self) -> [Gate; 2] {
        match self {
            Side::Home => [Gate::One, Gate::Three],
            Side::Away => [Gate::Two, Gate::Four],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Home => "home",
            Side::Away => "away",
        }
    }
}

impl core::fmt::Display for Side {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Starting position within a heat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Gate {
    One,
    Two,
    Three,
    Four,
}

impl Gate {
    pub const ALL: [Gate; 4] = [Gate::One, Gate::Two, Gate::Three, Gate::Four];

    pub fn number(&self) -> u8 {
        match self {
            Gate::One => 1,
            Gate::Two => 2,
            Gate::Three => 3,
            Gate::Four => 4,
        }
    }

    /// Zero-based position in a heat's gate array
    pub fn index(&self) -> usize {
        usize::from(self.number() - 1)
    }

    pub fn side(&self) -> Side {
        match self {
            Gate::One | Gate::Three => Side::Home,
            Gate::Two | Gate::Four => Side::Away,
        }
    }

    pub fn from_number(number: u8) -> Option<Gate> {
        match number {
            1 => Some(Gate::One),
            2 => Some(Gate::Two),
            3 => Some(Gate::Three),
            4 => Some(Gate::Four),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Gate {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Gate::from_number(value).ok_or_else(|| format!("gate must be 1-4, got {}", value))
    }
}

impl From<Gate> for u8 {
    fn from(gate: Gate) -> u8 {
        gate.number()
    }
}

impl core::fmt::Display for Gate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Helmet colors used on the schedule sheet
///
/// Letters follow the Swedish programme: R(öd), B(lå), G(ul), V(it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelmetColor {
    Red,
    Blue,
    Yellow,
    White,
}

impl HelmetColor {
    pub fn from_code(code: char) -> Option<HelmetColor> {
        match code.to_ascii_uppercase() {
            'R' => Some(HelmetColor::Red),
            'B' => Some(HelmetColor::Blue),
            'G' => Some(HelmetColor::Yellow),
            'V' => Some(HelmetColor::White),
            _ => None,
        }
    }

    pub fn code(&self) -> char {
        match self {
            HelmetColor::Red => 'R',
            HelmetColor::Blue => 'B',
            HelmetColor::Yellow => 'G',
            HelmetColor::White => 'V',
        }
    }

    pub fn side(&self) -> Side {
        match self {
            HelmetColor::Red | HelmetColor::Blue => Side::Home,
            HelmetColor::Yellow | HelmetColor::White => Side::Away,
        }
    }

    /// Display color for scoreboards
    pub fn display_hex(&self) -> &'static str {
        match self {
            HelmetColor::Red => "#DC2626",
            HelmetColor::Blue => "#2563EB",
            HelmetColor::Yellow => "#FACC15",
            HelmetColor::White => "#FFFFFF",
        }
    }
}

impl core::fmt::Display for HelmetColor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A rider bound to a gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiderSlot {
    pub rider_id: RiderId,
    pub rider_name: String,
    pub side: Side,
    pub helmet: HelmetColor,
    pub lineup_number: u8,
    /// Scheduled reserve rides cannot be substituted
    #[serde(default)]
    pub locked: bool,
}

/// What occupies a gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GateAssignment {
    /// The roster has no rider for the scheduled lineup number
    Empty { helmet: HelmetColor, lineup_number: u8 },
    Concrete(RiderSlot),
    /// Heats 14-15 before nomination
    Placeholder { choices: [HelmetColor; 2] },
}

impl GateAssignment {
    pub fn rider(&self) -> Option<&RiderSlot> {
        match self {
            GateAssignment::Concrete(slot) => Some(slot),
            _ => None,
        }
    }

    pub fn rider_id(&self) -> Option<&RiderId> {
        self.rider().map(|slot| &slot.rider_id)
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, GateAssignment::Placeholder { .. })
    }

    /// A scheduled gate nobody has been put on yet
    pub fn is_vacant(&self) -> bool {
        matches!(self, GateAssignment::Empty { .. })
    }

    /// Helmet color the gate races in, once it is no longer a placeholder
    pub fn helmet(&self) -> Option<HelmetColor> {
        match self {
            GateAssignment::Concrete(slot) => Some(slot.helmet),
            GateAssignment::Empty { helmet, .. } => Some(*helmet),
            GateAssignment::Placeholder { .. } => None,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.rider().map(|slot| slot.locked).unwrap_or(false)
    }

    /// The placeholder candidate belonging to `side`
    pub fn choice_for(&self, side: Side) -> Option<HelmetColor> {
        match self {
            GateAssignment::Placeholder { choices } => {
                choices.iter().copied().find(|c| c.side() == side)
            }
            _ => None,
        }
    }
}
