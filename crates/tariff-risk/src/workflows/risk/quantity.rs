use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::domain::SignalResult;

/// Normalized quantity above which the quantity sub-score is maximal.
pub const LARGE_VOLUME_THRESHOLD: f64 = 10_000.0;
pub const MEDIUM_VOLUME_THRESHOLD: f64 = 1_000.0;
pub const SMALL_VOLUME_THRESHOLD: f64 = 100.0;

pub const LARGE_VOLUME_SCORE: u8 = 100;
pub const MEDIUM_VOLUME_SCORE: u8 = 50;
pub const SMALL_VOLUME_SCORE: u8 = 20;

/// Units accepted for a line item's quantity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum QuantityUnit {
    #[default]
    Kilogram,
    Ton,
    Pound,
    Unit,
    Barrel,
    Liter,
    Gallon,
    CubicMeter,
    Piece,
    Box,
    Container,
    Sheet,
    Roll,
    Bag,
    Dozen,
    Pallet,
    Carton,
    Set,
    Pair,
    Pack,
    /// Unrecognized unit text, kept verbatim and converted unscaled.
    Other(String),
}

impl QuantityUnit {
    pub const KNOWN: [QuantityUnit; 20] = [
        QuantityUnit::Kilogram,
        QuantityUnit::Ton,
        QuantityUnit::Pound,
        QuantityUnit::Unit,
        QuantityUnit::Barrel,
        QuantityUnit::Liter,
        QuantityUnit::Gallon,
        QuantityUnit::CubicMeter,
        QuantityUnit::Piece,
        QuantityUnit::Box,
        QuantityUnit::Container,
        QuantityUnit::Sheet,
        QuantityUnit::Roll,
        QuantityUnit::Bag,
        QuantityUnit::Dozen,
        QuantityUnit::Pallet,
        QuantityUnit::Carton,
        QuantityUnit::Set,
        QuantityUnit::Pair,
        QuantityUnit::Pack,
    ];

    /// Parses unit text, falling back to [`QuantityUnit::Other`] for anything unknown.
    /// Blank text yields the default unit.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "" | "kg" | "kgs" | "kilogram" | "kilograms" => Self::Kilogram,
            "ton" | "tons" | "tonne" | "tonnes" | "t" => Self::Ton,
            "lb" | "lbs" | "pound" | "pounds" => Self::Pound,
            "unit" | "units" => Self::Unit,
            "barrel" | "barrels" | "bbl" => Self::Barrel,
            "liter" | "liters" | "litre" | "litres" | "l" => Self::Liter,
            "gallon" | "gallons" | "gal" => Self::Gallon,
            "m3" | "m\u{b3}" | "cubic-meter" | "cubic meter" | "cubic-meters" | "cubic meters"
            | "cubic_meter" => Self::CubicMeter,
            "piece" | "pieces" | "pcs" => Self::Piece,
            "box" | "boxes" => Self::Box,
            "container" | "containers" => Self::Container,
            "sheet" | "sheets" => Self::Sheet,
            "roll" | "rolls" => Self::Roll,
            "bag" | "bags" => Self::Bag,
            "dozen" | "dozens" => Self::Dozen,
            "pallet" | "pallets" => Self::Pallet,
            "carton" | "cartons" => Self::Carton,
            "set" | "sets" => Self::Set,
            "pair" | "pairs" => Self::Pair,
            "pack" | "packs" => Self::Pack,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Kilogram => "kg",
            Self::Ton => "ton",
            Self::Pound => "lb",
            Self::Unit => "unit",
            Self::Barrel => "barrel",
            Self::Liter => "liter",
            Self::Gallon => "gallon",
            Self::CubicMeter => "m3",
            Self::Piece => "piece",
            Self::Box => "box",
            Self::Container => "container",
            Self::Sheet => "sheet",
            Self::Roll => "roll",
            Self::Bag => "bag",
            Self::Dozen => "dozen",
            Self::Pallet => "pallet",
            Self::Carton => "carton",
            Self::Set => "set",
            Self::Pair => "pair",
            Self::Pack => "pack",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Factor converting this unit into the normalized base unit.
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Ton => 1000.0,
            Self::Pound => 0.4536,
            Self::Barrel => 159.0,
            Self::Gallon => 3.785,
            Self::CubicMeter => 1000.0,
            _ => 1.0,
        }
    }

    /// Converts a quantity into base units. Non-finite or negative input normalizes to 0.
    pub fn normalize(&self, quantity: f64) -> f64 {
        if !quantity.is_finite() || quantity < 0.0 {
            return 0.0;
        }
        quantity * self.multiplier()
    }
}

impl fmt::Display for QuantityUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuantityUnit {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for QuantityUnit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for QuantityUnit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Quantity sub-score: deterministic threshold bands over the normalized quantity.
pub fn quantity_risk(quantity: f64, unit: &QuantityUnit) -> SignalResult {
    SignalResult::score_only(score_normalized(unit.normalize(quantity)))
}

fn score_normalized(normalized: f64) -> u8 {
    if normalized > LARGE_VOLUME_THRESHOLD {
        LARGE_VOLUME_SCORE
    } else if normalized > MEDIUM_VOLUME_THRESHOLD {
        MEDIUM_VOLUME_SCORE
    } else if normalized > SMALL_VOLUME_THRESHOLD {
        SMALL_VOLUME_SCORE
    } else {
        0
    }
}
