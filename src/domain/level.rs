use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Granularity of a leaderboard scope. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeographicLevel {
    Region,
    Village,
    Town,
    City,
    Pincode,
    District,
    State,
    Country,
}

impl GeographicLevel {
    pub const ALL: [GeographicLevel; 8] = [
        GeographicLevel::Region,
        GeographicLevel::Village,
        GeographicLevel::Town,
        GeographicLevel::City,
        GeographicLevel::Pincode,
        GeographicLevel::District,
        GeographicLevel::State,
        GeographicLevel::Country,
    ];

    /// Lowercase identifier, also used inside storage keys.
    pub const fn as_str(self) -> &'static str {
        match self {
            GeographicLevel::Region => "region",
            GeographicLevel::Village => "village",
            GeographicLevel::Town => "town",
            GeographicLevel::City => "city",
            GeographicLevel::Pincode => "pincode",
            GeographicLevel::District => "district",
            GeographicLevel::State => "state",
            GeographicLevel::Country => "country",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            GeographicLevel::Region => "Region",
            GeographicLevel::Village => "Village",
            GeographicLevel::Town => "Town",
            GeographicLevel::City => "City",
            GeographicLevel::Pincode => "Pincode",
            GeographicLevel::District => "District",
            GeographicLevel::State => "State",
            GeographicLevel::Country => "Country",
        }
    }
}

impl fmt::Display for GeographicLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for GeographicLevel {
    type Err = CoreError;

    /// Accepts any casing of the level name ("Pincode", "PINCODE", "pincode").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        GeographicLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                CoreError::validation("geographic_level", format!("unknown level {:?}", s))
            })
    }
}
