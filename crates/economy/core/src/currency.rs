//! The closed set of named resources the economy tracks.

/// Currency identifier.
///
/// The set is closed at compile time; content never invents currencies at
/// runtime. String forms round-trip through strum in snake_case, which is
/// also the key encoding used by bundle snapshots.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Currency {
    /// Primary spendable currency.
    #[default]
    Funds,
    /// Experience-like currency driving formula multipliers.
    Skill,
    /// Throughput resource consumed by production nodes.
    Energy,
    /// Prestige-layer currency earned past softcap scales.
    Essence,
    /// Reputation currency granted by quest-style content.
    Renown,
}

impl Currency {
    /// Total number of currencies.
    pub const COUNT: usize = 5;

    /// Returns all currencies in canonical order.
    pub const fn all() -> [Currency; Self::COUNT] {
        [
            Currency::Funds,
            Currency::Skill,
            Currency::Energy,
            Currency::Essence,
            Currency::Renown,
        ]
    }
}
