//! Heuristic factors, personality weights and selector settings.
//!
//! All of these are plain configuration values. The host deserializes them
//! from its own profile format and passes them into the selector; nothing
//! here is global.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Named heuristic factors, each valued in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    /// How much of the hand the move sheds; 1 when it goes out.
    FinishPriority,
    /// How much of the hand's bomb material the move spends or breaks.
    BombRisk,
    /// 1 when nothing unseen of the same shape can answer the move,
    /// otherwise the strength of its top card.
    LeadAggression,
    /// Share of aces and 2s kept back.
    DefenseHoldouts,
    /// Share of run cards kept intact.
    SequenceValue,
    /// Move strength scaled by how close an opponent is to going out.
    OpponentPressure,
}

impl Factor {
    pub const ALL: [Factor; 6] = [
        Factor::FinishPriority,
        Factor::BombRisk,
        Factor::LeadAggression,
        Factor::DefenseHoldouts,
        Factor::SequenceValue,
        Factor::OpponentPressure,
    ];

    pub const COUNT: usize = 6;

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Factor::FinishPriority => "finish_priority",
            Factor::BombRisk => "bomb_risk",
            Factor::LeadAggression => "lead_aggression",
            Factor::DefenseHoldouts => "defense_holdouts",
            Factor::SequenceValue => "sequence_value",
            Factor::OpponentPressure => "opponent_pressure",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseAiError {
    #[error("unknown heuristic factor {0:?}")]
    UnknownFactor(String),
    #[error("unknown personality {0:?}")]
    UnknownPersonality(String),
    #[error("unknown difficulty {0:?}")]
    UnknownDifficulty(String),
}

impl FromStr for Factor {
    type Err = ParseAiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Factor::ALL
            .into_iter()
            .find(|factor| factor.name() == key)
            .ok_or_else(|| ParseAiError::UnknownFactor(s.to_string()))
    }
}

/// Signed bias per factor. Missing keys default to 0; unknown keys are
/// rejected.
///
/// ```
/// use tien_len::ai::{AIWeights, Factor};
///
/// let weights: AIWeights = serde_json::from_str(r#"{"bomb_risk": -0.5}"#).unwrap();
/// assert_eq!(weights.get(Factor::BombRisk), -0.5);
/// assert_eq!(weights.get(Factor::FinishPriority), 0.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AIWeights {
    pub finish_priority: f64,
    pub bomb_risk: f64,
    pub lead_aggression: f64,
    pub defense_holdouts: f64,
    pub sequence_value: f64,
    pub opponent_pressure: f64,
}

impl AIWeights {
    #[must_use]
    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::FinishPriority => self.finish_priority,
            Factor::BombRisk => self.bomb_risk,
            Factor::LeadAggression => self.lead_aggression,
            Factor::DefenseHoldouts => self.defense_holdouts,
            Factor::SequenceValue => self.sequence_value,
            Factor::OpponentPressure => self.opponent_pressure,
        }
    }

    pub fn set(&mut self, factor: Factor, value: f64) {
        let slot = match factor {
            Factor::FinishPriority => &mut self.finish_priority,
            Factor::BombRisk => &mut self.bomb_risk,
            Factor::LeadAggression => &mut self.lead_aggression,
            Factor::DefenseHoldouts => &mut self.defense_holdouts,
            Factor::SequenceValue => &mut self.sequence_value,
            Factor::OpponentPressure => &mut self.opponent_pressure,
        };
        *slot = value;
    }

    #[must_use]
    pub fn with(mut self, factor: Factor, value: f64) -> Self {
        self.set(factor, value);
        self
    }

    /// Build from loose key-value pairs, as stored in a profile.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Result<Self, ParseAiError> {
        pairs.into_iter().try_fold(Self::default(), |weights, (key, value)| {
            Ok(weights.with(key.parse()?, value))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (Factor, f64)> + '_ {
        Factor::ALL.into_iter().map(|factor| (factor, self.get(factor)))
    }
}

/// Selector tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Softmax temperature over final scores (0 = argmax with ties sampled).
    pub temperature: f64,

    /// Scores within this distance of the best count as ties at temperature 0.
    pub tie_epsilon: f64,

    /// A follower passes when every move scores below this.
    pub pass_baseline: f64,

    /// Chance a follower passes with playable moves in hand.
    pub bluff_chance: f64,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            tie_epsilon: 0.02,
            pass_baseline: 0.2,
            bluff_chance: 0.0,
        }
    }
}

impl SelectorConfig {
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_tie_epsilon(mut self, epsilon: f64) -> Self {
        self.tie_epsilon = epsilon;
        self
    }

    pub fn with_pass_baseline(mut self, baseline: f64) -> Self {
        self.pass_baseline = baseline;
        self
    }

    pub fn with_bluff_chance(mut self, chance: f64) -> Self {
        self.bluff_chance = chance;
        self
    }
}

/// Named AI presets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    #[default]
    Balanced,
    /// Sheds fast, leads high, spends holdouts freely.
    Aggressive,
    /// Keeps bombs, holdouts and runs; passes readily.
    Defensive,
    /// Near-uniform choice among legal moves.
    Random,
}

impl Personality {
    pub const ALL: [Personality; 4] = [
        Personality::Balanced,
        Personality::Aggressive,
        Personality::Defensive,
        Personality::Random,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Personality::Balanced => "balanced",
            Personality::Aggressive => "aggressive",
            Personality::Defensive => "defensive",
            Personality::Random => "random",
        }
    }

    #[must_use]
    pub fn weights(self) -> AIWeights {
        match self {
            Personality::Balanced => AIWeights {
                finish_priority: 0.1,
                opponent_pressure: 0.1,
                ..AIWeights::default()
            },
            Personality::Aggressive => AIWeights {
                finish_priority: 0.6,
                bomb_risk: 0.1,
                lead_aggression: 0.4,
                defense_holdouts: -0.3,
                sequence_value: 0.0,
                opponent_pressure: 0.2,
            },
            Personality::Defensive => AIWeights {
                finish_priority: 0.0,
                bomb_risk: -0.4,
                lead_aggression: -0.4,
                defense_holdouts: 0.6,
                sequence_value: 0.2,
                opponent_pressure: 0.3,
            },
            Personality::Random => AIWeights::default(),
        }
    }

    #[must_use]
    pub fn selector_config(self) -> SelectorConfig {
        let config = SelectorConfig::default();
        match self {
            Personality::Balanced => config.with_temperature(0.02),
            Personality::Aggressive => config.with_pass_baseline(0.0).with_bluff_chance(0.05),
            Personality::Defensive => config.with_pass_baseline(0.35).with_bluff_chance(0.3),
            Personality::Random => config.with_temperature(10.0).with_pass_baseline(-1.0),
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Personality {
    type Err = ParseAiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Personality::ALL
            .into_iter()
            .find(|p| p.name() == key)
            .ok_or_else(|| ParseAiError::UnknownPersonality(s.to_string()))
    }
}

/// How hard a computer player thinks.
///
/// Easy picks almost at random, Normal scores moves on their own, Hard
/// weighs the next player's best reply, and Expert and Master search one
/// and two plies ahead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Expert,
    Master,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Expert,
        Difficulty::Master,
    ];

    /// Temperature that flattens Easy's pick to near-uniform.
    const EASY_TEMPERATURE: f64 = 100.0;

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
            Difficulty::Master => "master",
        }
    }

    /// Plies searched, counting the move itself. Zero below Expert.
    #[must_use]
    pub const fn search_depth(self) -> usize {
        match self {
            Difficulty::Expert => 1,
            Difficulty::Master => 2,
            _ => 0,
        }
    }

    /// Adjust a personality's selector settings for this level.
    #[must_use]
    pub fn tune(self, config: SelectorConfig) -> SelectorConfig {
        match self {
            Difficulty::Easy => config
                .with_temperature(Self::EASY_TEMPERATURE)
                .with_pass_baseline(-1.0),
            _ => config,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = ParseAiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Difficulty::ALL
            .into_iter()
            .find(|d| d.name() == key)
            .ok_or_else(|| ParseAiError::UnknownDifficulty(s.to_string()))
    }
}
