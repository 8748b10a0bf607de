mod error;
pub mod progression;
pub mod simulation;
pub mod statistics;

use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};

pub use error::BlackjackError;
pub use progression::BettingProgression;
pub use statistics::{RoundOutcome, Statistics};

pub const MAX_NUMBER_OF_DECKS: u8 = 8;
pub const MAX_SPLITS: u8 = 4;

/// The table rules a simulation runs under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub number_of_decks: u8,
    pub dealer_rule: DealerRule,
    pub game_style: GameStyle,
    /// Reshuffle implicitly when the shoe runs dry. Otherwise the shoe must be
    /// reshuffled once the cut card is reached.
    pub auto_shuffle: bool,
    /// Maximum number of hands that may be split off the original hand.
    pub max_splits: u8,
    pub base_unit: u32,
    pub cut_card_proportion: f64,
}

impl Default for Rule {
    fn default() -> Self {
        Rule {
            number_of_decks: 6,
            dealer_rule: DealerRule::StandAll17,
            game_style: GameStyle::American,
            auto_shuffle: true,
            max_splits: 2,
            base_unit: 1,
            cut_card_proportion: 0.8,
        }
    }
}

impl Rule {
    /// Checks that every parameter is within its supported range.
    pub fn validate(&self) -> Result<(), BlackjackError> {
        if self.number_of_decks == 0 || self.number_of_decks > MAX_NUMBER_OF_DECKS {
            return Err(BlackjackError::InvalidConfiguration(format!(
                "number_of_decks must be in [1, {}], got {}",
                MAX_NUMBER_OF_DECKS, self.number_of_decks
            )));
        }
        if self.max_splits == 0 || self.max_splits > MAX_SPLITS {
            return Err(BlackjackError::InvalidConfiguration(format!(
                "max_splits must be in [1, {}], got {}",
                MAX_SPLITS, self.max_splits
            )));
        }
        if self.base_unit == 0 {
            return Err(BlackjackError::InvalidConfiguration(String::from(
                "base_unit must be positive",
            )));
        }
        if !(self.cut_card_proportion > 0.0 && self.cut_card_proportion <= 1.0) {
            return Err(BlackjackError::InvalidConfiguration(format!(
                "cut_card_proportion must be in (0, 1], got {}",
                self.cut_card_proportion
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_enum_str, Deserialize_enum_str)]
pub enum DealerRule {
    /// Dealer stands on every 17.
    #[serde(rename = "s17")]
    StandAll17,
    /// Dealer draws to a soft 17.
    #[serde(rename = "h17")]
    HitSoft17,
}

/// Regional dealing style. Decides when the dealer's second card arrives and how
/// a dealer natural is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_enum_str, Deserialize_enum_str)]
pub enum GameStyle {
    /// Hole card dealt up front, dealer peeks with a ten or an Ace showing.
    #[serde(rename = "A")]
    American,
    /// No hole card. A dealer natural takes every wager on the table.
    #[serde(rename = "E")]
    European,
    /// No hole card. A dealer natural takes only the original bet of each hand.
    #[serde(rename = "M")]
    Macau,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Hit,
    Stand,
    Double,
    Split,
}
