use super::{Card, Suit};
use crate::BlackjackError;

use strum::IntoEnumIterator;

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

const CARDS_PER_DECK: usize = 52;

/// What happens when the shoe runs low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShufflePolicy {
    /// Reshuffle silently as soon as the shoe is empty. Dealing never fails.
    AutoReshuffle,
    /// The caller reshuffles at round boundaries once the cut card is reached.
    /// Dealing from an empty shoe is an error.
    CutCard,
}

/// Represents a shoe in the real world.
#[derive(Debug, Clone)]
pub struct Shoe {
    number_of_decks: u8,
    policy: ShufflePolicy,
    cut_card_index: usize,
    cards: Vec<Card>,
    current_index: usize,
    rng: ChaCha8Rng,
}

impl Shoe {
    /// Creates a new shoe and shuffles it with the given generator.
    pub fn new(
        number_of_decks: u8,
        policy: ShufflePolicy,
        cut_card_proportion: f64,
        rng: ChaCha8Rng,
    ) -> Shoe {
        let size = number_of_decks as usize * CARDS_PER_DECK;
        let mut shoe = Shoe {
            number_of_decks,
            policy,
            cut_card_index: (cut_card_proportion * size as f64) as usize,
            cards: ordered_cards(number_of_decks),
            current_index: 0,
            rng,
        };
        shoe.shuffle();
        shoe
    }

    /// Returns the dealt cards back into the shoe and shuffles.
    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut self.rng);
        self.current_index = 0;
        log::debug!(
            "Shuffled a shoe of {} deck(s), cut card at {}",
            self.number_of_decks,
            self.cut_card_index
        );
    }

    /// Returns the dealt cards back into the shoe, and shuffles. This method makes
    /// sure the given first few cards will be dealt first, in the given order.
    /// Cards are given by face value (1 is an Ace, 11 to 13 are J, Q and K).
    ///
    /// Panics if the shoe does not hold the requested cards.
    pub fn shuffle_with_firsts(&mut self, firsts: &[u8]) {
        self.cards = ordered_cards(self.number_of_decks);
        for (idx, face_value) in firsts.iter().enumerate() {
            let position = self.cards[idx..]
                .iter()
                .position(|card| card.face_value() == *face_value)
                .unwrap_or_else(|| panic!("The given first cards are invalid: {:?}", firsts));
            self.cards.swap(idx, idx + position);
        }
        self.cards[firsts.len()..].shuffle(&mut self.rng);
        self.current_index = 0;
    }

    /// Deals the next card. An empty shoe reshuffles itself under
    /// `ShufflePolicy::AutoReshuffle` and fails under `ShufflePolicy::CutCard`.
    pub fn deal_card(&mut self) -> Result<Card, BlackjackError> {
        if self.remaining() == 0 {
            match self.policy {
                ShufflePolicy::AutoReshuffle => self.shuffle(),
                ShufflePolicy::CutCard => {
                    return Err(BlackjackError::ExhaustedShoe {
                        dealt: self.current_index,
                    })
                }
            }
        }
        let card = self.cards[self.current_index];
        self.current_index += 1;
        Ok(card)
    }

    /// Only meaningful at round boundaries.
    pub fn needs_shuffle(&self) -> bool {
        match self.policy {
            ShufflePolicy::AutoReshuffle => self.remaining() == 0,
            ShufflePolicy::CutCard => self.reached_cut_card(),
        }
    }

    /// Checks if the cut card has been reached.
    pub fn reached_cut_card(&self) -> bool {
        self.current_index >= self.cut_card_index
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.current_index
    }

    /// Cards dealt since the last shuffle.
    pub fn dealt(&self) -> usize {
        self.current_index
    }

    pub fn size(&self) -> usize {
        self.cards.len()
    }

    pub fn penetration(&self) -> f64 {
        self.current_index as f64 / self.cards.len() as f64
    }

    pub fn policy(&self) -> ShufflePolicy {
        self.policy
    }

    pub fn number_of_decks(&self) -> u8 {
        self.number_of_decks
    }
}

fn ordered_cards(number_of_decks: u8) -> Vec<Card> {
    let mut cards = Vec::with_capacity(number_of_decks as usize * CARDS_PER_DECK);
    for _ in 0..number_of_decks {
        for suit in Suit::iter() {
            for face_value in 1..=13 {
                cards.push(Card::new(face_value, suit));
            }
        }
    }
    cards
}
