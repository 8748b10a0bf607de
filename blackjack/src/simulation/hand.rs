use super::Card;

const BLACKJACK: u8 = 21;

/// One group of cards with the money riding on it.
#[derive(Debug, Clone, Default)]
pub struct Hand {
    cards: Vec<Card>,
    bet: u32,
    doubled: bool,
    /// Index (in the owning `Seat`) of the original hand this one was split from.
    split_from: Option<usize>,
}

impl Hand {
    pub fn new() -> Hand {
        Hand {
            cards: Vec::with_capacity(3),
            ..Default::default()
        }
    }

    pub fn with_bet(bet: u32) -> Hand {
        Hand {
            bet,
            ..Hand::new()
        }
    }

    pub fn receive_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Returns `(total, soft)`. Aces start at 11 and are demoted to 1 one at a
    /// time while the total is over 21. A hand is soft while an Ace is still
    /// counted as 11.
    pub fn value(&self) -> (u8, bool) {
        let mut total: u16 = 0;
        let mut aces = 0;
        for card in &self.cards {
            if card.is_ace() {
                aces += 1;
            }
            total += card.blackjack_value() as u16;
        }
        while total > BLACKJACK as u16 && aces > 0 {
            total -= 10;
            aces -= 1;
        }
        // Cards only ever add up to a few dozen points.
        (total as u8, aces > 0 && total <= BLACKJACK as u16)
    }

    pub fn total(&self) -> u8 {
        self.value().0
    }

    pub fn is_soft(&self) -> bool {
        self.value().1
    }

    pub fn is_natural(&self) -> bool {
        self.cards.len() == 2 && self.total() == BLACKJACK
    }

    pub fn is_bust(&self) -> bool {
        self.total() > BLACKJACK
    }

    /// Two cards of equal point value. A King and a Jack qualify.
    pub fn is_splittable(&self) -> bool {
        self.cards.len() == 2 && self.cards[0].blackjack_value() == self.cards[1].blackjack_value()
    }

    pub fn is_double_eligible(&self) -> bool {
        self.cards.len() == 2 && !self.doubled
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn bet(&self) -> u32 {
        self.bet
    }

    pub fn is_doubled(&self) -> bool {
        self.doubled
    }

    pub fn split_from(&self) -> Option<usize> {
        self.split_from
    }

    pub fn clear(&mut self) {
        self.cards.clear();
        self.bet = 0;
        self.doubled = false;
        self.split_from = None;
    }
}

/// Represents all hands of the player in one round. May contain more than 1 hand
/// because of split.
#[derive(Debug)]
pub struct Seat {
    hands: Vec<Hand>,
}

impl Default for Seat {
    fn default() -> Self {
        Seat::new()
    }
}

impl Seat {
    pub fn new() -> Seat {
        Seat {
            hands: vec![Hand::new()],
        }
    }

    /// The given hand receives a given card.
    pub fn receive_card(&mut self, hand_index: usize, card: Card) {
        self.hands[hand_index].receive_card(card);
    }

    /// Splits the given hand. The second card moves to a new hand carrying the same
    /// bet, which is appended after all existing hands. Returns its index.
    ///
    /// Panics if the hand holds no card.
    pub fn split_hand(&mut self, hand_index: usize) -> usize {
        let origin = self.origin_of(hand_index);
        let hand = &mut self.hands[hand_index];
        let card = hand.cards.pop().expect("Cannot split an empty hand");
        let mut new_hand = Hand::with_bet(hand.bet);
        new_hand.receive_card(card);
        new_hand.split_from = Some(origin);
        self.hands.push(new_hand);
        self.hands.len() - 1
    }

    /// Doubles down the given hand. Returns the extra money put on it.
    pub fn double_down(&mut self, hand_index: usize) -> u32 {
        let hand = &mut self.hands[hand_index];
        let extra = hand.bet;
        hand.bet += extra;
        hand.doubled = true;
        extra
    }

    /// Number of hands already split off the original hand of the given hand.
    pub fn split_count(&self, hand_index: usize) -> usize {
        let origin = self.origin_of(hand_index);
        self.hands
            .iter()
            .filter(|hand| hand.split_from == Some(origin))
            .count()
    }

    pub fn get_number_of_hands(&self) -> usize {
        self.hands.len()
    }

    pub fn hand(&self, hand_index: usize) -> &Hand {
        &self.hands[hand_index]
    }

    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    pub fn set_original_bet(&mut self, bet: u32) {
        self.hands[0].bet = bet;
    }

    /// Clears all the cards in all hands. Removes all the extra hands (i.e., hands
    /// that come from split), leaving only 1 original hand, and it is empty.
    pub fn clear(&mut self) {
        self.hands.truncate(1);
        self.hands[0].clear();
    }

    fn origin_of(&self, hand_index: usize) -> usize {
        self.hands[hand_index].split_from.unwrap_or(hand_index)
    }
}
