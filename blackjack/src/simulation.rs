pub mod hand;
pub mod shoe;
pub mod strategy;

use crate::{
    BettingProgression, BlackjackError, Decision, DealerRule, GameStyle, RoundOutcome, Rule,
    Statistics,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use strum_macros::EnumIter;

use self::{
    hand::{Hand, Seat},
    shoe::{Shoe, ShufflePolicy},
    strategy::{BasicStrategy, Strategy},
};

static FACE_VALUE_TO_BLACKJACK_VALUE: [u8; 13] = [11, 2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 10, 10];
const NATURAL_PAYOUT: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Suit {
    Diamond = 0,
    Club,
    Heart,
    Spade,
}

/// Represents a card in the real world with a suit and a face value (1 for Ace,
/// 11 to 13 for J, Q and K).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    face_value: u8,
    suit: Suit,
}

impl Card {
    /// Panics if the face value is not in `1..=13`.
    pub fn new(face_value: u8, suit: Suit) -> Card {
        assert!(
            (1..=13).contains(&face_value),
            "Invalid face value: {}",
            face_value
        );
        Card { face_value, suit }
    }

    pub fn face_value(&self) -> u8 {
        self.face_value
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// Point value with the Ace counted high. Hands demote Aces as needed.
    pub fn blackjack_value(&self) -> u8 {
        FACE_VALUE_TO_BLACKJACK_VALUE[(self.face_value - 1) as usize]
    }

    pub fn is_ace(&self) -> bool {
        self.face_value == 1
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let suit = match self.suit {
            Suit::Diamond => 'D',
            Suit::Club => 'C',
            Suit::Heart => 'H',
            Suit::Spade => 'S',
        };
        let value = match self.face_value {
            1 => 'A',
            10 => 'T',
            11 => 'J',
            12 => 'Q',
            13 => 'K',
            n @ 2..=9 => (b'0' + n) as char,
            _ => '?',
        };
        write!(f, "{}{}", suit, value)
    }
}

impl From<Card> for u8 {
    fn from(card: Card) -> u8 {
        card.suit as u8 * 13 + card.face_value - 1
    }
}

/// How a round came to its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEnd {
    /// The player's first two cards made a natural and the dealer had none.
    PlayerNatural,
    /// Player and dealer both had a natural.
    NaturalsPush,
    /// The dealer peeked at the hole card and found a natural.
    DealerPeekNatural,
    /// The dealer's late second card made a natural after the player acted.
    DealerNatural,
    /// Every hand was compared with the dealer's final hand.
    Showdown,
}

/// Result of a single hand against the dealer's final hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandOutcome {
    Win,
    Loss,
    Push,
}

/// What one round did to the player's money.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundSummary {
    pub outcome: RoundOutcome,
    pub end: RoundEnd,
    /// Profit over all hands.
    pub won: f64,
    /// Stakes forfeited over all hands.
    pub lost: f64,
}

impl RoundSummary {
    pub fn net(&self) -> f64 {
        self.won - self.lost
    }
}

/// Settles one hand that is still in play against the dealer's final hand.
pub fn showdown(hand: &Hand, dealer_hand: &Hand) -> HandOutcome {
    let total = hand.total();
    let dealer_total = dealer_hand.total();
    if hand.is_bust() {
        HandOutcome::Loss
    } else if dealer_hand.is_bust() || total > dealer_total {
        HandOutcome::Win
    } else if total < dealer_total {
        HandOutcome::Loss
    } else {
        HandOutcome::Push
    }
}

/// Simulates one player seat at a Blackjack table, round after round. The shoe,
/// the betting progression and the statistics carry over between rounds.
pub struct Simulator<S: Strategy = BasicStrategy> {
    rule: Rule,
    strategy: S,

    // Carried between rounds
    shoe: Shoe,
    progression: BettingProgression,
    statistics: Statistics,
    rounds_played: u64,

    // Current round
    dealer_hand: Hand,
    player_hands: Seat,
}

impl Simulator {
    pub fn new(rule: &Rule, rng: ChaCha8Rng) -> Result<Self, BlackjackError> {
        Self::with_strategy(rule, BasicStrategy, rng)
    }

    pub fn with_seed(rule: &Rule, seed: u64) -> Result<Self, BlackjackError> {
        Self::new(rule, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<S: Strategy> Simulator<S> {
    pub fn with_strategy(rule: &Rule, strategy: S, rng: ChaCha8Rng) -> Result<Self, BlackjackError> {
        rule.validate()?;
        let policy = if rule.auto_shuffle {
            ShufflePolicy::AutoReshuffle
        } else {
            ShufflePolicy::CutCard
        };
        let shoe = Shoe::new(rule.number_of_decks, policy, rule.cut_card_proportion, rng);
        Ok(Self {
            rule: *rule,
            strategy,
            shoe,
            progression: BettingProgression::new(rule.base_unit),
            statistics: Statistics::new(),
            rounds_played: 0,
            dealer_hand: Hand::new(),
            player_hands: Seat::new(),
        })
    }

    /// Plays one full round. Returns `Ok(false)` without touching any state when
    /// the shoe has reached its cut card; shuffle it and try again.
    pub fn play_round(&mut self) -> Result<bool, BlackjackError> {
        self.play_round_with_handler(&mut ())
    }

    /// Same as `play_round`, reporting every step of the round to the handler.
    pub fn play_round_with_handler<H: RoundEventHandler>(
        &mut self,
        handler: &mut H,
    ) -> Result<bool, BlackjackError> {
        if self.shoe.policy() == ShufflePolicy::CutCard && self.shoe.needs_shuffle() {
            return Ok(false);
        }

        self.new_round();
        self.rounds_played += 1;
        handler.on_round_begin(self.rounds_played, &self.shoe);

        let bet = self.progression.current_bet();
        self.statistics.bet_money(bet);
        self.player_hands.set_original_bet(bet);
        handler.on_bet_money(bet);

        self.deal_initial_cards()?;
        let dealer_up_card = self.dealer_hand.cards()[0];
        handler.on_deal_cards(self.player_hands.hand(0), dealer_up_card);

        let summary = match self.settle_naturals(bet) {
            Some(summary) => summary,
            None => {
                self.play_player_hands(dealer_up_card, handler)?;
                match self.complete_dealer_hand(bet)? {
                    Some(summary) => summary,
                    None => {
                        self.dealer_plays()?;
                        self.settle_hands()
                    }
                }
            }
        };
        if summary.end != RoundEnd::Showdown {
            handler.on_round_early_end(summary.end);
        }

        self.close_round(&summary);
        handler.on_summary_round(&self.player_hands, &self.dealer_hand, &summary);
        log::trace!(
            "Round {} ended by {:?}: {:?}, net {}",
            self.rounds_played,
            summary.end,
            summary.outcome,
            summary.net()
        );
        Ok(true)
    }

    /// Returns every card to the shoe and shuffles.
    pub fn shuffle_shoe(&mut self) {
        self.shoe.shuffle();
    }

    /// Shuffles the shoe so that the given face values are dealt first, in order.
    /// Panics if the shoe does not hold them.
    pub fn shuffle_shoe_with_firsts(&mut self, firsts: &[u8]) {
        self.shoe.shuffle_with_firsts(firsts);
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn progression(&self) -> &BettingProgression {
        &self.progression
    }

    pub fn rounds_played(&self) -> u64 {
        self.rounds_played
    }

    pub fn player_hands(&self) -> &Seat {
        &self.player_hands
    }

    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer_hand
    }

    fn new_round(&mut self) {
        self.dealer_hand.clear();
        self.player_hands.clear();
    }

    /// American tables deal the hole card now, the others deal it after the
    /// player is done.
    fn deal_initial_cards(&mut self) -> Result<(), BlackjackError> {
        self.hit(0)?;
        self.deal_to_dealer()?;
        self.hit(0)?;
        if self.rule.game_style == GameStyle::American {
            self.deal_to_dealer()?;
        }
        Ok(())
    }

    fn settle_naturals(&mut self, bet: u32) -> Option<RoundSummary> {
        let player_natural = self.player_hands.hand(0).is_natural();
        let dealer_natural = match self.rule.game_style {
            GameStyle::American => {
                let up = self.dealer_hand.cards()[0].blackjack_value();
                up >= 10 && self.dealer_hand.is_natural()
            }
            GameStyle::European | GameStyle::Macau => false,
        };

        match (player_natural, dealer_natural) {
            (true, true) => {
                self.statistics.receive_money(bet as f64);
                Some(RoundSummary {
                    outcome: RoundOutcome::Pushed,
                    end: RoundEnd::NaturalsPush,
                    won: 0.0,
                    lost: 0.0,
                })
            }
            (true, false) => {
                let profit = bet as f64 * NATURAL_PAYOUT;
                self.statistics.receive_money(bet as f64 + profit);
                self.statistics.record_natural();
                Some(RoundSummary {
                    outcome: RoundOutcome::Won,
                    end: RoundEnd::PlayerNatural,
                    won: profit,
                    lost: 0.0,
                })
            }
            (false, true) => Some(RoundSummary {
                outcome: RoundOutcome::Lost,
                end: RoundEnd::DealerPeekNatural,
                won: 0.0,
                lost: bet as f64,
            }),
            (false, false) => None,
        }
    }

    /// Plays the original hand and every hand split from it, in order.
    fn play_player_hands<H: RoundEventHandler>(
        &mut self,
        dealer_up_card: Card,
        handler: &mut H,
    ) -> Result<(), BlackjackError> {
        let mut hand_index = 0;
        while hand_index < self.player_hands.get_number_of_hands() {
            while !self.player_hands.hand(hand_index).is_bust() {
                let hand = self.player_hands.hand(hand_index);
                let decision =
                    self.strategy
                        .make_decision(hand, dealer_up_card, hand.is_double_eligible());
                handler.on_make_decision(decision, hand_index);

                match decision {
                    Decision::Stand => break,
                    Decision::Hit => self.hit(hand_index)?,
                    Decision::Double => {
                        if self.player_hands.hand(hand_index).is_double_eligible() {
                            let extra = self.player_hands.double_down(hand_index);
                            self.statistics.bet_money(extra);
                            self.hit(hand_index)?;
                            break;
                        }
                        self.hit(hand_index)?;
                    }
                    Decision::Split => {
                        if self.can_split(hand_index) {
                            let new_index = self.player_hands.split_hand(hand_index);
                            self.statistics
                                .bet_money(self.player_hands.hand(new_index).bet());
                            self.hit(hand_index)?;
                            self.hit(new_index)?;
                            handler.on_split(&self.player_hands);
                        } else {
                            self.hit(hand_index)?;
                        }
                    }
                }
            }

            if self.player_hands.hand(hand_index).is_bust() {
                handler.on_player_bust(hand_index);
            }
            hand_index += 1;
        }
        Ok(())
    }

    fn can_split(&self, hand_index: usize) -> bool {
        self.player_hands.hand(hand_index).is_splittable()
            && self.player_hands.split_count(hand_index) < self.rule.max_splits as usize
    }

    /// Deals the dealer's second card on tables without a hole card and settles
    /// the round at once if it makes a natural.
    fn complete_dealer_hand(&mut self, bet: u32) -> Result<Option<RoundSummary>, BlackjackError> {
        if self.rule.game_style == GameStyle::American {
            return Ok(None);
        }

        self.deal_to_dealer()?;
        if !self.dealer_hand.is_natural() {
            return Ok(None);
        }

        let mut lost = 0;
        for hand in self.player_hands.hands() {
            match self.rule.game_style {
                GameStyle::Macau => {
                    lost += bet;
                    let extra = hand.bet().saturating_sub(bet);
                    if extra > 0 {
                        self.statistics.refund_bet(extra);
                    }
                }
                GameStyle::European | GameStyle::American => lost += hand.bet(),
            }
        }

        Ok(Some(RoundSummary {
            outcome: RoundOutcome::Lost,
            end: RoundEnd::DealerNatural,
            won: 0.0,
            lost: lost as f64,
        }))
    }

    fn dealer_plays(&mut self) -> Result<(), BlackjackError> {
        loop {
            let total = self.dealer_hand.total();
            let must_stand = if total > 17 {
                true
            } else if total < 17 {
                false
            } else {
                !self.dealer_hand.is_soft() || self.rule.dealer_rule == DealerRule::StandAll17
            };
            if must_stand {
                return Ok(());
            }
            self.deal_to_dealer()?;
        }
    }

    fn settle_hands(&mut self) -> RoundSummary {
        let mut won = 0.0;
        let mut lost = 0.0;
        let mut any_hand_won = false;
        let mut any_hand_lost = false;

        for hand in self.player_hands.hands() {
            let bet = hand.bet() as f64;
            match showdown(hand, &self.dealer_hand) {
                HandOutcome::Win => {
                    self.statistics.receive_money(bet * 2.0);
                    won += bet;
                    any_hand_won = true;
                }
                HandOutcome::Loss => {
                    lost += bet;
                    any_hand_lost = true;
                }
                HandOutcome::Push => self.statistics.receive_money(bet),
            }
        }

        RoundSummary {
            outcome: RoundOutcome::classify(any_hand_won, any_hand_lost),
            end: RoundEnd::Showdown,
            won,
            lost,
        }
    }

    fn close_round(&mut self, summary: &RoundSummary) {
        match summary.outcome {
            RoundOutcome::Won => self.progression.on_win(),
            RoundOutcome::Lost => self.progression.on_loss(),
            RoundOutcome::Pushed => {}
        }
        self.statistics
            .record_round(summary.outcome, summary.won, summary.lost);
    }

    fn hit(&mut self, hand_index: usize) -> Result<(), BlackjackError> {
        let card = self.shoe.deal_card()?;
        self.player_hands.receive_card(hand_index, card);
        Ok(())
    }

    fn deal_to_dealer(&mut self) -> Result<(), BlackjackError> {
        let card = self.shoe.deal_card()?;
        self.dealer_hand.receive_card(card);
        Ok(())
    }
}

/// Observes a round as it is played. Every method does nothing by default.
pub trait RoundEventHandler {
    fn on_round_begin(&mut self, _round: u64, _shoe: &Shoe) {}
    fn on_bet_money(&mut self, _bet: u32) {}
    fn on_deal_cards(&mut self, _player_hand: &Hand, _dealer_up_card: Card) {}
    fn on_round_early_end(&mut self, _end: RoundEnd) {}
    fn on_split(&mut self, _player_hands: &Seat) {}
    fn on_make_decision(&mut self, _decision: Decision, _hand_index: usize) {}
    fn on_player_bust(&mut self, _hand_index: usize) {}
    fn on_summary_round(&mut self, _player_hands: &Seat, _dealer_hand: &Hand, _summary: &RoundSummary) {}
}

impl RoundEventHandler for () {}
