use super::{hand::Hand, Card};
use crate::Decision;

/// A decision policy consulted at every decision point of a hand.
pub trait Strategy {
    fn make_decision(&self, hand: &Hand, dealer_up_card: Card, can_double: bool) -> Decision;
}

type Chart<const ROWS: usize> = [[(Decision, Decision); 10]; ROWS];

const H: (Decision, Decision) = (Decision::Hit, Decision::Hit);
const S: (Decision, Decision) = (Decision::Stand, Decision::Stand);
const P: (Decision, Decision) = (Decision::Split, Decision::Split);
const DH: (Decision, Decision) = (Decision::Double, Decision::Hit);

// Columns are the dealer up card: A, 2, 3, ..., 9, 10.
// The second decision of a pair is taken when doubling is not allowed.

/// Rows: 8 or less, 9, 10, ..., 16, 17 or more.
const HARD_CHART: Chart<10> = [
    [H, H, H, H, H, H, H, H, H, H],           // <= 8
    [H, H, DH, DH, DH, DH, H, H, H, H],       // 9
    [H, DH, DH, DH, DH, DH, DH, DH, DH, H],   // 10
    [DH, DH, DH, DH, DH, DH, DH, DH, DH, DH], // 11
    [H, H, H, S, S, S, H, H, H, H],           // 12
    [H, S, S, S, S, S, H, H, H, H],           // 13
    [H, S, S, S, S, S, H, H, H, H],           // 14
    [H, S, S, S, S, S, H, H, H, H],           // 15, hit against 10
    [H, S, S, S, S, S, H, H, H, H],           // 16, hit against 10
    [S, S, S, S, S, S, S, S, S, S],           // >= 17
];

/// Rows: soft 12 or less, soft 13, ..., soft 18, soft 19 or more.
const SOFT_CHART: Chart<8> = [
    [H, H, H, H, H, H, H, H, H, H],       // <= 12
    [H, H, H, H, DH, DH, H, H, H, H],     // 13
    [H, H, H, DH, DH, DH, H, H, H, H],    // 14
    [H, H, H, DH, DH, DH, H, H, H, H],    // 15
    [H, H, DH, DH, DH, DH, H, H, H, H],   // 16
    [H, H, DH, DH, DH, DH, H, H, H, H],   // 17
    [H, S, DH, DH, DH, DH, S, S, H, H],   // 18
    [S, S, S, S, S, S, S, S, S, S],       // >= 19
];

/// Rows: the point value of the paired card, Ace first.
const PAIR_CHART: Chart<10> = [
    [P, P, P, P, P, P, P, P, P, P], // Double Ace
    [H, P, P, P, P, P, P, H, H, H], // Double 2
    [H, P, P, P, P, P, P, H, H, H],
    [H, H, H, H, H, H, H, H, H, H],
    [H, H, H, H, H, H, H, H, H, H],
    [H, P, P, P, P, P, H, H, H, H],
    [H, P, P, P, P, P, H, H, H, H],
    [P, P, P, P, P, P, P, P, P, P],
    [S, P, P, P, P, P, S, P, P, S],
    [S, S, S, S, S, S, S, S, S, S], // Double 10
];

/// Fixed basic strategy. Pairs are looked up first and answer with a plain hit
/// or stand when they should not be split; 15 and 16 are hit against a 10.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicStrategy;

impl Strategy for BasicStrategy {
    fn make_decision(&self, hand: &Hand, dealer_up_card: Card, can_double: bool) -> Decision {
        let col = chart_index(dealer_up_card.blackjack_value());
        let (total, soft) = hand.value();

        let decision = {
            if hand.is_splittable() {
                let row = chart_index(hand.cards()[0].blackjack_value());
                PAIR_CHART[row][col]
            } else if soft {
                let row = (total.clamp(12, 19) - 12) as usize;
                SOFT_CHART[row][col]
            } else {
                let row = (total.clamp(8, 17) - 8) as usize;
                HARD_CHART[row][col]
            }
        };

        if can_double {
            decision.0
        } else {
            decision.1
        }
    }
}

/// Maps a point value (Ace is 11) to its position in a chart, Ace first.
fn chart_index(blackjack_value: u8) -> usize {
    match blackjack_value {
        11 => 0,
        value => (value - 1) as usize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Suit;

    fn card(face_value: u8) -> Card {
        Card::new(face_value, Suit::Heart)
    }

    fn hand_of(face_values: &[u8]) -> Hand {
        let mut hand = Hand::new();
        for &face_value in face_values {
            hand.receive_card(card(face_value));
        }
        hand
    }

    fn decide(face_values: &[u8], up: u8) -> Decision {
        let hand = hand_of(face_values);
        let can_double = hand.is_double_eligible();
        BasicStrategy.make_decision(&hand, card(up), can_double)
    }

    #[test]
    fn hard_sixteen_hits_against_ten() {
        assert_eq!(decide(&[10, 6], 10), Decision::Hit);
        assert_eq!(decide(&[10, 6], 13), Decision::Hit);
        assert_eq!(decide(&[9, 6], 12), Decision::Hit);
        assert_eq!(decide(&[10, 6], 6), Decision::Stand);
        assert_eq!(decide(&[10, 5], 2), Decision::Stand);
        assert_eq!(decide(&[10, 6], 7), Decision::Hit);
        assert_eq!(decide(&[10, 6], 1), Decision::Hit);
    }

    #[test]
    fn hard_totals() {
        assert_eq!(decide(&[10, 7], 1), Decision::Stand);
        assert_eq!(decide(&[10, 3], 6), Decision::Stand);
        assert_eq!(decide(&[10, 4], 7), Decision::Hit);
        assert_eq!(decide(&[10, 2], 3), Decision::Hit);
        assert_eq!(decide(&[10, 2], 4), Decision::Stand);
        assert_eq!(decide(&[10, 2], 7), Decision::Hit);
        assert_eq!(decide(&[6, 5], 1), Decision::Double);
        assert_eq!(decide(&[6, 4], 9), Decision::Double);
        assert_eq!(decide(&[6, 4], 10), Decision::Hit);
        assert_eq!(decide(&[6, 4], 1), Decision::Hit);
        assert_eq!(decide(&[5, 4], 3), Decision::Double);
        assert_eq!(decide(&[5, 4], 2), Decision::Hit);
        assert_eq!(decide(&[5, 3], 6), Decision::Hit);
        assert_eq!(decide(&[2, 3, 2], 6), Decision::Hit);
    }

    #[test]
    fn double_falls_back_to_hit() {
        assert_eq!(decide(&[2, 4, 5], 6), Decision::Hit);
        assert_eq!(decide(&[1, 2, 4], 4), Decision::Hit);
    }

    #[test]
    fn soft_totals() {
        assert_eq!(decide(&[1, 8], 6), Decision::Stand);
        assert_eq!(decide(&[1, 7], 2), Decision::Stand);
        assert_eq!(decide(&[1, 7], 7), Decision::Stand);
        assert_eq!(decide(&[1, 7], 8), Decision::Stand);
        assert_eq!(decide(&[1, 7], 4), Decision::Double);
        assert_eq!(decide(&[1, 7], 9), Decision::Hit);
        assert_eq!(decide(&[1, 7], 1), Decision::Hit);
        assert_eq!(decide(&[1, 3, 4], 5), Decision::Hit);
        assert_eq!(decide(&[1, 6], 3), Decision::Double);
        assert_eq!(decide(&[1, 5], 2), Decision::Hit);
        assert_eq!(decide(&[1, 4], 4), Decision::Double);
        assert_eq!(decide(&[1, 3], 3), Decision::Hit);
        assert_eq!(decide(&[1, 2], 5), Decision::Double);
        assert_eq!(decide(&[1, 2], 4), Decision::Hit);
    }

    #[test]
    fn pairs() {
        assert_eq!(decide(&[1, 1], 6), Decision::Split);
        assert_eq!(decide(&[1, 1], 1), Decision::Split);
        assert_eq!(decide(&[8, 8], 10), Decision::Split);
        assert_eq!(decide(&[13, 11], 6), Decision::Stand);
        assert_eq!(decide(&[2, 2], 7), Decision::Split);
        assert_eq!(decide(&[3, 3], 8), Decision::Hit);
        assert_eq!(decide(&[4, 4], 5), Decision::Hit);
        assert_eq!(decide(&[5, 5], 6), Decision::Hit);
        assert_eq!(decide(&[6, 6], 6), Decision::Split);
        assert_eq!(decide(&[7, 7], 7), Decision::Hit);
        assert_eq!(decide(&[9, 9], 9), Decision::Split);
        assert_eq!(decide(&[9, 9], 7), Decision::Stand);
        assert_eq!(decide(&[9, 9], 10), Decision::Stand);
        assert_eq!(decide(&[9, 9], 1), Decision::Stand);
    }
}
