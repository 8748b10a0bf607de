use std::fmt;

const MAX_LEVEL: u8 = 3;
const MIN_SCORE: i8 = -3;

/// A three-level progression. Every level bets three times the previous one.
/// Three net losses on a level climb to the next one (the top level falls back to
/// the first); a win on a level that has not lost yet steps down one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BettingProgression {
    level: u8,
    score: i8,
    base_unit: u32,
}

impl BettingProgression {
    pub fn new(base_unit: u32) -> BettingProgression {
        BettingProgression {
            level: 1,
            score: 0,
            base_unit,
        }
    }

    pub fn current_bet(&self) -> u32 {
        3u32.pow(self.level as u32 - 1) * self.base_unit
    }

    pub fn on_win(&mut self) {
        if self.score == 0 {
            if self.level > 1 {
                self.level -= 1;
            }
        } else {
            self.score = (self.score + 1).min(0);
        }
    }

    pub fn on_loss(&mut self) {
        self.score = (self.score - 1).max(MIN_SCORE);
        if self.score == MIN_SCORE {
            self.level = if self.level == MAX_LEVEL {
                1
            } else {
                self.level + 1
            };
            self.score = 0;
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn score(&self) -> i8 {
        self.score
    }
}

impl fmt::Display for BettingProgression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Level: {}, Score: {}, Bet: {}",
            self.level,
            self.score,
            self.current_bet()
        )
    }
}
