use serde::Serialize;

/// Overall result of one round, across every hand the player ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Won,
    Lost,
    Pushed,
}

impl RoundOutcome {
    /// Won if some hand won and none lost, lost if some hand lost and none won.
    /// Anything else, including all pushes and mixed split results, is a push.
    pub fn classify(any_hand_won: bool, any_hand_lost: bool) -> RoundOutcome {
        match (any_hand_won, any_hand_lost) {
            (true, false) => RoundOutcome::Won,
            (false, true) => RoundOutcome::Lost,
            _ => RoundOutcome::Pushed,
        }
    }
}

/// Cumulative money and game counters over a whole simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    equity: f64,
    total_bet: f64,
    /// Profit only.
    won_amount: f64,
    lost_amount: f64,

    won_games: u64,
    lost_games: u64,
    push_games: u64,
    total_games: u64,
    naturals: u64,

    max_equity: f64,
    min_equity: f64,
    max_drawdown: f64,
}

impl Statistics {
    pub fn new() -> Statistics {
        Default::default()
    }

    /// Takes a wager out of the equity.
    pub fn bet_money(&mut self, money: u32) {
        self.total_bet += money as f64;
        self.equity -= money as f64;
    }

    /// Gives back a wager that is no longer at risk, as if it was never placed.
    pub fn refund_bet(&mut self, money: u32) {
        self.total_bet -= money as f64;
        self.equity += money as f64;
    }

    /// Money returned to the player: a pushed stake, or a winning stake plus profit.
    pub fn receive_money(&mut self, money: f64) {
        self.equity += money;
    }

    pub fn record_natural(&mut self) {
        self.naturals += 1;
    }

    /// Closes a round: accumulates its profit and loss, counts its outcome and
    /// refreshes the equity extremes.
    pub fn record_round(&mut self, outcome: RoundOutcome, won: f64, lost: f64) {
        self.won_amount += won;
        self.lost_amount += lost;
        match outcome {
            RoundOutcome::Won => self.won_games += 1,
            RoundOutcome::Lost => self.lost_games += 1,
            RoundOutcome::Pushed => self.push_games += 1,
        }
        self.total_games += 1;
        self.update_equity_tracking();
    }

    fn update_equity_tracking(&mut self) {
        self.max_equity = self.max_equity.max(self.equity);
        self.min_equity = self.min_equity.min(self.equity);
        self.max_drawdown = self.max_drawdown.max(self.max_equity - self.equity);
    }

    pub fn equity(&self) -> f64 {
        self.equity
    }

    pub fn total_bet(&self) -> f64 {
        self.total_bet
    }

    pub fn won_amount(&self) -> f64 {
        self.won_amount
    }

    pub fn lost_amount(&self) -> f64 {
        self.lost_amount
    }

    pub fn won_games(&self) -> u64 {
        self.won_games
    }

    pub fn lost_games(&self) -> u64 {
        self.lost_games
    }

    pub fn push_games(&self) -> u64 {
        self.push_games
    }

    pub fn total_games(&self) -> u64 {
        self.total_games
    }

    pub fn naturals(&self) -> u64 {
        self.naturals
    }

    pub fn max_equity(&self) -> f64 {
        self.max_equity
    }

    pub fn min_equity(&self) -> f64 {
        self.min_equity
    }

    pub fn max_drawdown(&self) -> f64 {
        self.max_drawdown
    }

    /// Drop from the highest equity seen so far to the current equity.
    pub fn current_drawdown(&self) -> f64 {
        self.max_equity - self.equity
    }

    // The ratios below fall back to the raw amount when nothing has been bet.

    pub fn expected_return(&self) -> f64 {
        self.per_unit_bet(self.won_amount)
    }

    pub fn expected_loss(&self) -> f64 {
        self.per_unit_bet(self.lost_amount)
    }

    pub fn expected_value(&self) -> f64 {
        self.per_unit_bet(self.won_amount - self.lost_amount)
    }

    /// Percentage of rounds won.
    pub fn win_rate(&self) -> f64 {
        self.rate(self.won_games)
    }

    pub fn push_rate(&self) -> f64 {
        self.rate(self.push_games)
    }

    pub fn loss_rate(&self) -> f64 {
        self.rate(self.lost_games)
    }

    fn per_unit_bet(&self, amount: f64) -> f64 {
        if self.total_bet == 0.0 {
            amount
        } else {
            amount / self.total_bet
        }
    }

    fn rate(&self, games: u64) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            games as f64 / self.total_games as f64 * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_round() {
        assert_eq!(RoundOutcome::classify(true, false), RoundOutcome::Won);
        assert_eq!(RoundOutcome::classify(false, true), RoundOutcome::Lost);
        assert_eq!(RoundOutcome::classify(true, true), RoundOutcome::Pushed);
        assert_eq!(RoundOutcome::classify(false, false), RoundOutcome::Pushed);
    }

    #[test]
    fn scripted_equity_curve() {
        let mut stat = Statistics::new();

        stat.bet_money(1);
        stat.receive_money(2.0);
        stat.record_round(RoundOutcome::Won, 1.0, 0.0);
        assert_eq!(stat.equity(), 1.0);

        stat.bet_money(1);
        stat.record_round(RoundOutcome::Lost, 0.0, 1.0);
        assert_eq!(stat.max_drawdown(), 1.0);

        stat.bet_money(3);
        stat.record_round(RoundOutcome::Lost, 0.0, 3.0);
        assert_eq!(stat.equity(), -3.0);

        stat.bet_money(3);
        stat.receive_money(3.0);
        stat.record_round(RoundOutcome::Pushed, 0.0, 0.0);

        stat.bet_money(3);
        stat.receive_money(7.5);
        stat.record_natural();
        stat.record_round(RoundOutcome::Won, 4.5, 0.0);

        stat.bet_money(1);
        stat.record_round(RoundOutcome::Lost, 0.0, 1.0);

        assert_eq!(stat.equity(), 0.5);
        assert_eq!(stat.max_equity(), 1.5);
        assert_eq!(stat.min_equity(), -3.0);
        assert_eq!(stat.max_drawdown(), 4.0);
        assert_eq!(stat.current_drawdown(), 1.0);
        assert_eq!(stat.total_bet(), 12.0);
        assert_eq!(stat.won_amount(), 5.5);
        assert_eq!(stat.lost_amount(), 5.0);
        assert_eq!(stat.won_games(), 2);
        assert_eq!(stat.lost_games(), 3);
        assert_eq!(stat.push_games(), 1);
        assert_eq!(stat.total_games(), 6);
        assert_eq!(stat.naturals(), 1);
        assert_eq!(stat.expected_value(), 0.5 / 12.0);
        assert_eq!(stat.win_rate(), 2.0 / 6.0 * 100.0);
    }

    #[test]
    fn refund_reverses_a_bet() {
        let mut stat = Statistics::new();
        stat.bet_money(4);
        stat.refund_bet(2);
        assert_eq!(stat.equity(), -2.0);
        assert_eq!(stat.total_bet(), 2.0);
    }

    #[test]
    fn ratios_without_bets() {
        let stat = Statistics::new();
        assert_eq!(stat.expected_value(), 0.0);
        assert_eq!(stat.win_rate(), 0.0);
    }
}
