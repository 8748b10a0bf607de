use blackjack::simulation::{
    hand::{Hand, Seat},
    shoe::Shoe,
    showdown, Card, RoundEnd, RoundEventHandler, RoundSummary, Simulator,
};
use blackjack::{BlackjackError, Decision, Rule, Statistics};
use blackjack_drivers::ConfigBlackjackSimulator;
use serde::Serialize;
use std::fmt::Write;

/// Logs every round at debug level.
#[derive(Debug, Clone, Default)]
pub struct Handler {
    round_id: u64,
    penetration_before_round: f64,
    number_of_decks: u8,
    bet: u32,
    decisions: Vec<Vec<&'static str>>,
    early_end: Option<RoundEnd>,
}

impl Handler {
    fn decisions_of(&mut self, hand_index: usize) -> &mut Vec<&'static str> {
        while self.decisions.len() <= hand_index {
            self.decisions.push(Vec::new());
        }
        &mut self.decisions[hand_index]
    }
}

impl RoundEventHandler for Handler {
    fn on_round_begin(&mut self, round: u64, shoe: &Shoe) {
        self.round_id = round;
        self.penetration_before_round = shoe.penetration();
        self.number_of_decks = shoe.number_of_decks();
        self.decisions.clear();
        self.early_end = None;
    }

    fn on_bet_money(&mut self, bet: u32) {
        self.bet = bet;
    }

    fn on_deal_cards(&mut self, player_hand: &Hand, dealer_up_card: Card) {
        log::debug!(
            "Round #{} ({:.1}% of {} deck(s) dealt), bet {}: player {}, dealer shows {}",
            self.round_id,
            self.penetration_before_round * 100.0,
            self.number_of_decks,
            self.bet,
            cards_to_string(player_hand.cards()),
            dealer_up_card
        );
    }

    fn on_round_early_end(&mut self, end: RoundEnd) {
        self.early_end = Some(end);
    }

    fn on_split(&mut self, player_hands: &Seat) {
        log::debug!(
            "Split into {} hands",
            player_hands.get_number_of_hands()
        );
    }

    fn on_make_decision(&mut self, decision: Decision, hand_index: usize) {
        self.decisions_of(hand_index).push(decision_to_str(decision));
    }

    fn on_player_bust(&mut self, hand_index: usize) {
        self.decisions_of(hand_index).push("BUST");
    }

    fn on_summary_round(&mut self, player_hands: &Seat, dealer_hand: &Hand, summary: &RoundSummary) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }

        let mut lines = String::new();
        let _ = writeln!(lines, "Dealer cards: {}", cards_to_string(dealer_hand.cards()));
        for (hand_index, hand) in player_hands.hands().iter().enumerate() {
            let decisions = self
                .decisions
                .get(hand_index)
                .map(|decisions| decisions.join(" "))
                .unwrap_or_default();
            let _ = write!(
                lines,
                "Hand {}: {} ({}), bet {}, decisions [{}]",
                hand_index,
                cards_to_string(hand.cards()),
                hand.total(),
                hand.bet(),
                decisions
            );
            if self.early_end.is_none() {
                let _ = write!(lines, ", {:?}", showdown(hand, dealer_hand));
            }
            lines.push('\n');
        }
        let _ = write!(
            lines,
            "Round #{} {:?} by {:?}, net {}",
            self.round_id,
            summary.outcome,
            summary.end,
            summary.net()
        );
        log::debug!("{}", lines);
    }
}

/// Plays rounds until `number_of_games` of them have been played, reshuffling
/// whenever the shoe asks for it.
pub fn run_simulation<H: RoundEventHandler>(
    rule: &Rule,
    simulator_config: &ConfigBlackjackSimulator,
    seed: u64,
    handler: &mut H,
) -> Result<Simulator, BlackjackError> {
    let mut simulator = Simulator::with_seed(rule, seed)?;

    while simulator.rounds_played() < simulator_config.number_of_games {
        if !simulator.play_round_with_handler(handler)? {
            simulator.shuffle_shoe();
            continue;
        }

        let rounds_played = simulator.rounds_played();
        if simulator_config.progress_period > 0 && rounds_played % simulator_config.progress_period == 0 {
            log::info!(
                "{}/{} rounds played, equity {:.2}",
                rounds_played,
                simulator_config.number_of_games,
                simulator.statistics().equity()
            );
        }
    }

    Ok(simulator)
}

/// Final figures of a simulation: the raw statistics plus the ratios derived
/// from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub seed: u64,
    #[serde(flatten)]
    pub statistics: Statistics,
    pub expected_return: f64,
    pub expected_loss: f64,
    pub expected_value: f64,
    pub progression_status: String,
    pub win_rate: f64,
    pub push_rate: f64,
    pub loss_rate: f64,
}

impl Report {
    pub fn new(simulator: &Simulator, seed: u64) -> Report {
        let stat = simulator.statistics();
        Report {
            seed,
            statistics: stat.clone(),
            expected_return: stat.expected_return(),
            expected_loss: stat.expected_loss(),
            expected_value: stat.expected_value(),
            progression_status: simulator.progression().to_string(),
            win_rate: stat.win_rate(),
            push_rate: stat.push_rate(),
            loss_rate: stat.loss_rate(),
        }
    }

    pub fn to_text(&self) -> String {
        let stat = &self.statistics;
        let separator = "=".repeat(50);
        let mut text = String::new();
        let _ = writeln!(text, "{}", separator);
        let _ = writeln!(text, "BLACKJACK SIMULATION RESULTS");
        let _ = writeln!(text, "{}", separator);
        let _ = writeln!(text, "Games Played: {}", stat.total_games());
        let _ = writeln!(text, "Games Won: {}", stat.won_games());
        let _ = writeln!(text, "Games Lost: {}", stat.lost_games());
        let _ = writeln!(text, "Games Pushed: {}", stat.push_games());
        let _ = writeln!(text, "Naturals: {}", stat.naturals());
        let _ = writeln!(text);
        let _ = writeln!(text, "Final Equity: ${:.2}", stat.equity());
        let _ = writeln!(text, "Max Equity: ${:.2}", stat.max_equity());
        let _ = writeln!(text, "Min Equity: ${:.2}", stat.min_equity());
        let _ = writeln!(text, "Max Drawdown: ${:.2}", stat.max_drawdown());
        let _ = writeln!(text, "Total Amount Bet: ${:.2}", stat.total_bet());
        let _ = writeln!(text, "Total Amount Won (Profit): ${:.2}", stat.won_amount());
        let _ = writeln!(text, "Total Amount Lost: ${:.2}", stat.lost_amount());
        let _ = writeln!(text);
        let _ = writeln!(text, "Expected Return: {:.4}", self.expected_return);
        let _ = writeln!(text, "Expected Loss: {:.4}", self.expected_loss);
        let _ = writeln!(text, "Expected Value: {:.4}", self.expected_value);
        let _ = writeln!(text);
        let _ = writeln!(
            text,
            "Final Betting System Status: {}",
            self.progression_status
        );
        let _ = writeln!(text);
        let _ = writeln!(text, "Win Rate: {:.2}%", self.win_rate);
        let _ = writeln!(text, "Push Rate: {:.2}%", self.push_rate);
        let _ = write!(text, "Loss Rate: {:.2}%", self.loss_rate);
        text
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

fn cards_to_string(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|card| card.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn decision_to_str(decision: Decision) -> &'static str {
    match decision {
        Decision::Stand => "Stand",
        Decision::Hit => "Hit",
        Decision::Double => "DOUBLE",
        Decision::Split => "SPLIT",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackjack::GameStyle;

    fn simulator_config(number_of_games: u64) -> ConfigBlackjackSimulator {
        ConfigBlackjackSimulator {
            number_of_games,
            seed: None,
            progress_period: 0,
        }
    }

    #[test]
    fn plays_exactly_the_requested_rounds_with_cut_card() {
        let rule = Rule {
            number_of_decks: 6,
            auto_shuffle: false,
            game_style: GameStyle::European,
            ..Rule::default()
        };
        let mut handler = Handler::default();
        let simulator = run_simulation(&rule, &simulator_config(500), 9, &mut handler).unwrap();
        assert_eq!(simulator.rounds_played(), 500);
        assert_eq!(simulator.statistics().total_games(), 500);
        assert_eq!(handler.round_id, 500);
    }

    #[test]
    fn same_seed_same_report() {
        let rule = Rule::default();
        let first = run_simulation(&rule, &simulator_config(2000), 21, &mut ()).unwrap();
        let second = run_simulation(&rule, &simulator_config(2000), 21, &mut ()).unwrap();
        assert_eq!(Report::new(&first, 21), Report::new(&second, 21));
    }

    #[test]
    fn invalid_rule_fails_the_run() {
        let rule = Rule {
            number_of_decks: 9,
            ..Rule::default()
        };
        assert!(run_simulation(&rule, &simulator_config(1), 0, &mut ()).is_err());
    }

    #[test]
    fn report_lists_every_figure() {
        let simulator = run_simulation(&Rule::default(), &simulator_config(100), 4, &mut ()).unwrap();
        let report = Report::new(&simulator, 4);
        assert_eq!(report.statistics.total_games(), 100);
        assert_eq!(report.statistics, *simulator.statistics());

        let text = report.to_text();
        assert!(text.contains("Games Played: 100"));
        assert!(text.contains("Final Betting System Status: Level: "));
        assert!(text.ends_with('%'));

        let yaml = report.to_yaml().unwrap();
        assert!(yaml.contains("seed: 4"));
        assert!(yaml.contains("total_games: 100"));
        assert!(yaml.contains("max_drawdown: "));
        assert!(yaml.contains("win_rate: "));
        assert!(!yaml.contains("statistics:"));
    }

    #[test]
    fn handler_tracks_decisions_per_hand() {
        let mut handler = Handler::default();
        handler.on_make_decision(Decision::Split, 0);
        handler.on_make_decision(Decision::Hit, 1);
        handler.on_player_bust(1);
        assert_eq!(handler.decisions, vec![vec!["SPLIT"], vec!["Hit", "BUST"]]);
    }
}
