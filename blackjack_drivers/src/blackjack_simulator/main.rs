mod simulation;

use blackjack::{BlackjackError, DealerRule, GameStyle, Rule};
use blackjack_drivers::{load_config, ConfigBlackjackSimulator, ConfigError};
use clap::{Parser, ValueEnum};
use simulation::{run_simulation, Handler, Report};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(author, about = "Blackjack Simulator", long_about = None)]
struct CommandLineArgs {
    /// The path of the config file (defaults to ~/.blackjack.yml when it exists)
    #[arg(short, long)]
    config: Option<String>,

    /// Dealer rule: s17 (stand all 17) or h17 (hit soft 17)
    #[arg(short, long)]
    dealer: Option<DealerRule>,

    /// Number of decks in shoe (1-8)
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u8).range(1..=8))]
    decks: Option<u8>,

    /// Game style: A(merican), E(uropean), M(acau)
    #[arg(short, long)]
    style: Option<GameStyle>,

    /// Auto shuffle: y(es) or n(o)
    #[arg(short = 'a', long, value_parser = parse_yes_no)]
    shuffle: Option<bool>,

    /// Number of games to play (1-10000000)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..=10_000_000))]
    games: Option<u64>,

    /// Maximum number of splits allowed (1-4)
    #[arg(short = 'm', long, value_parser = clap::value_parser!(u8).range(1..=4))]
    splits: Option<u8>,

    /// Smallest bet of the betting progression
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    base_unit: Option<u32>,

    /// Seed of the shoe shuffles, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Log every round
    #[arg(short, long)]
    verbose: bool,

    /// Format of the final report
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

impl CommandLineArgs {
    /// Flags given on the command line win over the config file.
    fn override_config(&self, rule: &mut Rule, simulator_config: &mut ConfigBlackjackSimulator) {
        if let Some(dealer_rule) = self.dealer {
            rule.dealer_rule = dealer_rule;
        }
        if let Some(number_of_decks) = self.decks {
            rule.number_of_decks = number_of_decks;
        }
        if let Some(game_style) = self.style {
            rule.game_style = game_style;
        }
        if let Some(auto_shuffle) = self.shuffle {
            rule.auto_shuffle = auto_shuffle;
        }
        if let Some(max_splits) = self.splits {
            rule.max_splits = max_splits;
        }
        if let Some(base_unit) = self.base_unit {
            rule.base_unit = base_unit;
        }
        if let Some(number_of_games) = self.games {
            simulator_config.number_of_games = number_of_games;
        }
        if self.seed.is_some() {
            simulator_config.seed = self.seed;
        }
    }
}

#[derive(Debug, Error)]
enum SimulatorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Blackjack(#[from] BlackjackError),
    #[error("Cannot write report: {0}")]
    Report(#[from] serde_yaml::Error),
}

fn parse_yes_no(value: &str) -> Result<bool, String> {
    match value {
        "y" => Ok(true),
        "n" => Ok(false),
        _ => Err(format!("expected y or n, got {}", value)),
    }
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn run(args: &CommandLineArgs) -> Result<(), SimulatorError> {
    let config = load_config(args.config.as_deref())?;
    let mut rule: Rule = config.rule.try_into().map_err(ConfigError::from)?;
    let mut simulator_config = config.blackjack_simulator;
    args.override_config(&mut rule, &mut simulator_config);
    rule.validate()?;

    let seed = simulator_config.seed.unwrap_or_else(rand::random);
    log::info!(
        "Starting simulation: {} decks, {}, style {}, auto-shuffle: {}, {} games, max splits: {}, seed {}",
        rule.number_of_decks,
        rule.dealer_rule,
        rule.game_style,
        rule.auto_shuffle,
        simulator_config.number_of_games,
        rule.max_splits,
        seed
    );

    let mut handler = Handler::default();
    let simulator = run_simulation(&rule, &simulator_config, seed, &mut handler)?;

    let report = Report::new(&simulator, seed);
    match args.report {
        ReportFormat::Text => println!("{}", report.to_text()),
        ReportFormat::Yaml => print!("{}", report.to_yaml()?),
    }
    Ok(())
}

fn main() {
    let args = CommandLineArgs::parse();
    init_logger(args.verbose);

    if let Err(error) = run(&args) {
        log::error!("{}", error);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        CommandLineArgs::command().debug_assert();
    }

    #[test]
    fn flags_override_config() {
        let args = CommandLineArgs::parse_from([
            "blackjack_simulator",
            "-d",
            "h17",
            "-n",
            "2",
            "-s",
            "M",
            "-a",
            "n",
            "-g",
            "500",
            "-m",
            "4",
            "--seed",
            "7",
        ]);
        let mut rule = Rule::default();
        let mut simulator_config = ConfigBlackjackSimulator::default();
        args.override_config(&mut rule, &mut simulator_config);

        assert_eq!(rule.dealer_rule, DealerRule::HitSoft17);
        assert_eq!(rule.number_of_decks, 2);
        assert_eq!(rule.game_style, GameStyle::Macau);
        assert!(!rule.auto_shuffle);
        assert_eq!(rule.max_splits, 4);
        assert_eq!(rule.base_unit, 1);
        assert_eq!(simulator_config.number_of_games, 500);
        assert_eq!(simulator_config.seed, Some(7));
        assert_eq!(args.report, ReportFormat::Text);
    }

    #[test]
    fn absent_flags_keep_config() {
        let args = CommandLineArgs::parse_from(["blackjack_simulator"]);
        let mut rule = Rule {
            number_of_decks: 3,
            ..Rule::default()
        };
        let mut simulator_config = ConfigBlackjackSimulator {
            seed: Some(1),
            ..ConfigBlackjackSimulator::default()
        };
        args.override_config(&mut rule, &mut simulator_config);
        assert_eq!(rule.number_of_decks, 3);
        assert_eq!(simulator_config.seed, Some(1));
    }

    #[test]
    fn out_of_range_flags_are_rejected() {
        assert!(CommandLineArgs::try_parse_from(["blackjack_simulator", "-n", "9"]).is_err());
        assert!(CommandLineArgs::try_parse_from(["blackjack_simulator", "-m", "0"]).is_err());
        assert!(CommandLineArgs::try_parse_from(["blackjack_simulator", "-g", "0"]).is_err());
        assert!(CommandLineArgs::try_parse_from(["blackjack_simulator", "-a", "maybe"]).is_err());
        assert!(CommandLineArgs::try_parse_from(["blackjack_simulator", "-s", "X"]).is_err());
        assert!(CommandLineArgs::try_parse_from(["blackjack_simulator", "-d", "s18"]).is_err());
    }
}
