//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};

#[derive(Parser)]
#[command(
    name = "show-bingo",
    version,
    about = "Phrase bingo for TV shows",
    long_about = "Deal randomized 5x5 bingo cards from a show's phrase pool and play them \
                  in the terminal or render them to PNG."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the shows in the store.
    Shows(StoreArgs),

    /// Deal a card for a show and write it as a PNG.
    Card(CardArgs),

    /// Play a card interactively in the terminal.
    Play(PlayArgs),
}

#[derive(Args)]
pub struct StoreArgs {
    /// JSON file holding the shows.
    #[arg(long = "store", value_name = "FILE", env = "SHOW_BINGO_STORE", default_value = "shows.json")]
    pub store: PathBuf,
}

#[derive(Args)]
pub struct CardArgs {
    /// Identifier of the show to deal from.
    #[arg(value_name = "SHOW_ID")]
    pub show_id: String,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Seed for a reproducible card.
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Where to write the PNG.
    #[arg(long = "output", short = 'o', value_name = "PATH", default_value = "bingo_card.png")]
    pub output: PathBuf,
}

#[derive(Args)]
pub struct PlayArgs {
    /// Identifier of the show to play.
    #[arg(value_name = "SHOW_ID")]
    pub show_id: String,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Seed for reproducible cards.
    #[arg(long = "seed")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_play_with_seed() {
        let cli = Cli::parse_from(["show-bingo", "play", "bake-off", "--store", "s.json", "--seed", "4"]);
        let Command::Play(args) = cli.command else { panic!("expected play") };
        assert_eq!(args.show_id, "bake-off");
        assert_eq!(args.seed, Some(4));
        assert_eq!(args.store.store, PathBuf::from("s.json"));
    }
}
