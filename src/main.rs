//! Ô Ăn Quan: play the pit-and-granary game against a minimax opponent.
//!
//! ## Usage
//!
//! - `oanquan` - Play in the terminal (text protocol on stdin/stdout)
//! - `oanquan play --delay` - Same, waiting out the animation pauses
//! - `oanquan demo --games 5` - Pit a random player against the engine

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use oanquan::cards::DrawPolicy;
use oanquan::constants::{PLAYER_PITS, SEARCH_DEPTH};
use oanquan::game::{CardOffer, Game, GameConfig};
use oanquan::protocol::TextEngine;
use oanquan::search::SimScoring;

/// Moves after which a demo game is abandoned.
const DEMO_MOVE_LIMIT: usize = 500;

/// Ô Ăn Quan rule engine and computer opponent
#[derive(Parser)]
#[command(name = "oanquan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the computer using the text protocol
    Play {
        #[command(flatten)]
        rules: RuleArgs,
        /// Wait out animation pauses between steps
        #[arg(long)]
        delay: bool,
    },
    /// Let a random player face the computer
    Demo {
        #[command(flatten)]
        rules: RuleArgs,
        /// Number of games to play
        #[arg(long, default_value_t = 1)]
        games: u64,
    },
}

#[derive(Args, Clone)]
struct RuleArgs {
    /// Seed for card draws (and the demo player)
    #[arg(long)]
    seed: Option<u64>,
    /// Search depth of the computer
    #[arg(long, default_value_t = SEARCH_DEPTH)]
    depth: u32,
    /// Decline every card offer and keep sowing
    #[arg(long)]
    no_cards: bool,
    /// Credit captures in the computer's lookahead to the side that moved
    #[arg(long)]
    fair_sim: bool,
    /// Only offer cards for landings in the player's own granary
    #[arg(long)]
    own_granary_cards: bool,
}

impl Default for RuleArgs {
    fn default() -> Self {
        Self {
            seed: None,
            depth: SEARCH_DEPTH,
            no_cards: false,
            fair_sim: false,
            own_granary_cards: false,
        }
    }
}

impl RuleArgs {
    fn config(&self) -> GameConfig {
        let mut config = GameConfig::default().with_depth(self.depth);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if self.no_cards {
            config = config.with_draw_policy(DrawPolicy::NeverDraw);
        }
        if self.fair_sim {
            config = config.with_sim_scoring(SimScoring::ByMover);
        }
        if self.own_granary_cards {
            config = config.with_card_offer(CardOffer::OwnGranary);
        }
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Play { rules, delay }) => {
            let mut engine = TextEngine::new(rules.config(), delay);
            engine.run().context("text protocol session failed")
        }
        Some(Commands::Demo { rules, games }) => run_demo(&rules, games),
        None => {
            let mut engine = TextEngine::new(RuleArgs::default().config(), false);
            engine.run().context("text protocol session failed")
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_demo(rules: &RuleArgs, games: u64) -> Result<()> {
    let base_seed = rules.seed.unwrap_or_else(|| fastrand::u64(..));
    let mut picker = fastrand::Rng::with_seed(base_seed);

    for g in 0..games {
        let config = rules.config().with_seed(base_seed.wrapping_add(g));
        let mut game = Game::new(config);
        let mut moves = 0;

        while !game.is_over() {
            if moves >= DEMO_MOVE_LIMIT {
                warn!(game = g, moves, "demo game abandoned");
                break;
            }
            if game.turn().held_card.is_some() {
                game.use_held_card().context("playing held card")?;
                continue;
            }
            let legal: Vec<usize> = PLAYER_PITS
                .filter(|&pit| !game.board().is_empty(pit))
                .collect();
            if legal.is_empty() {
                bail!("player has no legal move but the game is not over");
            }
            let pit = legal[picker.usize(..legal.len())];
            game.select_pit(pit)
                .with_context(|| format!("sowing pit {pit}"))?;
            moves += 1;
        }

        let turn = game.turn();
        println!(
            "game {}: player {} computer {} after {moves} player moves",
            g + 1,
            turn.player_score,
            turn.computer_score
        );
    }
    Ok(())
}
