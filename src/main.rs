//! Mancala-Search: play Mancala between search agents.
//!
//! ## Usage
//!
//! - `mancala-search` - Show a demo game (Alpha-Beta against UCT)
//! - `mancala-search play --p1 fsss --p2 random` - Play one game between two agents
//! - `mancala-search demo` - Run the demo

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use mancala_search::config::{AlphaBetaConfig, FsssConfig, UctConfig};
use mancala_search::constants::{
    AB_DEPTH, FSSS_DEPTH, FSSS_MAX_ITERATIONS, NEG_INF, POS_INF, UCT_EXPLORATION, UCT_ITERATIONS,
};
use mancala_search::node::Node;
use mancala_search::playout::RolloutPolicy;
use mancala_search::position::Player;
use mancala_search::search::{Algorithm, new_game};

/// Mancala-Search: Alpha-Beta, UCT and FSSS-minimax for Mancala
#[derive(Parser)]
#[command(name = "mancala-search")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game between two agents
    Play(PlayArgs),
    /// Run a demo game with default settings
    Demo,
}

#[derive(Clone, Copy, ValueEnum)]
enum Agent {
    AlphaBeta,
    Uct,
    Fsss,
    Random,
}

#[derive(Clone, Copy, ValueEnum)]
enum Policy {
    /// Score playouts as win (1), draw (0.5) or loss (0)
    WinLoss,
    /// Score playouts with the heuristic reward
    Heuristic,
}

#[derive(clap::Args)]
struct PlayArgs {
    /// Agent for player 1
    #[arg(long, value_enum, default_value = "alpha-beta")]
    p1: Agent,
    /// Agent for player 2
    #[arg(long, value_enum, default_value = "uct")]
    p2: Agent,
    /// Alpha-Beta depth limit
    #[arg(long, default_value_t = AB_DEPTH)]
    ab_depth: usize,
    /// FSSS-minimax depth limit
    #[arg(long, default_value_t = FSSS_DEPTH)]
    fsss_depth: usize,
    /// UCT iterations per move
    #[arg(long, default_value_t = UCT_ITERATIONS)]
    iterations: usize,
    /// UCB1 exploration constant
    #[arg(long, default_value_t = UCT_EXPLORATION)]
    exploration: f64,
    /// How UCT scores simulated games
    #[arg(long, value_enum, default_value = "win-loss")]
    policy: Policy,
    /// Seed for UCT simulations and the random agent
    #[arg(long)]
    seed: Option<u64>,
}

impl Default for PlayArgs {
    fn default() -> Self {
        Self {
            p1: Agent::AlphaBeta,
            p2: Agent::Uct,
            ab_depth: AB_DEPTH,
            fsss_depth: FSSS_DEPTH,
            iterations: UCT_ITERATIONS,
            exploration: UCT_EXPLORATION,
            policy: Policy::WinLoss,
            seed: None,
        }
    }
}

impl PlayArgs {
    fn algorithm(&self, agent: Agent) -> Algorithm {
        match agent {
            Agent::AlphaBeta => Algorithm::AlphaBeta(AlphaBetaConfig {
                depth: self.ab_depth,
                alpha: NEG_INF,
                beta: POS_INF,
            }),
            Agent::Uct => Algorithm::Uct(UctConfig {
                exploration: self.exploration,
                iterations: self.iterations,
                policy: match self.policy {
                    Policy::WinLoss => RolloutPolicy::WinLoss,
                    Policy::Heuristic => RolloutPolicy::Heuristic,
                },
                seed: self.seed,
            }),
            Agent::Fsss => Algorithm::Fsss(FsssConfig {
                depth: self.fsss_depth,
                max_iterations: FSSS_MAX_ITERATIONS,
            }),
            Agent::Random => Algorithm::random(self.seed),
        }
    }
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Some(Commands::Play(args)) => play_game(&args),
        Some(Commands::Demo) | None => {
            println!("Mancala-Search: Alpha-Beta (player 1) vs UCT (player 2)\n");
            play_game(&PlayArgs::default())
        }
    }
}

fn play_game(args: &PlayArgs) -> Result<()> {
    let mut agents = [args.algorithm(args.p1), args.algorithm(args.p2)];
    let mut node: Node = new_game();
    println!("{}", node.pos());

    while !node.is_leaf() {
        let agent = match node.player {
            Player::One => &mut agents[0],
            Player::Two => &mut agents[1],
        };
        let mover = node.player;
        let report = agent.commit_best_move(&mut node)?;
        info!(
            player = %mover,
            agent = agent.name(),
            action = report.action,
            nodes_expanded = report.nodes_expanded,
            "move committed"
        );
        println!("P{mover} plays {:>2}: {}", report.action, node.pos());
    }

    match node.pos().winner() {
        Some(player) => println!("\nPlayer {player} wins after {} moves", node.pos().move_count()),
        None => println!("\nDraw after {} moves", node.pos().move_count()),
    }
    Ok(())
}
