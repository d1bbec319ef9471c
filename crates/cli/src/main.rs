//! Command line front end: score a hand, label one, or play a round.
use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use jester_core::{
    classify_with_rules, parse_cards, Card, HandKind, HandLevels, Inventory, JokerCatalog,
    JokerDef, ScoreResult, ScoringContext, ScoringPipeline,
};
use jester_data::{load_game_data, GameData};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod repl;

#[derive(Debug, Parser)]
#[command(name = "jester", about = "Poker hand scoring with jokers.")]
struct Cli {
    /// Directory holding hands.json, rules.json and jokers.json.
    #[arg(long, global = true, default_value = "assets")]
    assets: PathBuf,
    /// Log every scored hand and modifier.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score up to five played cards.
    Score(ScoreArgs),
    /// Print every hand the cards satisfy.
    Classify {
        #[arg(long)]
        cards: String,
    },
    /// Play one round against a target score on stdin.
    Play(PlayArgs),
    /// List the joker catalog.
    Jokers,
}

#[derive(Debug, Args)]
struct ScoreArgs {
    /// Cards such as "KH KS KD 3C 3S".
    #[arg(long)]
    cards: String,
    /// Owned joker ids, in scoring order.
    #[arg(long, value_delimiter = ',')]
    jokers: Vec<String>,
    #[arg(long, default_value_t = 0)]
    discards: u32,
    #[arg(long, default_value_t = 0)]
    hands: u32,
    #[arg(long, default_value_t = 0)]
    money: i64,
    /// Hand levels as kind=level, e.g. pair=3.
    #[arg(long = "level", value_parser = parse_level)]
    levels: Vec<(HandKind, u32)>,
    /// Print the full result as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct PlayArgs {
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value_t = 300)]
    target: i64,
    #[arg(long, value_delimiter = ',')]
    jokers: Vec<String>,
    #[arg(long, default_value_t = 0)]
    money: i64,
    /// Hand levels as kind=level, e.g. pair=3.
    #[arg(long = "level", value_parser = parse_level)]
    levels: Vec<(HandKind, u32)>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let data = load_game_data(&cli.assets)
        .with_context(|| format!("load assets from {}", cli.assets.display()))?;
    let pipeline = ScoringPipeline::from_config(&data.config);

    match cli.command {
        Command::Score(args) => run_score(&data, &pipeline, &args),
        Command::Classify { cards } => run_classify(&pipeline, &cards),
        Command::Play(args) => {
            let jokers = owned_jokers(&data, &args.jokers)?;
            let mut session = repl::Session::new(
                &pipeline,
                jokers,
                hand_levels(&args.levels),
                args.seed,
                args.target,
                args.money,
            );
            let stdin = io::stdin();
            repl::run(&mut session, stdin.lock(), &mut io::stdout())?;
            let round = session.round();
            println!("final score {}/{} ({:?})", round.score, round.target, round.outcome);
            Ok(())
        }
        Command::Jokers => {
            print_catalog(&data.jokers);
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn parse_level(raw: &str) -> Result<(HandKind, u32), String> {
    let (kind, level) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected kind=level, got '{raw}'"))?;
    let kind = HandKind::from_id(kind.trim()).ok_or_else(|| format!("unknown hand '{kind}'"))?;
    let level = level
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid level '{level}'"))?;
    if level == 0 {
        return Err("levels start at 1".to_string());
    }
    Ok((kind, level))
}

fn hand_levels(raw: &[(HandKind, u32)]) -> HandLevels {
    let mut levels = HandLevels::default();
    for (kind, level) in raw {
        levels.level_up(*kind, level - 1);
    }
    levels
}

/// Resolves joker ids through an inventory so the slot cap applies.
fn owned_jokers<'c>(data: &'c GameData, ids: &[String]) -> Result<Vec<&'c JokerDef>> {
    let mut inventory = Inventory::with_slots(data.config.joker_slots);
    for id in ids {
        inventory
            .add_joker(id.as_str())
            .with_context(|| format!("add joker {id}"))?;
    }
    let jokers = inventory.resolve(&data.jokers)?;
    tracing::debug!(count = jokers.len(), "resolved owned jokers");
    Ok(jokers)
}

fn run_score(data: &GameData, pipeline: &ScoringPipeline, args: &ScoreArgs) -> Result<()> {
    let cards = parse_cards(&args.cards).context("parse --cards")?;
    if cards.len() > 5 {
        bail!("at most 5 cards can be played, got {}", cards.len());
    }
    let jokers = owned_jokers(data, &args.jokers)?;
    let levels = hand_levels(&args.levels);
    let ctx = ScoringContext::new(&cards)
        .with_discards(args.discards)
        .with_hands(args.hands)
        .with_money(args.money);
    let result = pipeline.evaluate_leveled(&cards, &ctx, &levels, &jokers);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

fn run_classify(pipeline: &ScoringPipeline, raw: &str) -> Result<()> {
    let cards = parse_cards(raw).context("parse --cards")?;
    let classification = classify_with_rules(&cards, pipeline.rules);
    println!("best: {}", classification.best.name());
    for kind in HandKind::PRIORITY {
        if classification.satisfies(kind) {
            println!(
                "  {:<16} {}",
                kind.name(),
                format_cards(classification.cards_for(kind))
            );
        }
    }
    Ok(())
}

fn print_result(result: &ScoreResult) {
    println!("hand: {}", result.hand.name());
    println!("scoring cards: {}", format_cards(&result.scoring_cards));
    println!(
        "base: {} chips x {} mult, cards: +{} chips",
        result.base_chips, result.base_mult, result.played_chips
    );
    for step in &result.trace {
        println!(
            "  {}: {} x {} -> {} x {}",
            step.source, step.before.chips, step.before.mult, step.after.chips, step.after.mult
        );
    }
    if !result.failed_modifiers.is_empty() {
        println!("failed: {}", result.failed_modifiers.join(", "));
    }
    println!(
        "score: {} x {} = {}",
        result.final_chips, result.final_mult, result.total_score
    );
}

fn print_catalog(catalog: &JokerCatalog) {
    for def in catalog.iter() {
        println!(
            "{:<20} {:<18} {:<9} ${:<3} {}",
            def.id,
            def.name,
            format!("{:?}", def.rarity),
            def.cost,
            def.description
        );
    }
}

pub(crate) fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(Card::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
