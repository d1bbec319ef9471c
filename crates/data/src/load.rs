use anyhow::{bail, Context};
use jester_core::{GameConfig, HandEvalRules, HandKind, HandRule, JokerCatalog, JokerDef};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

const HANDS_FILE: &str = "hands.json";
const RULES_FILE: &str = "rules.json";
const JOKERS_FILE: &str = "jokers.json";
/// Upper bound for `base_chips` and `level_chips` in a hand row.
const MAX_HAND_CHIPS: i64 = 1_000_000_000;

/// Everything read from one assets directory.
#[derive(Debug, Clone)]
pub struct GameData {
    pub config: GameConfig,
    pub jokers: JokerCatalog,
}

pub fn load_game_data(dir: &Path) -> anyhow::Result<GameData> {
    let config = load_game_config(dir)?;
    let jokers = load_joker_catalog(dir)?;
    tracing::debug!(
        dir = %dir.display(),
        hands = config.hands.len(),
        jokers = jokers.len(),
        "loaded game data"
    );
    Ok(GameData { config, jokers })
}

/// Reads `hands.json` and, when present, `rules.json`. Every hand kind
/// must have exactly one row.
pub fn load_game_config(dir: &Path) -> anyhow::Result<GameConfig> {
    let hands: Vec<HandRule> = load_json(dir.join(HANDS_FILE))?;
    validate_hands(&hands).with_context(|| format!("validate {}", dir.join(HANDS_FILE).display()))?;

    let rules_path = dir.join(RULES_FILE);
    let rules: HandEvalRules = if rules_path.exists() {
        load_json(rules_path)?
    } else {
        HandEvalRules::default()
    };

    Ok(GameConfig {
        hands,
        rules,
        ..GameConfig::default()
    })
}

pub fn load_joker_catalog(dir: &Path) -> anyhow::Result<JokerCatalog> {
    let path = dir.join(JOKERS_FILE);
    let defs: Vec<JokerDef> = load_json(&path)?;
    validate_jokers(&defs).with_context(|| format!("validate {}", path.display()))?;
    Ok(JokerCatalog::new(defs))
}

fn validate_hands(hands: &[HandRule]) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    for rule in hands {
        if !seen.insert(rule.kind) {
            bail!("duplicate hand row {}", rule.kind.id());
        }
        if !(0..=MAX_HAND_CHIPS).contains(&rule.base_chips) || !valid_mult(rule.base_mult) {
            bail!("hand {} has an invalid base", rule.kind.id());
        }
        if !(0..=MAX_HAND_CHIPS).contains(&rule.level_chips) || !valid_mult(rule.level_mult) {
            bail!("hand {} has an invalid level increment", rule.kind.id());
        }
    }
    let missing: Vec<&str> = HandKind::ALL
        .iter()
        .filter(|kind| !seen.contains(*kind))
        .map(|kind| kind.id())
        .collect();
    if !missing.is_empty() {
        bail!("missing hand rows: {}", missing.join(", "));
    }
    Ok(())
}

fn valid_mult(mult: f64) -> bool {
    mult.is_finite() && mult >= 0.0
}

fn validate_jokers(defs: &[JokerDef]) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    for def in defs {
        if def.id.trim().is_empty() {
            bail!("joker with empty id");
        }
        if !seen.insert(def.id.as_str()) {
            bail!("duplicate joker id {}", def.id);
        }
    }
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
