use crate::format_cards;
use anyhow::{bail, Result};
use jester_core::{
    Deck, Event, EventBus, HandLevels, JokerDef, RoundOutcome, RoundRules, RoundState,
    ScoringPipeline,
};
use std::io::{BufRead, Write};

const HELP: &str = "commands: hand | play <idx..> | discard <idx..> | preview <idx..> | jokers | quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One interactive round with a fixed set of owned jokers.
pub struct Session<'a> {
    pipeline: &'a ScoringPipeline,
    jokers: Vec<&'a JokerDef>,
    levels: HandLevels,
    round: RoundState,
    events: EventBus,
}

impl<'a> Session<'a> {
    pub fn new(
        pipeline: &'a ScoringPipeline,
        jokers: Vec<&'a JokerDef>,
        levels: HandLevels,
        seed: u64,
        target: i64,
        money: i64,
    ) -> Self {
        let mut round = RoundState::new(Deck::shuffled52(seed), RoundRules::default(), target);
        round.money = money;
        let mut events = EventBus::default();
        round.deal(&mut events);
        Self {
            pipeline,
            jokers,
            levels,
            round,
            events,
        }
    }

    pub fn handle<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let mut parts = line.split_whitespace();
        let Some(cmd) = parts.next() else {
            return Ok(Flow::Continue);
        };
        let args: Vec<&str> = parts.collect();
        match cmd {
            "quit" | "q" | "exit" => return Ok(Flow::Quit),
            "help" | "?" => writeln!(out, "{HELP}")?,
            "hand" | "h" => self.print_status(out)?,
            "jokers" | "j" => {
                if self.jokers.is_empty() {
                    writeln!(out, "no jokers")?;
                }
                for (idx, joker) in self.jokers.iter().enumerate() {
                    writeln!(out, "{idx}: {} - {}", joker.name, joker.description)?;
                }
            }
            "preview" => {
                let indices = parse_indices(&args, self.round.rules.max_selection)?;
                let classification = self.round.preview(&indices, self.pipeline)?;
                writeln!(
                    out,
                    "{}: {}",
                    classification.best.name(),
                    format_cards(classification.best_cards())
                )?;
            }
            "play" | "p" => {
                let indices = parse_indices(&args, self.round.rules.max_selection)?;
                let result = self.round.play(
                    &indices,
                    self.pipeline,
                    &self.levels,
                    &self.jokers,
                    &mut self.events,
                )?;
                writeln!(
                    out,
                    "{} [{}]: {} x {} = {}",
                    result.hand.name(),
                    format_cards(&result.scoring_cards),
                    result.final_chips,
                    result.final_mult,
                    result.points()
                )?;
                self.flush_events(out)?;
                if self.round.outcome == RoundOutcome::InProgress {
                    self.print_status(out)?;
                }
            }
            "discard" | "d" => {
                let indices = parse_indices(&args, self.round.rules.max_selection)?;
                self.round.discard(&indices, &mut self.events)?;
                self.flush_events(out)?;
                self.print_status(out)?;
            }
            other => bail!("unknown command '{other}'"),
        }
        self.flush_events(out)?;
        if self.round.outcome != RoundOutcome::InProgress {
            return Ok(Flow::Quit);
        }
        Ok(Flow::Continue)
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    fn print_status<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(
            out,
            "score {}/{}  hands {}  discards {}",
            self.round.score, self.round.target, self.round.hands_left, self.round.discards_left
        )?;
        for (idx, card) in self.round.hand.iter().enumerate() {
            write!(out, "{idx}:{card} ")?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn flush_events<W: Write>(&mut self, out: &mut W) -> Result<()> {
        for event in self.events.drain() {
            match event {
                Event::ModifierTriggered { id } => writeln!(out, "  {id} triggered")?,
                Event::CardsDiscarded {
                    count,
                    discards_left,
                } => writeln!(out, "discarded {count}, {discards_left} discards left")?,
                Event::RoundCleared { score, target } => {
                    writeln!(out, "round cleared: {score}/{target}")?
                }
                Event::RoundFailed { score, target } => {
                    writeln!(out, "round failed: {score}/{target}")?
                }
                Event::HandDealt { .. } | Event::HandScored { .. } => {}
            }
        }
        Ok(())
    }
}

pub fn run<R: BufRead, W: Write>(session: &mut Session<'_>, input: R, out: &mut W) -> Result<()> {
    writeln!(out, "{HELP}")?;
    writeln!(out, "seed {}", session.round.deck.seed())?;
    session.print_status(out)?;
    for line in input.lines() {
        let line = line?;
        match session.handle(&line, out) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(err) => writeln!(out, "error: {err}")?,
        }
    }
    Ok(())
}

/// Indices from lists and ranges such as `0,2-4`. A range may not cover more
/// than `limit` cards.
fn parse_indices(args: &[&str], limit: usize) -> Result<Vec<usize>> {
    let mut indices = Vec::new();
    for arg in args {
        for part in arg.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if let Some((start, end)) = part.split_once('-') {
                let start: usize = start.trim().parse()?;
                let end: usize = end.trim().parse()?;
                if start > end {
                    bail!("range start larger than end");
                }
                if end - start >= limit {
                    bail!("range '{part}' selects more than {limit} cards");
                }
                indices.extend(start..=end);
            } else {
                match part.parse::<usize>() {
                    Ok(idx) => indices.push(idx),
                    Err(_) => bail!("invalid index '{part}'"),
                }
            }
        }
    }
    if indices.is_empty() {
        bail!("missing indices");
    }
    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jester_core::{GameConfig, HandKind, HandRule};
    use std::io::Cursor;

    #[test]
    fn parses_lists_and_ranges() {
        assert_eq!(parse_indices(&["0", "2"], 5).expect("indices"), vec![0, 2]);
        assert_eq!(parse_indices(&["1-3,5"], 5).expect("indices"), vec![1, 2, 3, 5]);
        assert!(parse_indices(&[], 5).is_err());
        assert!(parse_indices(&["3-1"], 5).is_err());
        assert!(parse_indices(&["x"], 5).is_err());
    }

    #[test]
    fn huge_ranges_are_rejected() {
        assert_eq!(parse_indices(&["0-4"], 5).expect("indices"), vec![0, 1, 2, 3, 4]);
        assert!(parse_indices(&["0-5"], 5).is_err());
        assert!(parse_indices(&["0-18446744073709551615"], 5).is_err());

        let pipeline = ScoringPipeline::default();
        let mut session = Session::new(&pipeline, Vec::new(), HandLevels::default(), 7, 100_000, 0);
        let input = Cursor::new("play 0-18446744073709551615\nquit\n");
        let mut out = Vec::new();
        run(&mut session, input, &mut out).expect("run");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("error: range '0-18446744073709551615' selects more than 5 cards"));
        assert_eq!(session.round().hands_left, 4);
    }

    #[test]
    fn play_uses_a_hand_and_refills() {
        let pipeline = ScoringPipeline::default();
        let mut session = Session::new(&pipeline, Vec::new(), HandLevels::default(), 7, 100_000, 0);
        let mut out = Vec::new();
        assert_eq!(session.handle("play 0", &mut out).expect("play"), Flow::Continue);
        assert_eq!(session.round().hands_left, 3);
        assert_eq!(session.round().hand.len(), 8);
        assert!(session.round().score > 0);
    }

    #[test]
    fn session_scores_with_the_given_levels() {
        let config = GameConfig {
            hands: vec![HandRule {
                kind: HandKind::HighCard,
                base_chips: 5,
                base_mult: 1.0,
                level_chips: 100,
                level_mult: 0.0,
            }],
            ..GameConfig::default()
        };
        let pipeline = ScoringPipeline::from_config(&config);
        let mut levels = HandLevels::default();
        levels.level_up(HandKind::HighCard, 1);

        let mut plain = Session::new(&pipeline, Vec::new(), HandLevels::default(), 3, 100_000, 0);
        let mut leveled = Session::new(&pipeline, Vec::new(), levels, 3, 100_000, 0);
        let mut out = Vec::new();
        plain.handle("play 0", &mut out).expect("play");
        leveled.handle("play 0", &mut out).expect("play");
        assert_eq!(leveled.round().score - plain.round().score, 100);
    }

    #[test]
    fn bad_commands_do_not_end_the_session() {
        let pipeline = ScoringPipeline::default();
        let mut session = Session::new(&pipeline, Vec::new(), HandLevels::default(), 7, 100_000, 0);
        let input = Cursor::new("dance\nplay 9\ndiscard 0 1\nquit\nplay 0\n");
        let mut out = Vec::new();
        run(&mut session, input, &mut out).expect("run");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("unknown command 'dance'"));
        assert!(text.contains("invalid card selection"));
        assert!(text.contains("discarded 2, 2 discards left"));
        assert_eq!(session.round().hands_left, 4);
    }

    #[test]
    fn four_weak_hands_fail_the_round() {
        let pipeline = ScoringPipeline::default();
        let mut session = Session::new(&pipeline, Vec::new(), HandLevels::default(), 11, 100_000, 0);
        let mut out = Vec::new();
        let mut flow = Flow::Continue;
        for _ in 0..4 {
            flow = session.handle("play 0", &mut out).expect("play");
        }
        assert_eq!(flow, Flow::Quit);
        assert_eq!(session.round().outcome, RoundOutcome::Failed);
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("round failed"));
    }
}
