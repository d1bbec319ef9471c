use crate::ModifierError;
use serde::{Deserialize, Serialize};

/// Running chips and mult for one evaluation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Score {
    pub chips: i64,
    pub mult: f64,
}

impl Score {
    pub fn new(chips: i64, mult: f64) -> Self {
        Self { chips, mult }
    }

    pub fn total_raw(&self) -> f64 {
        self.chips as f64 * self.mult
    }

    pub fn total(&self) -> i64 {
        self.total_raw().floor() as i64
    }

    pub fn apply(&mut self, effect: &RuleEffect) -> Result<(), ModifierError> {
        match effect {
            RuleEffect::AddChips(value) => {
                self.chips = self
                    .chips
                    .checked_add(*value)
                    .ok_or(ModifierError::ChipOverflow)?;
            }
            RuleEffect::AddMult(value) => self.mult = finite(self.mult + value)?,
            RuleEffect::MultiplyMult(value) => self.mult = finite(self.mult * value)?,
            RuleEffect::MultiplyChips(value) => {
                let scaled = (self.chips as f64 * value).floor();
                if !scaled.is_finite() || scaled.abs() >= i64::MAX as f64 {
                    return Err(ModifierError::ChipOverflow);
                }
                self.chips = scaled as i64;
            }
        }
        Ok(())
    }
}

fn finite(mult: f64) -> Result<f64, ModifierError> {
    if mult.is_finite() {
        Ok(mult)
    } else {
        Err(ModifierError::NonFiniteMult)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RuleEffect {
    AddChips(i64),
    AddMult(f64),
    MultiplyMult(f64),
    MultiplyChips(f64),
}

impl RuleEffect {
    /// `times` applications folded into one effect.
    pub fn repeated(self, times: u32) -> Result<RuleEffect, ModifierError> {
        let count = f64::from(times);
        Ok(match self {
            RuleEffect::AddChips(value) => RuleEffect::AddChips(
                value
                    .checked_mul(i64::from(times))
                    .ok_or(ModifierError::ChipOverflow)?,
            ),
            RuleEffect::AddMult(value) => RuleEffect::AddMult(finite(value * count)?),
            RuleEffect::MultiplyMult(value) => RuleEffect::MultiplyMult(finite(value.powf(count))?),
            RuleEffect::MultiplyChips(value) => RuleEffect::MultiplyChips(value.powf(count)),
        })
    }
}

/// Score before and after one triggered modifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreTraceStep {
    pub source: String,
    pub before: Score,
    pub after: Score,
}
