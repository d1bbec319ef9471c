use crate::{JokerCatalog, JokerDef};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JokerInstance {
    pub id: String,
}

/// The player's jokers. Order is the order they apply in when scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub joker_slots: usize,
    pub jokers: Vec<JokerInstance>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("no joker slots")]
    NoJokerSlots,
    #[error("invalid joker index {0}")]
    InvalidJokerIndex(usize),
    #[error("unknown joker {0:?}")]
    UnknownJoker(String),
}

impl Inventory {
    pub fn new() -> Self {
        Self::with_slots(5)
    }

    pub fn with_slots(joker_slots: usize) -> Self {
        Self {
            joker_slots,
            jokers: Vec::new(),
        }
    }

    pub fn add_joker(&mut self, id: impl Into<String>) -> Result<(), InventoryError> {
        if self.jokers.len() >= self.joker_slots {
            return Err(InventoryError::NoJokerSlots);
        }
        self.jokers.push(JokerInstance { id: id.into() });
        Ok(())
    }

    pub fn remove_joker(&mut self, index: usize) -> Result<JokerInstance, InventoryError> {
        if index >= self.jokers.len() {
            return Err(InventoryError::InvalidJokerIndex(index));
        }
        Ok(self.jokers.remove(index))
    }

    /// Moves the joker at `from` so it ends up at `to`, shifting the rest.
    pub fn move_joker(&mut self, from: usize, to: usize) -> Result<(), InventoryError> {
        let len = self.jokers.len();
        if from >= len {
            return Err(InventoryError::InvalidJokerIndex(from));
        }
        if to >= len {
            return Err(InventoryError::InvalidJokerIndex(to));
        }
        let joker = self.jokers.remove(from);
        self.jokers.insert(to, joker);
        Ok(())
    }

    /// Looks up every owned joker in `catalog`, keeping inventory order.
    pub fn resolve<'c>(&self, catalog: &'c JokerCatalog) -> Result<Vec<&'c JokerDef>, InventoryError> {
        self.jokers
            .iter()
            .map(|joker| {
                catalog
                    .get(&joker.id)
                    .ok_or_else(|| InventoryError::UnknownJoker(joker.id.clone()))
            })
            .collect()
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JokerEffect, RuleEffect};

    fn catalog() -> JokerCatalog {
        let def = |id: &str| JokerDef {
            id: id.to_string(),
            name: id.to_string(),
            rarity: Default::default(),
            cost: 0,
            description: String::new(),
            effect: JokerEffect::Always {
                effect: RuleEffect::AddMult(1.0),
            },
        };
        JokerCatalog::new(vec![def("a"), def("b"), def("c")])
    }

    #[test]
    fn slots_cap_additions() {
        let mut inventory = Inventory::with_slots(2);
        inventory.add_joker("a").expect("first");
        inventory.add_joker("b").expect("second");
        assert_eq!(inventory.add_joker("c"), Err(InventoryError::NoJokerSlots));
    }

    #[test]
    fn resolve_keeps_order() {
        let mut inventory = Inventory::new();
        for id in ["c", "a", "b"] {
            inventory.add_joker(id).expect("add");
        }
        inventory.move_joker(0, 2).expect("move");
        let catalog = catalog();
        let ids: Vec<&str> = inventory
            .resolve(&catalog)
            .expect("resolve")
            .into_iter()
            .map(|def| def.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn unknown_and_bad_indices_error() {
        let mut inventory = Inventory::new();
        inventory.add_joker("zzz").expect("add");
        assert_eq!(
            inventory.resolve(&catalog()),
            Err(InventoryError::UnknownJoker("zzz".to_string()))
        );
        assert_eq!(inventory.move_joker(0, 3), Err(InventoryError::InvalidJokerIndex(3)));
        assert_eq!(inventory.remove_joker(4), Err(InventoryError::InvalidJokerIndex(4)));
        assert_eq!(inventory.remove_joker(0).map(|j| j.id), Ok("zzz".to_string()));
    }
}
