use crate::error;
use crate::lang::{Error, Predefined};

type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlotKind {
    Predefined(Predefined),
    Variable,
    Constant,
}

/// Named storage for a variable or a constant. Constants keep the value
/// they were compiled with; everything else starts at zero and is filled
/// in when a program is bound to an evaluation context.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub name: String,
    pub kind: SlotKind,
    pub value: (f64, f64),
}

/// ## Variable and constant storage
///
/// Predefined variables occupy the first slots in a fixed order. Every
/// other name gets a slot the first time it is seen.

#[derive(Debug, Clone, PartialEq)]
pub struct SlotTable {
    slots: Vec<Slot>,
    max_len: usize,
}

impl SlotTable {
    pub fn new(max_len: usize) -> SlotTable {
        let slots = Predefined::ALL
            .iter()
            .map(|p| Slot {
                name: p.name().to_string(),
                kind: SlotKind::Predefined(*p),
                value: (0.0, 0.0),
            })
            .collect();
        SlotTable { slots, max_len }
    }

    pub fn find(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.name == name)
    }

    pub fn variable(&mut self, name: &str) -> Result<usize> {
        match self.find(name) {
            Some(index) => Ok(index),
            None => self.push(Slot {
                name: name.to_string(),
                kind: SlotKind::Variable,
                value: (0.0, 0.0),
            }),
        }
    }

    pub fn constant(&mut self, name: &str, value: (f64, f64)) -> Result<usize> {
        match self.find(name) {
            Some(index) => Ok(index),
            None => self.push(Slot {
                name: name.to_string(),
                kind: SlotKind::Constant,
                value,
            }),
        }
    }

    fn push(&mut self, slot: Slot) -> Result<usize> {
        if self.slots.len() >= self.max_len {
            return Err(error!(TableOverflow; "TOO MANY VARIABLES AND CONSTANTS"));
        }
        self.slots.push(slot);
        Ok(self.slots.len() - 1)
    }

    pub fn get(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Slot> {
        self.slots.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.slots.iter().map(|s| s.name.as_str()).collect()
    }
}
