use crate::data::{Color, Operation};
use crate::error::{Error, Result};
use std::collections::HashMap;

// Operation Table ////////////////////////////////////////////////////////////
//
// Resolves a pixel color to the operation it encodes. The VM takes the table by
// value when it is built, so overrides have to be applied before a program runs.

#[derive(Debug, Clone)]
pub struct OpTable {
    colors: HashMap<Color, Operation>,
}

impl OpTable {
    pub fn new() -> OpTable {
        let mut colors = HashMap::with_capacity(Operation::COLORED.len());
        for op in Operation::COLORED.iter() {
            if let Some(color) = op.default_color() {
                colors.insert(color, *op);
            }
        }
        OpTable { colors }
    }

    pub fn resolve(&self, color: Color) -> Operation {
        match self.colors.get(&color) {
            Some(op) => *op,
            None => Operation::Accumulate(color),
        }
    }

    pub fn color_of(&self, op: Operation) -> Option<Color> {
        self.colors
            .iter()
            .find(|(_, other)| **other == op)
            .map(|(color, _)| *color)
    }

    /// Moves `op` to `color`. The old color falls back to accumulate. Fails if
    /// another operation already owns `color`, a table never maps one color to
    /// two operations.
    pub fn set_color(&mut self, op: Operation, color: Color) -> Result<()> {
        if let Operation::Accumulate(_) = op {
            return Err(Error::UnknownOperation(op.name().to_string()));
        }
        if let Some(owner) = self.colors.get(&color) {
            if *owner == op {
                return Ok(());
            }
            return Err(Error::DuplicateColor {
                color,
                first: owner.name(),
                second: op.name(),
            });
        }
        self.colors.retain(|_, other| *other != op);
        self.colors.insert(color, op);
        Ok(())
    }

    /// Applies a batch of overrides at once. Colors are checked against the
    /// final table, so two operations may trade colors in one batch.
    pub fn apply(&mut self, overrides: &[(Operation, Color)]) -> Result<()> {
        let mut next: HashMap<Operation, Color> = Operation::COLORED
            .iter()
            .filter_map(|op| self.color_of(*op).map(|c| (*op, c)))
            .collect();
        for (op, color) in overrides.iter() {
            if let Operation::Accumulate(_) = op {
                return Err(Error::UnknownOperation(op.name().to_string()));
            }
            next.insert(*op, *color);
        }

        let mut colors = HashMap::with_capacity(next.len());
        for op in Operation::COLORED.iter() {
            if let Some(color) = next.get(op) {
                if let Some(owner) = colors.insert(*color, *op) {
                    return Err(Error::DuplicateColor {
                        color: *color,
                        first: owner.name(),
                        second: op.name(),
                    });
                }
            }
        }
        self.colors = colors;
        Ok(())
    }
}

impl Default for OpTable {
    fn default() -> OpTable {
        OpTable::new()
    }
}
