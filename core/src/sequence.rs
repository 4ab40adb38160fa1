use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::ops::{Deref, DerefMut};
use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::*;

/// Decodes text one symbol per cell, skipping whitespace.
///
/// Unknown symbols do not stop decoding, their slot is `None`.
pub fn decode_cells(text: &str) -> Vec<Option<CellState>> {
    text.chars()
        .filter(|symbol| !symbol.is_whitespace())
        .map(CellState::from_symbol)
        .collect()
}

/// Owned row of cells, the buffer engine operations borrow mutably.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellSequence(Vec<CellState>);

impl CellSequence {
    pub fn new(cells: Vec<CellState>) -> Self {
        Self(cells)
    }

    pub fn into_inner(self) -> Vec<CellState> {
        self.0
    }

    pub fn as_slice(&self) -> &[CellState] {
        &self.0
    }

    pub fn as_mut_slice(&mut self) -> &mut [CellState] {
        &mut self.0
    }

    pub fn pearl_count(&self) -> usize {
        self.0.iter().filter(|&&cell| cell == CellState::Pearl).count()
    }

    pub fn movable_count(&self) -> usize {
        self.0.iter().filter(|cell| cell.is_movable()).count()
    }
}

impl From<Vec<CellState>> for CellSequence {
    fn from(cells: Vec<CellState>) -> Self {
        Self(cells)
    }
}

impl FromIterator<CellState> for CellSequence {
    fn from_iter<I: IntoIterator<Item = CellState>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Deref for CellSequence {
    type Target = [CellState];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for CellSequence {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl FromStr for CellSequence {
    type Err = EngineError;

    fn from_str(text: &str) -> Result<Self> {
        text.chars()
            .filter(|symbol| !symbol.is_whitespace())
            .enumerate()
            .map(|(index, symbol)| {
                CellState::from_symbol(symbol).ok_or(EngineError::UnknownSymbol { symbol, index })
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }
}

impl fmt::Display for CellSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for cell in &self.0 {
            f.write_char(cell.symbol())?;
        }
        Ok(())
    }
}

impl Serialize for CellSequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellSequence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
