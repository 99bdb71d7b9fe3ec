use std::ops::Index;
use std::str::FromStr;

use crate::residue::Residue;
use crate::AlignError;

/// An immutable, 0-indexed run of residues. Empty sequences are legal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sequence<R: Residue> {
    data: Vec<R>,
}

impl<R: Residue> Sequence<R> {
    pub fn new(data: Vec<R>) -> Self {
        Self { data }
    }

    /// Parses ASCII symbols, failing on the first byte outside `R`'s alphabet.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AlignError> {
        bytes
            .iter()
            .enumerate()
            .map(|(position, &symbol)| {
                R::from_symbol(symbol).ok_or(AlignError::InvalidSymbol {
                    symbol: char::from(symbol),
                    position,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<R> {
        self.data.get(index).copied()
    }

    pub fn residues(&self) -> &[R] {
        &self.data
    }

    pub fn iter(&self) -> impl Iterator<Item = R> + '_ {
        self.data.iter().copied()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.data.iter().map(|r| r.symbol()).collect()
    }
}

impl<R: Residue> Index<usize> for Sequence<R> {
    type Output = R;

    fn index(&self, index: usize) -> &R {
        &self.data[index]
    }
}

impl<R: Residue> FromIterator<R> for Sequence<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<R: Residue> From<Vec<R>> for Sequence<R> {
    fn from(data: Vec<R>) -> Self {
        Self::new(data)
    }
}

impl<R: Residue> FromStr for Sequence<R> {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}
