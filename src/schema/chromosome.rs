//! Feature-selection chromosome.
//!
//! A chromosome is a fixed-length bit mask with one bit per feature column.
//! A set bit marks the column as active for distance computation. Values are
//! immutable once built; every genetic operator returns a fresh chromosome.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ordered set of chromosomes under evaluation in one generation.
pub type Population = Vec<Chromosome>;

/// Bit mask selecting active feature columns.
///
/// Serialized as a string of `0`/`1` characters, e.g. `"0110"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Chromosome {
    genes: Vec<bool>,
}

impl Chromosome {
    /// Build a chromosome from explicit bits.
    pub fn new(genes: Vec<bool>) -> Self {
        Self { genes }
    }

    /// Chromosome with every feature active.
    pub fn all_active(len: usize) -> Self {
        Self {
            genes: vec![true; len],
        }
    }

    /// Number of bits (equals the dataset's feature count).
    #[inline]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Raw bits.
    #[inline]
    pub fn genes(&self) -> &[bool] {
        &self.genes
    }

    /// Number of active features.
    pub fn active_count(&self) -> usize {
        self.genes.iter().filter(|&&g| g).count()
    }

    /// True when no feature is selected; fitness is undefined for such masks.
    pub fn has_no_active(&self) -> bool {
        !self.genes.iter().any(|&g| g)
    }

    /// Ascending positions of the set bits.
    pub fn active_indices(&self) -> Vec<usize> {
        self.genes
            .iter()
            .enumerate()
            .filter_map(|(i, &g)| g.then_some(i))
            .collect()
    }

    /// Copy of this chromosome with the given columns switched off.
    ///
    /// Out-of-range columns are ignored.
    pub fn with_inactive(&self, columns: &[usize]) -> Self {
        let mut genes = self.genes.clone();
        for &c in columns {
            if let Some(g) = genes.get_mut(c) {
                *g = false;
            }
        }
        Self { genes }
    }

    /// Bitwise complement.
    pub fn complement(&self) -> Self {
        Self {
            genes: self.genes.iter().map(|g| !g).collect(),
        }
    }

    /// Number of positions at which two chromosomes differ.
    pub fn hamming_distance(&self, other: &Chromosome) -> usize {
        self.genes
            .iter()
            .zip(&other.genes)
            .filter(|(a, b)| a != b)
            .count()
            + self.len().abs_diff(other.len())
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &g in &self.genes {
            f.write_str(if g { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Error parsing a bit string.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid chromosome bit {found:?} at position {position}")]
pub struct ParseChromosomeError {
    pub position: usize,
    pub found: char,
}

impl FromStr for Chromosome {
    type Err = ParseChromosomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .map(|(position, c)| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                found => Err(ParseChromosomeError { position, found }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }
}

impl From<Chromosome> for String {
    fn from(chromosome: Chromosome) -> Self {
        chromosome.to_string()
    }
}

impl TryFrom<String> for Chromosome {
    type Error = ParseChromosomeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
