//! Configuration for decomposers.
//!
//! Alphabet sizes ("bases") are fixed at construction: every target and
//! source value is an integer code in `0..base`.

use crate::error::{PidError, Result};

/// Alphabet sizes for a `PartialInfoDecomposer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecomposerConfig {
    /// Number of distinct target values
    pub target_base: usize,
    /// Number of distinct values of each source, one entry per source
    pub source_bases: Vec<usize>,
}

impl Default for DecomposerConfig {
    /// Binary target, two binary sources.
    fn default() -> Self {
        Self::uniform(2, 2)
    }
}

impl DecomposerConfig {
    pub fn new(target_base: usize, source_bases: &[usize]) -> Self {
        Self {
            target_base,
            source_bases: source_bases.to_vec(),
        }
    }

    /// Target and every source share one alphabet size.
    pub fn uniform(base: usize, num_sources: usize) -> Self {
        Self {
            target_base: base,
            source_bases: vec![base; num_sources],
        }
    }

    pub fn num_sources(&self) -> usize {
        self.source_bases.len()
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_base < 1 {
            return Err(PidError::InvalidAlphabet {
                what: "target".to_string(),
                size: self.target_base,
            });
        }
        for (s, &base) in self.source_bases.iter().enumerate() {
            if base < 1 {
                return Err(PidError::InvalidAlphabet {
                    what: format!("source {}", s),
                    size: base,
                });
            }
        }
        Ok(())
    }
}

/// Parameters of the spatiotemporal (cellular automaton) decomposer.
///
/// Source 0 is the destination cell's own past of `history_length` steps;
/// source `s + 1` is the previous-step value of the cell `source_offsets[s]`
/// positions away (`c - offset`, periodic).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpatiotemporalConfig {
    /// Alphabet size of every cell
    pub base: usize,
    /// Offsets of the non-memory sources from the destination cell
    pub source_offsets: Vec<isize>,
    /// History length k of the destination's memory source
    pub history_length: usize,
}

impl Default for SpatiotemporalConfig {
    /// Binary cells, left and right neighbours, one step of memory.
    fn default() -> Self {
        Self {
            base: 2,
            source_offsets: vec![1, -1],
            history_length: 1,
        }
    }
}

impl SpatiotemporalConfig {
    pub fn new(base: usize, source_offsets: &[isize], history_length: usize) -> Self {
        Self {
            base,
            source_offsets: source_offsets.to_vec(),
            history_length,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.history_length < 1 {
            return Err(PidError::InvalidHistoryLength(self.history_length));
        }
        if self.base < 1 {
            return Err(PidError::InvalidAlphabet {
                what: "cell".to_string(),
                size: self.base,
            });
        }
        Ok(())
    }

    /// Alphabet size of the memory source: base^k.
    pub fn memory_base(&self) -> Result<usize> {
        u32::try_from(self.history_length)
            .ok()
            .and_then(|k| self.base.checked_pow(k))
            .ok_or_else(|| PidError::InvalidAlphabet {
                what: format!("memory of length {}", self.history_length),
                size: self.base,
            })
    }

    /// Configuration of the underlying decomposer: the memory source
    /// followed by one source per offset.
    pub fn decomposer_config(&self) -> Result<DecomposerConfig> {
        self.validate()?;
        let mut source_bases = vec![self.memory_base()?];
        source_bases.extend(std::iter::repeat(self.base).take(self.source_offsets.len()));
        Ok(DecomposerConfig {
            target_base: self.base,
            source_bases,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_config() {
        let config = DecomposerConfig::uniform(3, 2);
        assert_eq!(config.source_bases, vec![3, 3]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_alphabet_rejected() {
        let config = DecomposerConfig::new(2, &[2, 0]);
        assert!(matches!(
            config.validate(),
            Err(PidError::InvalidAlphabet { size: 0, .. })
        ));
    }

    #[test]
    fn test_spatiotemporal_sources() {
        let config = SpatiotemporalConfig::new(2, &[1, -1], 3);
        let inner = config.decomposer_config().unwrap();
        assert_eq!(inner.target_base, 2);
        assert_eq!(inner.source_bases, vec![8, 2, 2]);
    }

    #[test]
    fn test_history_length_rejected() {
        let config = SpatiotemporalConfig::new(2, &[1], 0);
        assert_eq!(
            config.decomposer_config(),
            Err(PidError::InvalidHistoryLength(0))
        );
    }
}
