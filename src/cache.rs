//! Memo table for rule results
//!
//! Each rule invocation is keyed by `(rule, position, minimum precedence)`.
//! An entry is either a finished result or an in-progress seed that a
//! left-recursive rule is still growing:
//!
//! - `InProgress(None)`: the rule was entered but no base alternative has
//!   matched yet. A re-entrant call at the same key fails.
//! - `InProgress(Some(seed))`: a re-entrant call receives the current seed
//!   instead of recursing forever.
//! - `Success(seed)` / `Failure`: the final result.
//!
//! # Statistics
//!
//! Lookups of finished entries count as hits, lookups of absent keys as
//! misses. In-progress lookups count as neither.

use super::value::Value;
use ahash::RandomState;
use hashbrown::HashMap;

/// Identifies one rule invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoKey {
    /// Rule index in the grammar
    pub rule: usize,
    /// Start offset in the input
    pub pos: usize,
    /// Minimum precedence threshold
    pub min_prec: i32,
}

impl MemoKey {
    /// Create a key
    #[inline]
    pub fn new(rule: usize, pos: usize, min_prec: i32) -> Self {
        Self { rule, pos, min_prec }
    }
}

/// A successful match: its value and where it ended
#[derive(Debug, Clone, PartialEq)]
pub struct Seed {
    /// The semantic value
    pub value: Value,
    /// End offset (exclusive)
    pub end: usize,
}

impl Seed {
    /// Create a seed
    #[inline]
    pub fn new(value: Value, end: usize) -> Self {
        Self { value, end }
    }
}

/// State of one memoized invocation
#[derive(Debug, Clone, PartialEq)]
pub enum MemoEntry {
    /// The rule is still being evaluated at this key
    InProgress(Option<Seed>),
    /// Finished with a match
    Success(Seed),
    /// Finished without a match
    Failure,
}

/// Memo table statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoStats {
    /// Lookups answered by a finished entry
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// Finished entries currently stored
    pub entries: usize,
}

/// Per-parse memo table
///
/// When memoization is disabled, finished results are dropped instead of
/// stored; in-progress seeds are still tracked because left recursion
/// depends on them.
#[derive(Debug)]
pub struct MemoTable {
    entries: HashMap<MemoKey, MemoEntry, RandomState>,
    enabled: bool,
    hits: u64,
    misses: u64,
}

impl Default for MemoTable {
    fn default() -> Self {
        Self::new(true)
    }
}

impl MemoTable {
    /// Create an empty table
    pub fn new(enabled: bool) -> Self {
        Self {
            entries: HashMap::with_hasher(RandomState::new()),
            enabled,
            hits: 0,
            misses: 0,
        }
    }

    /// Create a table sized for an input of `input_len` bytes
    pub fn for_input(input_len: usize, enabled: bool) -> Self {
        let mut table = Self::new(enabled);
        table.entries.reserve((input_len / 4).clamp(16, 65_536));
        table
    }

    /// Whether finished results are stored
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Look up a key, counting hits and misses
    #[inline]
    pub fn get(&mut self, key: &MemoKey) -> Option<&MemoEntry> {
        match self.entries.get(key) {
            Some(entry) => {
                if !matches!(entry, MemoEntry::InProgress(_)) {
                    self.hits += 1;
                }
                Some(entry)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Mark `key` as being evaluated, with no seed yet
    #[inline]
    pub fn begin(&mut self, key: MemoKey) {
        self.entries.insert(key, MemoEntry::InProgress(None));
    }

    /// Replace the in-progress seed at `key`
    #[inline]
    pub fn update_seed(&mut self, key: MemoKey, seed: Seed) {
        self.entries.insert(key, MemoEntry::InProgress(Some(seed)));
    }

    /// Finish evaluation at `key`
    ///
    /// The result is stored only when the table is enabled and `cacheable`
    /// is set; otherwise the in-progress marker is removed so the next call
    /// evaluates again.
    #[inline]
    pub fn finish(&mut self, key: MemoKey, result: Option<&Seed>, cacheable: bool) {
        if self.enabled && cacheable {
            let entry = match result {
                Some(seed) => MemoEntry::Success(seed.clone()),
                None => MemoEntry::Failure,
            };
            self.entries.insert(key, entry);
        } else {
            self.entries.remove(&key);
        }
    }

    /// Clear all entries and statistics
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Number of stored entries (including in-progress ones)
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current statistics
    pub fn stats(&self) -> MemoStats {
        MemoStats {
            hits: self.hits,
            misses: self.misses,
            entries: self
                .entries
                .values()
                .filter(|e| !matches!(e, MemoEntry::InProgress(_)))
                .count(),
        }
    }
}
