//! Activity counters
//!
//! [`CounterState`] holds the next-number state of one job run: two tracks,
//! each with one counter per [`Purpose`], all scoped to a calendar year. It
//! is seeded once from the store's historical maximum and then only moves
//! forward in memory.

use crate::concepts::Track;
use crate::purpose::Purpose;

/// Per-run activity counter state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterState {
    year: i32,
    counters: [[u32; 3]; 2],
}

impl CounterState {
    /// Create state with all counters at zero
    #[inline]
    #[must_use]
    pub fn new(year: i32) -> Self {
        Self {
            year,
            counters: [[0; 3]; 2],
        }
    }

    /// Create state from seed values; missing combinations start at zero
    #[must_use]
    pub fn seeded(year: i32, seeds: impl IntoIterator<Item = (Track, Purpose, u32)>) -> Self {
        let mut state = Self::new(year);
        for (track, purpose, value) in seeds {
            state.counters[track.index()][purpose.index()] = value;
        }
        state
    }

    /// Year these counters belong to
    #[inline]
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Last number handed out (or the seed)
    #[inline]
    #[must_use]
    pub fn current(&self, track: Track, purpose: Purpose) -> u32 {
        self.counters[track.index()][purpose.index()]
    }

    /// Increment, then return the new value
    pub fn allocate(&mut self, track: Track, purpose: Purpose) -> u32 {
        let slot = &mut self.counters[track.index()][purpose.index()];
        *slot += 1;
        *slot
    }

    /// Account for a number already in use; counters never move back
    pub fn observe(&mut self, track: Track, purpose: Purpose, number: u32) {
        let slot = &mut self.counters[track.index()][purpose.index()];
        *slot = (*slot).max(number);
    }

    /// Number for an agenda item
    ///
    /// An item that already carries a number keeps it and leaves the
    /// counters untouched; otherwise a fresh number is allocated.
    pub fn number_for(&mut self, track: Track, purpose: Purpose, existing: Option<u32>) -> u32 {
        match existing {
            Some(number) => number,
            None => self.allocate(track, purpose),
        }
    }
}
