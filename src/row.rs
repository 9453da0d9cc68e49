//! Slot row model and the chain-shift insertion algorithm.
//!
//! A `SlotRow` is a dense, bounded run of slots indexed `min..=max`. Each slot
//! is either [`Slot::Empty`] or holds exactly one card. Hosts seed the row with
//! [`SlotRow::place`], pull cards out with [`SlotRow::take`], drop a new card
//! onto an occupied slot with [`SlotRow::insert_at`], and relocate a card
//! already on the row with [`SlotRow::move_card`].
//!
//! DESIGN
//! ======
//! `insert_at` runs in four steps:
//!
//! 1. Scan from `target + step` in the requested direction for the first empty
//!    slot. Leaving the row without finding one is [`SlotError::NoSpace`].
//! 2. Walk back from that gap to the target, collecting occupied origins in
//!    visit order: nearest the gap first, the target itself last.
//! 3. Move each collected card one step. The first lands in the gap, every
//!    later one lands in the origin its predecessor just vacated.
//! 4. Write the new card into the now-empty target.
//!
//! All failures are detected before the first write, so a rejected insert
//! leaves the row exactly as it was. The scan never falls back to the opposite
//! direction; picking another direction is the caller's call.

#[cfg(test)]
#[path = "row_test.rs"]
mod row_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Position of a slot within a row.
pub type SlotIndex = i64;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotError {
    /// No empty slot exists between the target and the row edge in the
    /// requested direction.
    #[error("no empty slot {direction} of slot {target}")]
    NoSpace { target: SlotIndex, direction: Direction },
    #[error("slot {index} is outside the row {min}..={max}")]
    OutOfRange { index: SlotIndex, min: SlotIndex, max: SlotIndex },
    #[error("invalid direction step {0}; expected +1 or -1")]
    InvalidDirection(i64),
    #[error("slot {0} is already occupied")]
    Occupied(SlotIndex),
    #[error("slot {0} is empty")]
    Vacant(SlotIndex),
    #[error("invalid row bounds {min}..={max}")]
    InvalidBounds { min: SlotIndex, max: SlotIndex },
    #[error("invalid row length {0}")]
    InvalidLength(usize),
}

impl SlotError {
    /// Stable machine-readable code for hosts that relay errors over a wire.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoSpace { .. } => "E_NO_SPACE",
            Self::OutOfRange { .. } => "E_OUT_OF_RANGE",
            Self::InvalidDirection(_) => "E_INVALID_DIRECTION",
            Self::Occupied(_) => "E_SLOT_OCCUPIED",
            Self::Vacant(_) => "E_SLOT_EMPTY",
            Self::InvalidBounds { .. } | Self::InvalidLength(_) => "E_INVALID_BOUNDS",
        }
    }
}

// =============================================================================
// DIRECTION
// =============================================================================

/// Which way a scan (and the resulting shift) travels along the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Toward increasing slot indices (`+1`).
    Forward,
    /// Toward decreasing slot indices (`-1`).
    Backward,
}

impl Direction {
    /// Signed index step: `+1` or `-1`.
    #[must_use]
    pub fn step(self) -> i64 {
        match self {
            Self::Forward => 1,
            Self::Backward => -1,
        }
    }

    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

impl TryFrom<i64> for Direction {
    type Error = SlotError;

    fn try_from(step: i64) -> Result<Self, Self::Error> {
        match step {
            1 => Ok(Self::Forward),
            -1 => Ok(Self::Backward),
            other => Err(SlotError::InvalidDirection(other)),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => f.write_str("forward"),
            Self::Backward => f.write_str("backward"),
        }
    }
}

// =============================================================================
// SLOT
// =============================================================================

/// A single slot. Serializes as `null` when empty and as the bare card otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Slot<C> {
    Empty,
    Occupied(C),
}

impl<C> Slot<C> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    #[must_use]
    pub fn is_occupied(&self) -> bool {
        matches!(self, Self::Occupied(_))
    }

    /// The card in this slot, if any.
    #[must_use]
    pub fn card(&self) -> Option<&C> {
        match self {
            Self::Empty => None,
            Self::Occupied(card) => Some(card),
        }
    }

    #[must_use]
    pub fn into_card(self) -> Option<C> {
        match self {
            Self::Empty => None,
            Self::Occupied(card) => Some(card),
        }
    }
}

impl<C> Default for Slot<C> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<C> From<Option<C>> for Slot<C> {
    fn from(card: Option<C>) -> Self {
        card.map_or(Self::Empty, Self::Occupied)
    }
}

// =============================================================================
// SHIFT REPORT
// =============================================================================

/// One card relocation performed during a chain shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub from: SlotIndex,
    pub to: SlotIndex,
}

/// Outcome of a successful [`SlotRow::insert_at`] or [`SlotRow::move_card`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    /// Gap the chain was pushed into. `None` when the target was already empty
    /// and the card was placed without shifting anything.
    pub empty_slot: Option<SlotIndex>,
    /// Relocations in the order they were applied, nearest the gap first. For
    /// `move_card` the moved card's own relocation comes last.
    pub moves: Vec<Move>,
    /// Slot now holding the inserted or moved card.
    pub placed_at: SlotIndex,
}

// =============================================================================
// SLOT ROW
// =============================================================================

/// Wire form of a row: `{"min": 1, "slots": [null, "A", "B"]}`.
#[derive(Deserialize)]
struct RowRepr<C> {
    min: SlotIndex,
    slots: Vec<Slot<C>>,
}

/// A bounded row of slots indexed `min..=max`, each empty or holding one card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RowRepr<C>")]
pub struct SlotRow<C> {
    min: SlotIndex,
    #[serde(skip)]
    max: SlotIndex,
    slots: Vec<Slot<C>>,
}

impl<C> TryFrom<RowRepr<C>> for SlotRow<C> {
    type Error = SlotError;

    fn try_from(repr: RowRepr<C>) -> Result<Self, Self::Error> {
        Self::with_slots(repr.min, repr.slots)
    }
}

impl<C> SlotRow<C> {
    /// Create an all-empty row covering `min..=max`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBounds` if `min > max` or the slots cannot be allocated.
    pub fn new(min: SlotIndex, max: SlotIndex) -> Result<Self, SlotError> {
        if min > max {
            return Err(SlotError::InvalidBounds { min, max });
        }
        let len = usize::try_from(max.abs_diff(min))
            .map_err(|_| SlotError::InvalidBounds { min, max })?
            .checked_add(1)
            .ok_or(SlotError::InvalidBounds { min, max })?;
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(len)
            .map_err(|_| SlotError::InvalidBounds { min, max })?;
        slots.extend(std::iter::repeat_with(|| Slot::Empty).take(len));
        Ok(Self { min, max, slots })
    }

    /// Build a row from a dense list of occupants, the first at `min`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLength` for an empty list or one that would run past
    /// the largest representable index.
    pub fn from_slots(min: SlotIndex, occupants: Vec<Option<C>>) -> Result<Self, SlotError> {
        Self::with_slots(min, occupants.into_iter().map(Slot::from).collect())
    }

    /// Build a row over `min..=max` from `(index, card)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBounds` for bad bounds, `OutOfRange` for an index
    /// outside the row, and `Occupied` if two cards name the same index.
    pub fn from_occupancy<I>(min: SlotIndex, max: SlotIndex, occupants: I) -> Result<Self, SlotError>
    where
        I: IntoIterator<Item = (SlotIndex, C)>,
    {
        let mut row = Self::new(min, max)?;
        for (index, card) in occupants {
            row.place(index, card)?;
        }
        Ok(row)
    }

    fn with_slots(min: SlotIndex, slots: Vec<Slot<C>>) -> Result<Self, SlotError> {
        let len = slots.len();
        let Some(last) = len.checked_sub(1) else {
            return Err(SlotError::InvalidLength(len));
        };
        let max = i64::try_from(last)
            .map_err(|_| SlotError::InvalidLength(len))?
            .checked_add(min)
            .ok_or(SlotError::InvalidLength(len))?;
        Ok(Self { min, max, slots })
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn min(&self) -> SlotIndex {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> SlotIndex {
        self.max
    }

    /// Number of slots, empty or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Always `false`; a row holds at least one slot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn contains(&self, index: SlotIndex) -> bool {
        (self.min..=self.max).contains(&index)
    }

    /// The card at `index`, or `None` if the slot is empty or out of range.
    #[must_use]
    pub fn get(&self, index: SlotIndex) -> Option<&C> {
        let Ok(pos) = self.position(index) else {
            return None;
        };
        self.slots[pos].card()
    }

    /// `true` if `index` is inside the row and holds no card.
    #[must_use]
    pub fn is_vacant(&self, index: SlotIndex) -> bool {
        self.position(index)
            .is_ok_and(|pos| self.slots[pos].is_empty())
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_occupied()).count()
    }

    /// Every slot in index order, paired with its occupant.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, Option<&C>)> + '_ {
        (self.min..=self.max).zip(self.slots.iter().map(Slot::card))
    }

    /// Cards in index order, skipping empty slots.
    #[must_use]
    pub fn cards(&self) -> impl Iterator<Item = &C> + '_ {
        self.slots.iter().filter_map(Slot::card)
    }

    // -------------------------------------------------------------------------
    // Mutation
    // -------------------------------------------------------------------------

    /// Put a card into an empty slot.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` for an index outside the row and `Occupied` if the
    /// slot already holds a card. The row is unchanged on error.
    pub fn place(&mut self, index: SlotIndex, card: C) -> Result<(), SlotError> {
        let pos = self.position(index)?;
        if self.slots[pos].is_occupied() {
            return Err(SlotError::Occupied(index));
        }
        self.slots[pos] = Slot::Occupied(card);
        Ok(())
    }

    /// Remove and return the card at `index`, leaving the slot empty.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` for an index outside the row.
    pub fn take(&mut self, index: SlotIndex) -> Result<Option<C>, SlotError> {
        let pos = self.position(index)?;
        Ok(std::mem::take(&mut self.slots[pos]).into_card())
    }

    /// Nearest empty slot strictly past `target` in `direction`, if any.
    ///
    /// Only that one direction is searched. An out-of-range `target` has no
    /// empty neighbour.
    #[must_use]
    pub fn nearest_empty(&self, target: SlotIndex, direction: Direction) -> Option<SlotIndex> {
        let Ok(start) = self.position(target) else {
            return None;
        };
        self.scan_empty(start, direction).map(|pos| self.index_of(pos))
    }

    /// Drop `card` onto `target`, shifting the occupied run between `target`
    /// and the nearest gap in `direction` one step toward that gap.
    ///
    /// If `target` is already empty the card is placed there directly and no
    /// scan happens.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if `target` is outside the row and `NoSpace` if no
    /// empty slot lies past `target` in `direction`. The row is unchanged on
    /// error.
    pub fn insert_at(&mut self, target: SlotIndex, card: C, direction: Direction) -> Result<Shift, SlotError> {
        let target_pos = self.position(target)?;

        if self.slots[target_pos].is_empty() {
            self.slots[target_pos] = Slot::Occupied(card);
            debug!(slot = target, "target empty; placed without shifting");
            return Ok(Shift { empty_slot: None, moves: Vec::new(), placed_at: target });
        }

        let Some(gap) = self.scan_empty(target_pos, direction) else {
            debug!(slot = target, %direction, "no empty slot; insert rejected");
            return Err(SlotError::NoSpace { target, direction });
        };

        let chain = self.collect_chain(target_pos, gap, direction);
        let moves = self.shift_chain(&chain, gap);

        debug_assert!(self.slots[target_pos].is_empty());
        self.slots[target_pos] = Slot::Occupied(card);

        let empty_slot = self.index_of(gap);
        debug!(slot = target, empty_slot, chain_len = chain.len(), %direction, "chain shifted");
        Ok(Shift { empty_slot: Some(empty_slot), moves, placed_at: target })
    }

    /// Relocate the card at `from` onto `to`, shifting whatever sits at `to`
    /// toward the nearest gap in `direction`.
    ///
    /// The card stays on the row while the gap is found, so its own slot is
    /// not a gap for the scan. Once lifted, its slot is skipped by the chain
    /// and left empty. `from == to` is a no-op and an empty `to` takes the card
    /// directly.
    ///
    /// # Errors
    ///
    /// Returns `OutOfRange` if either index is outside the row, `Vacant` if
    /// `from` holds no card, and `NoSpace` if no gap lies past `to` in
    /// `direction`. The row is unchanged on error, card still at `from`.
    pub fn move_card(&mut self, from: SlotIndex, to: SlotIndex, direction: Direction) -> Result<Shift, SlotError> {
        let from_pos = self.position(from)?;
        let to_pos = self.position(to)?;
        if self.slots[from_pos].is_empty() {
            return Err(SlotError::Vacant(from));
        }

        if from_pos == to_pos {
            return Ok(Shift { empty_slot: None, moves: Vec::new(), placed_at: to });
        }

        if self.slots[to_pos].is_empty() {
            self.slots.swap(from_pos, to_pos);
            debug!(from, to, "target empty; moved without shifting");
            return Ok(Shift { empty_slot: None, moves: vec![Move { from, to }], placed_at: to });
        }

        let Some(gap) = self.scan_empty(to_pos, direction) else {
            debug!(from, to, %direction, "no empty slot; move rejected");
            return Err(SlotError::NoSpace { target: to, direction });
        };

        let card = std::mem::take(&mut self.slots[from_pos]);
        let chain = self.collect_chain(to_pos, gap, direction);
        let mut moves = self.shift_chain(&chain, gap);

        debug_assert!(self.slots[to_pos].is_empty());
        self.slots[to_pos] = card;
        moves.push(Move { from, to });

        let empty_slot = self.index_of(gap);
        debug!(from, to, empty_slot, chain_len = chain.len(), %direction, "card moved");
        Ok(Shift { empty_slot: Some(empty_slot), moves, placed_at: to })
    }

    // -------------------------------------------------------------------------
    // Internals (positions are offsets into `slots`)
    // -------------------------------------------------------------------------

    fn position(&self, index: SlotIndex) -> Result<usize, SlotError> {
        if self.contains(index) {
            if let Ok(pos) = usize::try_from(index.abs_diff(self.min)) {
                return Ok(pos);
            }
        }
        Err(SlotError::OutOfRange { index, min: self.min, max: self.max })
    }

    fn index_of(&self, pos: usize) -> SlotIndex {
        // `pos < len` and `min + len - 1` fits, so neither fallback is taken.
        self.min
            .saturating_add(i64::try_from(pos).unwrap_or(i64::MAX))
    }

    /// Step 1: first empty position past `start`, walking in `direction`.
    fn scan_empty(&self, start: usize, direction: Direction) -> Option<usize> {
        let mut pos = start;
        loop {
            pos = match direction {
                Direction::Forward => pos.checked_add(1)?,
                Direction::Backward => pos.checked_sub(1)?,
            };
            if self.slots.get(pos)?.is_empty() {
                return Some(pos);
            }
        }
    }

    /// Step 2: occupied origins from just inside `gap` back to `target`
    /// inclusive, nearest the gap first.
    fn collect_chain(&self, target: usize, gap: usize, direction: Direction) -> Vec<usize> {
        let mut chain: Vec<usize> = match direction {
            Direction::Forward => (target..gap).rev().collect(),
            Direction::Backward => (gap + 1..=target).collect(),
        };
        chain.retain(|&pos| self.slots[pos].is_occupied());
        chain
    }

    /// Step 3: each card moves into the slot freed just before it, the first
    /// into `gap`.
    fn shift_chain(&mut self, chain: &[usize], gap: usize) -> Vec<Move> {
        let mut moves = Vec::with_capacity(chain.len());
        let mut destination = gap;
        for &origin in chain {
            debug_assert!(self.slots[destination].is_empty());
            let slot = std::mem::take(&mut self.slots[origin]);
            self.slots[destination] = slot;
            moves.push(Move { from: self.index_of(origin), to: self.index_of(destination) });
            destination = origin;
        }
        moves
    }
}
