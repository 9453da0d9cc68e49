//! Slot-chain compaction for a bounded row of card slots.
//!
//! A host (typically a card-game table) owns one or more rows of numbered
//! slots. Dropping a card onto an occupied slot pushes the occupied run between
//! that slot and the nearest gap one step toward the gap, so the new card lands
//! exactly where it was dropped and no card is lost or doubled up.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`row`] | [`SlotRow`] storage and the [`SlotRow::insert_at`] chain shift |
//! | [`shared`] | [`SharedRow`], a lock-guarded handle for concurrent hosts |
//! | [`consts`] | Reference row bounds |

pub mod consts;
pub mod row;
pub mod shared;

pub use row::{Direction, Move, Shift, Slot, SlotError, SlotIndex, SlotRow};
pub use shared::SharedRow;
