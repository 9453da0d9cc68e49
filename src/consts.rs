//! Shared numeric constants for the slot row.

// ── Reference row ───────────────────────────────────────────────

/// Lowest slot index of the reference row.
pub const DEFAULT_MIN_SLOT: i64 = 1;

/// Highest slot index of the reference row (inclusive).
pub const DEFAULT_MAX_SLOT: i64 = 10;
