//! Common type aliases used throughout the crate.

/// Value estimate in [-1, 1] from the perspective of the side to move.
pub type Value = f32;

/// Visit counter for a child slot.
pub type Visits = u32;

/// Display score in centipawns.
pub type Centipawns = i32;

/// Number of plies.
pub type Depth = usize;
