//! Global constants

use crate::types::{Centipawns, Value};

/// Upper bound on the child slots reserved when node statistics are created.
pub const PRESERVED_ITEMS: usize = 8;

/// Combined value assigned to a freshly created child slot.
pub const Q_INIT: Value = -1.0;

/// Sentinel for "no checkmating child known".
pub const NO_CHECKMATE: usize = usize::MAX;

/// Centipawn score reported for a value of exactly +1 or -1.
pub const CENTIPAWN_CAP: Centipawns = 9999;

/// Base of the logarithmic value-to-centipawn scaling.
pub const CENTIPAWN_LOG_BASE: f32 = 1.2;
