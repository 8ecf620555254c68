use core::fmt;
use core::num::NonZeroU32;

/// Compact identifier for an actuator instance.
///
/// - `u32` keeps memory small
/// - `NonZero` enables `Option<ActuatorId>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActuatorId(NonZeroU32);

impl ActuatorId {
    /// Create an id from a 0-based index by storing index+1.
    ///
    /// Returns `None` for `u32::MAX`, the only index whose successor overflows.
    pub fn from_index(index: u32) -> Option<Self> {
        index.checked_add(1).and_then(NonZeroU32::new).map(Self)
    }

    /// Recover the 0-based index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }
}

impl fmt::Debug for ActuatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActuatorId({})", self.index())
    }
}

impl fmt::Display for ActuatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}
