use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Directional position derived for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Signal {
    Long,
    Cash,
    Short,
}

impl Signal {
    pub const ALL: [Signal; 3] = [Signal::Long, Signal::Cash, Signal::Short];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Signal::Long => "LONG",
            Signal::Cash => "CASH",
            Signal::Short => "SHORT",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Signal::Long => 0,
            Signal::Cash => 1,
            Signal::Short => 2,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
