//! Navigation steps replayed by `bespoke run`.

use std::fmt;
use std::str::FromStr;

use bespoke::Bespoke;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Prev,
    Slide(usize),
}

impl Step {
    /// Broadcast the step to every deck in the registry. Returns how many
    /// decks moved.
    pub fn apply(self, bespoke: &Bespoke) -> usize {
        match self {
            Self::Next => bespoke.next(),
            Self::Prev => bespoke.prev(),
            Self::Slide(index) => bespoke.slide(index),
        }
    }
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "next" | "n" => Ok(Self::Next),
            "prev" | "p" => Ok(Self::Prev),
            other => other
                .parse::<usize>()
                .map(Self::Slide)
                .map_err(|_| format!("invalid step '{s}': expected next, prev or a slide index")),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Next => f.write_str("next"),
            Self::Prev => f.write_str("prev"),
            Self::Slide(index) => write!(f, "{index}"),
        }
    }
}
