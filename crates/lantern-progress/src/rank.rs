use serde::{Deserialize, Serialize};

/// Final grade shown at the ending, derived from the gear count alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    B,
    A,
    APlus,
    S,
    SPlus,
}

impl Rank {
    pub fn from_gears(gears: u32) -> Self {
        match gears {
            8.. => Rank::SPlus,
            6..=7 => Rank::S,
            5 => Rank::APlus,
            4 => Rank::A,
            _ => Rank::B,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rank::SPlus => "S+",
            Rank::S => "S",
            Rank::APlus => "A+",
            Rank::A => "A",
            Rank::B => "B",
        }
    }

    /// Title awarded alongside the top grade.
    pub fn title(self) -> Option<&'static str> {
        (self == Rank::SPlus).then_some("legend of light")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds() {
        let ranks: Vec<_> = (0..=8).map(Rank::from_gears).collect();
        assert_eq!(
            ranks,
            vec![
                Rank::B,
                Rank::B,
                Rank::B,
                Rank::B,
                Rank::A,
                Rank::APlus,
                Rank::S,
                Rank::S,
                Rank::SPlus
            ]
        );
        assert_eq!(Rank::SPlus.label(), "S+");
        assert!(Rank::S.title().is_none());
        assert!(Rank::SPlus > Rank::S);
    }
}
