use serde::{Deserialize, Serialize};

/// The two counters a reported comment accumulates. The wire format carries
/// a boolean (`vote: true` = truth); everything past the handler works with
/// this enum so the target column is always one of two fixed identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteKind {
    Truth,
    False,
}

impl VoteKind {
    pub fn from_flag(truth: bool) -> Self {
        if truth {
            VoteKind::Truth
        } else {
            VoteKind::False
        }
    }

    /// Column the vote lands in. Fixed set; never derived from request text.
    pub fn column(&self) -> &'static str {
        match self {
            VoteKind::Truth => "truth_votes",
            VoteKind::False => "false_votes",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_maps_to_kind() {
        assert_eq!(VoteKind::from_flag(true), VoteKind::Truth);
        assert_eq!(VoteKind::from_flag(false), VoteKind::False);
    }

    #[test]
    fn columns_are_fixed() {
        assert_eq!(VoteKind::Truth.column(), "truth_votes");
        assert_eq!(VoteKind::False.column(), "false_votes");
    }
}
