//! Up/down vote tally with a single stored vote for the local user.

use serde::{Deserialize, Serialize};

use agora_shared::VoteDirection;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteTally {
    pub upvotes: u32,
    pub downvotes: u32,
    pub user_vote: Option<VoteDirection>,
}

impl VoteTally {
    pub fn new(upvotes: u32, downvotes: u32) -> Self {
        Self {
            upvotes,
            downvotes,
            user_vote: None,
        }
    }

    /// Cast `direction`. Voting the same way twice withdraws the vote;
    /// voting the other way moves it.
    pub fn vote(&mut self, direction: VoteDirection) {
        match self.user_vote {
            Some(VoteDirection::Up) => self.upvotes = self.upvotes.saturating_sub(1),
            Some(VoteDirection::Down) => self.downvotes = self.downvotes.saturating_sub(1),
            None => {}
        }

        if self.user_vote == Some(direction) {
            self.user_vote = None;
            return;
        }

        match direction {
            VoteDirection::Up => self.upvotes += 1,
            VoteDirection::Down => self.downvotes += 1,
        }
        self.user_vote = Some(direction);
    }

    pub fn score(&self) -> i64 {
        i64::from(self.upvotes) - i64::from(self.downvotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_shared::VoteDirection::*;

    fn own_contribution(vote: Option<VoteDirection>) -> i64 {
        match vote {
            Some(Up) => 1,
            Some(Down) => -1,
            None => 0,
        }
    }

    #[test]
    fn test_same_direction_twice_clears() {
        let mut tally = VoteTally::new(24, 2);
        tally.vote(Up);
        assert_eq!((tally.upvotes, tally.downvotes), (25, 2));
        tally.vote(Up);
        assert_eq!((tally.upvotes, tally.downvotes), (24, 2));
        assert_eq!(tally.user_vote, None);
    }

    #[test]
    fn test_switching_direction_moves_vote() {
        let mut tally = VoteTally::new(8, 1);
        tally.vote(Down);
        tally.vote(Up);
        assert_eq!((tally.upvotes, tally.downvotes), (9, 1));
        assert_eq!(tally.user_vote, Some(Up));
    }

    #[test]
    fn test_stored_vote_matches_score_delta() {
        let base = VoteTally::new(10, 4);
        let mut tally = base.clone();
        for direction in [Up, Down, Down, Up, Up, Down, Up] {
            tally.vote(direction);
            assert_eq!(
                tally.score() - base.score(),
                own_contribution(tally.user_vote)
            );
        }
    }
}
