//! Single-choice reaction state machine.
//!
//! An entity is either un-reacted or reacted with exactly one kind. Every
//! transition moves the total reaction count by at most one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use agora_shared::ReactionKind;

/// Per-kind reaction counts. Absent kinds count as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactionCounts(BTreeMap<ReactionKind, u32>);

impl ReactionCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build counts from `(kind, count)` pairs; later pairs overwrite earlier.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (ReactionKind, u32)>) -> Self {
        Self(pairs.into_iter().collect())
    }

    pub fn get(&self, kind: ReactionKind) -> u32 {
        self.0.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    fn increment(&mut self, kind: ReactionKind) {
        *self.0.entry(kind).or_insert(0) += 1;
    }

    fn decrement(&mut self, kind: ReactionKind) {
        if let Some(count) = self.0.get_mut(&kind) {
            *count = count.saturating_sub(1);
        }
    }

    /// Iterate all six kinds in display order, including zero counts.
    pub fn iter(&self) -> impl Iterator<Item = (ReactionKind, u32)> + '_ {
        ReactionKind::ALL.into_iter().map(|kind| (kind, self.get(kind)))
    }

    /// Non-zero counts in display order, ready for a reaction bar.
    pub fn summary(&self) -> Vec<ReactionSummary> {
        self.iter()
            .filter(|&(_, count)| count > 0)
            .map(|(kind, count)| ReactionSummary {
                kind,
                emoji: kind.emoji(),
                count,
            })
            .collect()
    }

    /// Add `other` into `self`, kind by kind.
    pub fn accumulate(&mut self, other: &ReactionCounts) {
        for (kind, count) in other.iter() {
            *self.0.entry(kind).or_insert(0) += count;
        }
    }
}

/// One entry of a rendered reaction bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReactionSummary {
    pub kind: ReactionKind,
    pub emoji: &'static str,
    pub count: u32,
}

/// What a call to [`Reactions::set_reaction`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionChange {
    Added(ReactionKind),
    Switched {
        from: ReactionKind,
        to: ReactionKind,
    },
    Removed(ReactionKind),
}

/// Reaction counts together with the local user's own reaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reactions {
    pub counts: ReactionCounts,
    pub user_reaction: Option<ReactionKind>,
}

impl Reactions {
    pub fn new(counts: ReactionCounts) -> Self {
        Self {
            counts,
            user_reaction: None,
        }
    }

    /// React with `kind`: the same kind again withdraws, a different kind
    /// replaces the previous one.
    pub fn set_reaction(&mut self, kind: ReactionKind) -> ReactionChange {
        match self.user_reaction {
            Some(current) if current == kind => {
                self.counts.decrement(kind);
                self.user_reaction = None;
                ReactionChange::Removed(kind)
            }
            Some(previous) => {
                self.counts.decrement(previous);
                self.counts.increment(kind);
                self.user_reaction = Some(kind);
                ReactionChange::Switched {
                    from: previous,
                    to: kind,
                }
            }
            None => {
                self.counts.increment(kind);
                self.user_reaction = Some(kind);
                ReactionChange::Added(kind)
            }
        }
    }

    pub fn total(&self) -> u32 {
        self.counts.total()
    }
}

/// The single-kind case of the reaction machine: a like button.
pub fn toggle_like(likes: &mut u32, liked: &mut bool) {
    if *liked {
        *likes = likes.saturating_sub(1);
    } else {
        *likes += 1;
    }
    *liked = !*liked;
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_shared::ReactionKind::*;

    #[test]
    fn test_add_switch_remove() {
        let mut r = Reactions::new(ReactionCounts::from_pairs([(Like, 12), (Love, 5)]));

        assert_eq!(r.set_reaction(Like), ReactionChange::Added(Like));
        assert_eq!(r.counts.get(Like), 13);
        assert_eq!(r.user_reaction, Some(Like));

        assert_eq!(
            r.set_reaction(Love),
            ReactionChange::Switched { from: Like, to: Love }
        );
        assert_eq!(r.counts.get(Like), 12);
        assert_eq!(r.counts.get(Love), 6);

        assert_eq!(r.set_reaction(Love), ReactionChange::Removed(Love));
        assert_eq!(r.counts.get(Love), 5);
        assert_eq!(r.user_reaction, None);
        assert_eq!(r.total(), 17);
    }

    #[test]
    fn test_total_moves_by_at_most_one() {
        let mut r = Reactions::default();
        let sequence = [Like, Like, Sad, Angry, Angry, Wow, Laugh, Laugh, Love, Sad];
        let mut previous_total = r.total() as i64;

        for kind in sequence {
            r.set_reaction(kind);
            let total = r.total() as i64;
            assert!((total - previous_total).abs() <= 1);
            // The only count that can be non-zero is the user's own reaction.
            assert_eq!(total, if r.user_reaction.is_some() { 1 } else { 0 });
            if let Some(own) = r.user_reaction {
                assert_eq!(r.counts.get(own), 1);
            }
            previous_total = total;
        }
    }

    #[test]
    fn test_accumulate_includes_every_kind() {
        let mut total = ReactionCounts::new();
        total.accumulate(&ReactionCounts::from_pairs([(Like, 2), (Sad, 1)]));
        total.accumulate(&ReactionCounts::from_pairs([(Like, 3)]));
        assert_eq!(total.get(Like), 5);
        assert_eq!(total.get(Sad), 1);
        assert_eq!(total.iter().count(), 6);
    }

    #[test]
    fn test_toggle_like_scenario() {
        let (mut likes, mut liked) = (0, false);
        toggle_like(&mut likes, &mut liked);
        assert_eq!((likes, liked), (1, true));
        toggle_like(&mut likes, &mut liked);
        assert_eq!((likes, liked), (0, false));
    }
}
