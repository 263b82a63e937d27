//! Poll creator: an editable draft that is published, then voted on once.

use std::f64::consts::PI;
use std::sync::Arc;

use serde::Serialize;

use agora_shared::constants::{MAX_POLL_OPTIONS, MAX_TEXT_CHARS, MIN_POLL_OPTIONS, POLL_COLORS};
use agora_shared::{can_submit, PollDuration};

use crate::store::{find_mut, Widget};

/// Radius of the results pie chart.
pub const PIE_RADIUS: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollOption {
    pub id: String,
    pub text: String,
    pub votes: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollState {
    pub question: String,
    pub options: Vec<Arc<PollOption>>,
    pub duration: PollDuration,
    /// `false` while the poll is being edited.
    pub published: bool,
    /// Option the local user voted for. Set at most once.
    pub user_voted: Option<String>,
    #[serde(skip)]
    next_option_id: u32,
}

impl Default for PollState {
    fn default() -> Self {
        let mut state = Self {
            question: String::new(),
            options: Vec::new(),
            duration: PollDuration::default(),
            published: false,
            user_voted: None,
            next_option_id: 1,
        };
        for _ in 0..MIN_POLL_OPTIONS {
            state.push_option(String::new());
        }
        state
    }
}

#[derive(Debug, Clone)]
pub enum PollAction {
    SetQuestion(String),
    AddOption,
    RemoveOption { option_id: String },
    EditOption { option_id: String, text: String },
    SetDuration(PollDuration),
    /// Leave edit mode. Requires a question and text on every option.
    Publish,
    /// Back to edit mode.
    Edit,
    CastVote { option_id: String },
}

impl PollState {
    /// An already published poll with the given options and no votes.
    pub fn published<I, S>(question: &str, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = Self {
            question: question.to_string(),
            options: Vec::new(),
            duration: PollDuration::default(),
            published: false,
            user_voted: None,
            next_option_id: 1,
        };
        for text in options {
            state.push_option(text.into());
        }
        state.published = true;
        state
    }

    fn push_option(&mut self, text: String) {
        // A counter, not the option count: ids must survive removals.
        let id = self.next_option_id.to_string();
        self.next_option_id += 1;
        self.options.push(Arc::new(PollOption { id, text, votes: 0 }));
    }

    pub fn set_question(&mut self, question: String) -> bool {
        if self.published || self.question == question {
            return false;
        }
        self.question = question;
        true
    }

    pub fn add_option(&mut self) -> bool {
        if self.published || self.options.len() >= MAX_POLL_OPTIONS {
            return false;
        }
        self.push_option(String::new());
        true
    }

    pub fn remove_option(&mut self, option_id: &str) -> bool {
        if self.published || self.options.len() <= MIN_POLL_OPTIONS {
            return false;
        }
        let before = self.options.len();
        self.options.retain(|o| o.id != option_id);
        self.options.len() != before
    }

    pub fn edit_option(&mut self, option_id: &str, text: String) -> bool {
        if self.published {
            return false;
        }
        match find_mut(&mut self.options, |o| o.id == option_id) {
            Some(option) if option.text != text => {
                option.text = text;
                true
            }
            _ => false,
        }
    }

    pub fn set_duration(&mut self, duration: PollDuration) -> bool {
        if self.published || self.duration == duration {
            return false;
        }
        self.duration = duration;
        true
    }

    /// Whether the draft may be published.
    pub fn is_complete(&self) -> bool {
        can_submit(&self.question, MAX_TEXT_CHARS)
            && self.options.iter().all(|o| can_submit(&o.text, MAX_TEXT_CHARS))
    }

    pub fn publish(&mut self) -> bool {
        if self.published || !self.is_complete() {
            return false;
        }
        self.published = true;
        true
    }

    pub fn edit(&mut self) -> bool {
        if !self.published {
            return false;
        }
        self.published = false;
        true
    }

    /// Single-choice, no retraction: once a vote is recorded every further
    /// vote is ignored.
    pub fn cast_vote(&mut self, option_id: &str) -> bool {
        if !self.published || self.user_voted.is_some() {
            return false;
        }
        let Some(option) = find_mut(&mut self.options, |o| o.id == option_id) else {
            return false;
        };
        option.votes += 1;
        self.user_voted = Some(option_id.to_string());
        true
    }

    pub fn total_votes(&self) -> u32 {
        self.options.iter().map(|o| o.votes).sum()
    }

    pub fn option_id_by_text(&self, text: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.text == text)
            .map(|o| o.id.as_str())
    }
}

/// Fraction of `total` held by `votes`; zero when nobody has voted.
pub fn share(votes: u32, total: u32) -> f64 {
    if total == 0 {
        0.0
    } else {
        f64::from(votes) / f64::from(total)
    }
}

/// Whole-number percentage of `total` held by `votes`.
pub fn percentage(votes: u32, total: u32) -> u32 {
    (share(votes, total) * 100.0).round() as u32
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSegment {
    pub option_id: String,
    pub share: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: &'static str,
    pub path: String,
}

/// SVG path for a pie wedge between two angles (degrees, 0 = twelve o'clock).
/// A wedge spanning the whole circle is drawn as two half arcs, since a
/// single arc whose ends coincide renders nothing.
pub fn segment_path(start_angle: f64, end_angle: f64, radius: f64) -> String {
    if end_angle - start_angle >= 360.0 {
        let bottom = radius * 2.0;
        return format!(
            "M{radius},0 A{radius},{radius} 0 1,1 {radius},{bottom} \
             A{radius},{radius} 0 1,1 {radius},0 Z"
        );
    }

    let start = (start_angle - 90.0) * PI / 180.0;
    let end = (end_angle - 90.0) * PI / 180.0;
    let (x1, y1) = (radius + radius * start.cos(), radius + radius * start.sin());
    let (x2, y2) = (radius + radius * end.cos(), radius + radius * end.sin());
    let large_arc = if end_angle - start_angle <= 180.0 { 0 } else { 1 };
    format!("M{radius},{radius} L{x1},{y1} A{radius},{radius} 0 {large_arc},1 {x2},{y2} Z")
}

/// Pie chart for the current results. Empty until the first vote.
pub fn pie_segments(options: &[Arc<PollOption>]) -> Vec<PieSegment> {
    let total: u32 = options.iter().map(|o| o.votes).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut angle = 0.0;
    options
        .iter()
        .enumerate()
        .map(|(index, option)| {
            let share = share(option.votes, total);
            let start_angle = angle;
            let end_angle = angle + share * 360.0;
            angle = end_angle;
            PieSegment {
                option_id: option.id.clone(),
                share,
                start_angle,
                end_angle,
                color: POLL_COLORS[index % POLL_COLORS.len()],
                path: segment_path(start_angle, end_angle, PIE_RADIUS),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionResult {
    pub id: String,
    pub text: String,
    pub votes: u32,
    pub percentage: u32,
    /// Bar width, 0.0..=1.0.
    pub share: f64,
    pub color: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PollView {
    pub question: String,
    pub published: bool,
    pub has_voted: bool,
    pub total_votes: u32,
    pub duration: PollDuration,
    pub duration_label: &'static str,
    pub options: Vec<OptionResult>,
    pub segments: Vec<PieSegment>,
    pub can_add_option: bool,
    pub can_remove_option: bool,
    pub can_publish: bool,
}

pub struct PollCreator;

impl Widget for PollCreator {
    const NAME: &'static str = "poll";

    type State = PollState;
    type Action = PollAction;
    type View = PollView;

    fn seed() -> PollState {
        PollState::default()
    }

    fn reduce(state: &mut PollState, action: PollAction) -> bool {
        match action {
            PollAction::SetQuestion(question) => state.set_question(question),
            PollAction::AddOption => state.add_option(),
            PollAction::RemoveOption { option_id } => state.remove_option(&option_id),
            PollAction::EditOption { option_id, text } => state.edit_option(&option_id, text),
            PollAction::SetDuration(duration) => state.set_duration(duration),
            PollAction::Publish => state.publish(),
            PollAction::Edit => state.edit(),
            PollAction::CastVote { option_id } => state.cast_vote(&option_id),
        }
    }

    fn project(state: &PollState) -> PollView {
        let total = state.total_votes();
        PollView {
            question: state.question.clone(),
            published: state.published,
            has_voted: state.user_voted.is_some(),
            total_votes: total,
            duration: state.duration,
            duration_label: state.duration.label(),
            options: state
                .options
                .iter()
                .enumerate()
                .map(|(index, o)| OptionResult {
                    id: o.id.clone(),
                    text: o.text.clone(),
                    votes: o.votes,
                    percentage: percentage(o.votes, total),
                    share: share(o.votes, total),
                    color: POLL_COLORS[index % POLL_COLORS.len()],
                    selected: state.user_voted.as_deref() == Some(o.id.as_str()),
                })
                .collect(),
            segments: pie_segments(&state.options),
            can_add_option: !state.published && state.options.len() < MAX_POLL_OPTIONS,
            can_remove_option: !state.published && state.options.len() > MIN_POLL_OPTIONS,
            can_publish: !state.published && state.is_complete(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    fn vote(option_id: &str) -> PollAction {
        PollAction::CastVote {
            option_id: option_id.to_string(),
        }
    }

    #[test]
    fn test_cats_and_dogs() {
        let store: Store<PollCreator> =
            Store::with_state(PollState::published("Which pet?", ["Cats", "Dogs"]));
        let state = store.snapshot();
        let cats = state.option_id_by_text("Cats").unwrap().to_string();
        let dogs = state.option_id_by_text("Dogs").unwrap().to_string();

        let view = store.view();
        assert_eq!(view.total_votes, 0);
        assert!(view.options.iter().all(|o| o.percentage == 0 && o.share == 0.0));
        assert!(view.segments.is_empty());

        assert!(store.dispatch(vote(&cats)));
        let view = store.view();
        assert_eq!(view.options[0].percentage, 100);
        assert_eq!(view.options[1].percentage, 0);
        assert!(view.options[0].selected);

        let before = store.snapshot();
        assert!(!store.dispatch(vote(&dogs)));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
        assert_eq!(store.view().total_votes, 1);
    }

    #[test]
    fn test_zero_total_is_guarded() {
        assert_eq!(share(0, 0), 0.0);
        assert_eq!(percentage(5, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
    }

    #[test]
    fn test_option_bounds() {
        let mut poll = PollState::default();
        assert_eq!(poll.options.len(), 2);
        assert!(!poll.remove_option("1"));

        for _ in 0..6 {
            assert!(poll.add_option());
        }
        assert!(!poll.add_option());
        assert_eq!(poll.options.len(), 8);
    }

    #[test]
    fn test_option_ids_survive_removal() {
        let mut poll = PollState::default();
        poll.add_option();
        assert!(poll.remove_option("1"));
        poll.add_option();

        let mut ids: Vec<&str> = poll.options.iter().map(|o| o.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_publish_requires_text() {
        let store: Store<PollCreator> = Store::new();
        assert!(!store.dispatch(PollAction::Publish));

        store.dispatch(PollAction::SetQuestion("Lunch?".into()));
        store.dispatch(PollAction::EditOption {
            option_id: "1".into(),
            text: "Pizza".into(),
        });
        assert!(!store.view().can_publish);
        store.dispatch(PollAction::EditOption {
            option_id: "2".into(),
            text: "   ".into(),
        });
        assert!(!store.dispatch(PollAction::Publish));

        store.dispatch(PollAction::EditOption {
            option_id: "2".into(),
            text: "Sushi".into(),
        });
        assert!(store.dispatch(PollAction::Publish));
        assert!(!store.dispatch(PollAction::AddOption));
        assert!(!store.dispatch(vote("9")));

        assert!(store.dispatch(PollAction::Edit));
        assert!(store.dispatch(PollAction::SetDuration(PollDuration::ThreeDays)));
        assert_eq!(store.view().duration_label, "3 days");
    }

    #[test]
    fn test_vote_requires_published_poll() {
        let mut poll = PollState::default();
        assert!(!poll.cast_vote("1"));
        assert_eq!(poll.user_voted, None);
    }

    #[test]
    fn test_pie_segments_cover_circle() {
        let mut poll = PollState::published("?", ["a", "b", "c"]);
        let options: Vec<Arc<PollOption>> = poll
            .options
            .drain(..)
            .zip([1, 1, 2])
            .map(|(o, votes)| {
                Arc::new(PollOption {
                    votes,
                    ..(*o).clone()
                })
            })
            .collect();

        let segments = pie_segments(&options);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].start_angle, 0.0);
        assert_eq!(segments[1].start_angle, 90.0);
        assert_eq!(segments[2].end_angle, 360.0);
        assert_eq!(segments[2].color, POLL_COLORS[2]);
        assert!(segments[2].path.starts_with("M50,50 L"));
        // Half the pie is exactly 180 degrees: small-arc flag.
        assert!(segments[2].path.contains(" 0 0,1 "));
    }

    #[test]
    fn test_unanimous_option_draws_full_circle() {
        let mut poll = PollState::published("Cats or dogs?", ["Cats", "Dogs"]);
        assert!(poll.cast_vote("1"));

        let segments = pie_segments(&poll.options);
        assert_eq!(segments[0].start_angle, 0.0);
        assert_eq!(segments[0].end_angle, 360.0);
        assert_eq!(segments[0].path, "M50,0 A50,50 0 1,1 50,100 A50,50 0 1,1 50,0 Z");
        // The empty option gets a zero-width wedge.
        assert_eq!(segments[1].start_angle, 360.0);
        assert_eq!(segments[1].end_angle, 360.0);
    }
}
