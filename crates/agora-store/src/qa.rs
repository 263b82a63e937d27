//! Q&A board: voted questions and answers, one accepted answer per question.

use std::cmp::Reverse;
use std::sync::Arc;

use serde::Serialize;

use agora_shared::constants::{LOCAL_USER_AVATAR, LOCAL_USER_NAME, MAX_TEXT_CHARS};
use agora_shared::{validate_text, QuestionSort, VoteDirection};

use crate::forum::all_tags;
use crate::store::{find_mut, Widget};
use crate::votes::VoteTally;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// `a{n}`, numbered across the whole board.
    pub id: String,
    pub author: String,
    pub avatar: String,
    pub content: String,
    pub timestamp: String,
    #[serde(flatten)]
    pub votes: VoteTally,
    pub is_accepted: bool,
}

impl Answer {
    fn number(&self) -> u32 {
        answer_number(&self.id)
    }
}

fn answer_number(id: &str) -> u32 {
    id.strip_prefix('a')
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub title: String,
    pub author: String,
    pub avatar: String,
    pub content: String,
    pub timestamp: String,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub votes: VoteTally,
    pub answers: Vec<Arc<Answer>>,
    pub views: u32,
}

impl Question {
    fn number(&self) -> u32 {
        self.id.parse().unwrap_or(0)
    }

    /// Number of the most recent answer, 0 without answers.
    fn latest_answer(&self) -> u32 {
        self.answers.iter().map(|a| a.number()).max().unwrap_or(0)
    }

    pub fn accepted_answer(&self) -> Option<&Arc<Answer>> {
        self.answers.iter().find(|a| a.is_accepted)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QaState {
    pub questions: Vec<Arc<Question>>,
    pub active_question: Option<String>,
    pub active_tag: Option<String>,
    pub sort_by: QuestionSort,
}

#[derive(Debug, Clone)]
pub enum QaAction {
    /// Vote on a question, or on one of its answers when `answer_id` is set.
    Vote {
        question_id: String,
        answer_id: Option<String>,
        direction: VoteDirection,
    },
    AcceptAnswer { question_id: String, answer_id: String },
    SubmitAnswer { question_id: String, content: String },
    FilterTag(Option<String>),
    SortBy(QuestionSort),
    Open(Option<String>),
}

impl QaState {
    pub fn vote(
        &mut self,
        question_id: &str,
        answer_id: Option<&str>,
        direction: VoteDirection,
    ) -> bool {
        let Some(question) = find_mut(&mut self.questions, |q| q.id == question_id) else {
            return false;
        };
        match answer_id {
            None => question.votes.vote(direction),
            Some(answer_id) => match find_mut(&mut question.answers, |a| a.id == answer_id) {
                Some(answer) => answer.votes.vote(direction),
                None => return false,
            },
        }
        true
    }

    /// Mark `answer_id` accepted and every sibling not accepted. An unknown
    /// answer leaves the question as it was.
    pub fn accept_answer(&mut self, question_id: &str, answer_id: &str) -> bool {
        let Some(question) = self.question(question_id) else {
            return false;
        };
        let target_known = question.answers.iter().any(|a| a.id == answer_id);
        let already = question
            .answers
            .iter()
            .all(|a| a.is_accepted == (a.id == answer_id));
        if !target_known || already {
            return false;
        }

        let Some(question) = find_mut(&mut self.questions, |q| q.id == question_id) else {
            return false;
        };
        for answer in question.answers.iter_mut() {
            let accepted = answer.id == answer_id;
            // Only touch answers whose flag actually flips.
            if answer.is_accepted != accepted {
                Arc::make_mut(answer).is_accepted = accepted;
            }
        }
        true
    }

    /// Next answer id: one past the highest number on the board.
    pub fn next_answer_id(&self) -> String {
        let max = self
            .questions
            .iter()
            .map(|q| q.latest_answer())
            .max()
            .unwrap_or(0);
        format!("a{}", max + 1)
    }

    pub fn submit_answer(&mut self, question_id: &str, content: &str) -> bool {
        let Ok(content) = validate_text(content, MAX_TEXT_CHARS) else {
            return false;
        };
        let id = self.next_answer_id();
        let Some(question) = find_mut(&mut self.questions, |q| q.id == question_id) else {
            return false;
        };
        question.answers.push(Arc::new(Answer {
            id,
            author: LOCAL_USER_NAME.to_string(),
            avatar: LOCAL_USER_AVATAR.to_string(),
            content: content.to_string(),
            timestamp: "Just now".to_string(),
            votes: VoteTally::default(),
            is_accepted: false,
        }));
        true
    }

    pub fn filter_tag(&mut self, tag: Option<String>) -> bool {
        if self.active_tag == tag {
            return false;
        }
        self.active_tag = tag;
        true
    }

    pub fn sort_by(&mut self, sort: QuestionSort) -> bool {
        if self.sort_by == sort {
            return false;
        }
        self.sort_by = sort;
        true
    }

    pub fn open(&mut self, question_id: Option<String>) -> bool {
        if self.active_question == question_id {
            return false;
        }
        if let Some(id) = &question_id {
            if self.question(id).is_none() {
                return false;
            }
        }
        self.active_question = question_id;
        true
    }

    pub fn question(&self, question_id: &str) -> Option<&Arc<Question>> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSummary {
    pub id: String,
    pub title: String,
    pub author: String,
    pub timestamp: String,
    pub tags: Vec<String>,
    pub score: i64,
    pub user_vote: Option<VoteDirection>,
    pub answer_count: usize,
    pub has_accepted: bool,
    pub views: u32,
}

impl From<&Question> for QuestionSummary {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id.clone(),
            title: q.title.clone(),
            author: q.author.clone(),
            timestamp: q.timestamp.clone(),
            tags: q.tags.clone(),
            score: q.votes.score(),
            user_vote: q.votes.user_vote,
            answer_count: q.answers.len(),
            has_accepted: q.accepted_answer().is_some(),
            views: q.views,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QaView {
    pub tags: Vec<String>,
    pub active_tag: Option<String>,
    pub sort_by: QuestionSort,
    pub questions: Vec<QuestionSummary>,
    pub selected: Option<Arc<Question>>,
}

pub struct QaBoard;

impl Widget for QaBoard {
    const NAME: &'static str = "qa";

    type State = QaState;
    type Action = QaAction;
    type View = QaView;

    fn seed() -> QaState {
        fn answer(
            id: &str,
            author: &str,
            avatar: &str,
            content: &str,
            timestamp: &str,
            (up, down): (u32, u32),
            is_accepted: bool,
        ) -> Arc<Answer> {
            Arc::new(Answer {
                id: id.to_string(),
                author: author.to_string(),
                avatar: avatar.to_string(),
                content: content.to_string(),
                timestamp: timestamp.to_string(),
                votes: VoteTally::new(up, down),
                is_accepted,
            })
        }

        QaState {
            questions: vec![
                Arc::new(Question {
                    id: "1".into(),
                    title: "How do I implement real-time updates with React and WebSockets?".into(),
                    author: "Alex Johnson".into(),
                    avatar: "/q10.png".into(),
                    content: "I'm building a chat application and need to implement real-time updates. What's the best approach using React and WebSockets?".into(),
                    timestamp: "2 days ago".into(),
                    tags: vec!["react".into(), "websockets".into(), "real-time".into()],
                    votes: VoteTally::new(24, 2),
                    answers: vec![
                        answer(
                            "a1",
                            "Jamie Smith",
                            "/q11.png",
                            "I recommend the useWebSocket hook from react-use-websocket. It handles connection management and reconnection for you.",
                            "1 day ago",
                            (15, 0),
                            true,
                        ),
                        answer(
                            "a2",
                            "Taylor Brown",
                            "/q12.png",
                            "You could also use Socket.IO, which adds automatic reconnection and room support.",
                            "1 day ago",
                            (8, 1),
                            false,
                        ),
                    ],
                    views: 156,
                }),
                Arc::new(Question {
                    id: "2".into(),
                    title: "Best practices for state management in large React applications?"
                        .into(),
                    author: "Jordan Lee".into(),
                    avatar: "/q13.png".into(),
                    content: "Should I use Redux, Context API, or one of the newer libraries like Zustand or Jotai? What are the pros and cons of each?".into(),
                    timestamp: "3 days ago".into(),
                    tags: vec!["react".into(), "state-management".into(), "redux".into()],
                    votes: VoteTally::new(32, 1),
                    answers: vec![answer(
                        "a3",
                        "Casey Wilson",
                        "/q13.png",
                        "It depends on your needs. Redux suits complex state, Context is built in but can re-render a lot, Zustand is a good middle ground.",
                        "2 days ago",
                        (18, 2),
                        false,
                    )],
                    views: 203,
                }),
                Arc::new(Question {
                    id: "3".into(),
                    title: "How to optimize Next.js image loading for better performance?".into(),
                    author: "Riley Martinez".into(),
                    avatar: "/q1.png".into(),
                    content: "What are some best practices for optimizing image loading and improving Core Web Vitals scores?".into(),
                    timestamp: "1 week ago".into(),
                    tags: vec!["next.js".into(), "performance".into(), "images".into()],
                    votes: VoteTally::new(41, 0),
                    answers: vec![answer(
                        "a4",
                        "Alex Johnson",
                        "/q2.png",
                        "Use the built-in next/image component, set 'sizes' for responsive images and 'priority' for above-the-fold images.",
                        "6 days ago",
                        (27, 0),
                        true,
                    )],
                    views: 312,
                }),
            ],
            active_question: None,
            active_tag: None,
            sort_by: QuestionSort::Newest,
        }
    }

    fn reduce(state: &mut QaState, action: QaAction) -> bool {
        match action {
            QaAction::Vote {
                question_id,
                answer_id,
                direction,
            } => state.vote(&question_id, answer_id.as_deref(), direction),
            QaAction::AcceptAnswer {
                question_id,
                answer_id,
            } => state.accept_answer(&question_id, &answer_id),
            QaAction::SubmitAnswer {
                question_id,
                content,
            } => state.submit_answer(&question_id, &content),
            QaAction::FilterTag(tag) => state.filter_tag(tag),
            QaAction::SortBy(sort) => state.sort_by(sort),
            QaAction::Open(question_id) => state.open(question_id),
        }
    }

    fn project(state: &QaState) -> QaView {
        let mut questions: Vec<&Arc<Question>> = state
            .questions
            .iter()
            .filter(|q| match &state.active_tag {
                Some(tag) => q.tags.contains(tag),
                None => true,
            })
            .collect();

        match state.sort_by {
            QuestionSort::Newest => questions.sort_by_key(|q| Reverse(q.number())),
            QuestionSort::Votes => questions.sort_by_key(|q| Reverse(q.votes.score())),
            QuestionSort::Activity => questions.sort_by_key(|q| Reverse(q.latest_answer())),
        }

        QaView {
            tags: all_tags(state.questions.iter().map(|q| q.tags.as_slice())),
            active_tag: state.active_tag.clone(),
            sort_by: state.sort_by,
            questions: questions.into_iter().map(|q| QuestionSummary::from(&**q)).collect(),
            selected: state
                .active_question
                .as_deref()
                .and_then(|id| state.question(id))
                .cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use agora_shared::VoteDirection::{Down, Up};

    fn vote(question_id: &str, answer_id: Option<&str>, direction: VoteDirection) -> QaAction {
        QaAction::Vote {
            question_id: question_id.into(),
            answer_id: answer_id.map(str::to_string),
            direction,
        }
    }

    fn ids(view: &QaView) -> Vec<&str> {
        view.questions.iter().map(|q| q.id.as_str()).collect()
    }

    #[test]
    fn test_question_vote_cycle() {
        let store: Store<QaBoard> = Store::new();
        store.dispatch(vote("1", None, Up));
        assert_eq!(
            store.snapshot().questions[0].votes,
            VoteTally {
                upvotes: 25,
                downvotes: 2,
                user_vote: Some(Up),
            }
        );

        store.dispatch(vote("1", None, Down));
        let votes = store.snapshot().questions[0].votes.clone();
        assert_eq!((votes.upvotes, votes.downvotes), (24, 3));

        store.dispatch(vote("1", None, Down));
        let votes = store.snapshot().questions[0].votes.clone();
        assert_eq!(votes, VoteTally::new(24, 2));
    }

    #[test]
    fn test_answer_vote_leaves_siblings_shared() {
        let store: Store<QaBoard> = Store::new();
        let before = store.snapshot();
        assert!(store.dispatch(vote("1", Some("a2"), Up)));

        let after = store.snapshot();
        assert_eq!(after.questions[0].answers[1].votes.upvotes, 9);
        assert!(Arc::ptr_eq(&before.questions[0].answers[0], &after.questions[0].answers[0]));
        assert!(Arc::ptr_eq(&before.questions[1], &after.questions[1]));
        assert!(!store.dispatch(vote("1", Some("a9"), Up)));
    }

    #[test]
    fn test_accept_answer_is_exclusive() {
        let store: Store<QaBoard> = Store::new();
        assert!(store.dispatch(QaAction::AcceptAnswer {
            question_id: "1".into(),
            answer_id: "a2".into(),
        }));

        let state = store.snapshot();
        let accepted: Vec<&str> = state.questions[0]
            .answers
            .iter()
            .filter(|a| a.is_accepted)
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(accepted, ["a2"]);

        // Accepting again, or an answer that does not exist, changes nothing.
        assert!(!store.dispatch(QaAction::AcceptAnswer {
            question_id: "1".into(),
            answer_id: "a2".into(),
        }));
        assert!(!store.dispatch(QaAction::AcceptAnswer {
            question_id: "1".into(),
            answer_id: "a4".into(),
        }));
    }

    #[test]
    fn test_submit_answer_numbers_across_board() {
        let store: Store<QaBoard> = Store::new();
        assert!(store.dispatch(QaAction::SubmitAnswer {
            question_id: "2".into(),
            content: "  Try Jotai  ".into(),
        }));
        let state = store.snapshot();
        let answer = state.questions[1].answers.last().unwrap();
        assert_eq!(answer.id, "a5");
        assert_eq!(answer.content, "Try Jotai");
        assert_eq!(answer.author, "You");

        assert!(!store.dispatch(QaAction::SubmitAnswer {
            question_id: "2".into(),
            content: "   ".into(),
        }));
    }

    #[test]
    fn test_first_answer_id_on_empty_board() {
        assert_eq!(QaState::default().next_answer_id(), "a1");
    }

    #[test]
    fn test_sorting_and_filter() {
        let store: Store<QaBoard> = Store::new();
        assert_eq!(ids(&store.view()), ["3", "2", "1"]);

        store.dispatch(QaAction::SortBy(QuestionSort::Votes));
        assert_eq!(ids(&store.view()), ["3", "2", "1"]);

        store.dispatch(QaAction::SubmitAnswer {
            question_id: "1".into(),
            content: "Use server-sent events".into(),
        });
        store.dispatch(QaAction::SortBy(QuestionSort::Activity));
        assert_eq!(ids(&store.view()), ["1", "3", "2"]);

        store.dispatch(QaAction::FilterTag(Some("react".into())));
        assert_eq!(ids(&store.view()), ["1", "2"]);
        assert!(store.view().tags.contains(&"next.js".to_string()));
    }

    #[test]
    fn test_open_selects_question() {
        let store: Store<QaBoard> = Store::new();
        assert!(!store.dispatch(QaAction::Open(Some("7".into()))));
        assert!(store.dispatch(QaAction::Open(Some("2".into()))));

        let view = store.view();
        let selected = view.selected.unwrap();
        assert_eq!(selected.answers.len(), 1);
        assert_eq!(view.questions.iter().find(|q| q.id == "2").unwrap().score, 31);
    }
}
