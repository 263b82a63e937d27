//! Event RSVP widget.

use std::sync::Arc;

use serde::Serialize;

use agora_shared::constants::{LOCAL_USER_AVATAR, LOCAL_USER_NAME};
use agora_shared::AttendanceStatus;

use crate::store::{find_mut, Widget};

/// Id given to the local user's attendee record.
pub const LOCAL_ATTENDEE_ID: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub status: Option<AttendanceStatus>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpState {
    pub status: Option<AttendanceStatus>,
    pub attendees: Vec<Arc<Attendee>>,
}

#[derive(Debug, Clone)]
pub enum RsvpAction {
    Respond(Option<AttendanceStatus>),
}

impl RsvpState {
    /// Record the local user's answer. The first answer adds a single "You"
    /// attendee; later answers update that record in place.
    pub fn respond(&mut self, status: Option<AttendanceStatus>) -> bool {
        let had_record = self.attendees.iter().any(|a| a.name == LOCAL_USER_NAME);
        if had_record && self.status == status {
            return false;
        }
        self.status = status;

        match find_mut(&mut self.attendees, |a| a.name == LOCAL_USER_NAME) {
            Some(me) => me.status = status,
            None => self.attendees.push(Arc::new(Attendee {
                id: LOCAL_ATTENDEE_ID.to_string(),
                name: LOCAL_USER_NAME.to_string(),
                avatar: LOCAL_USER_AVATAR.to_string(),
                status,
            })),
        }
        true
    }

    pub fn count(&self, status: AttendanceStatus) -> usize {
        self.attendees
            .iter()
            .filter(|a| a.status == Some(status))
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpCounts {
    pub going: usize,
    pub maybe: usize,
    pub not_going: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpView {
    pub status: Option<AttendanceStatus>,
    pub counts: RsvpCounts,
    /// Attendees shown in the "who's coming" strip: going or maybe.
    pub visible: Vec<Arc<Attendee>>,
}

pub struct EventRsvp;

impl Widget for EventRsvp {
    const NAME: &'static str = "rsvp";

    type State = RsvpState;
    type Action = RsvpAction;
    type View = RsvpView;

    fn seed() -> RsvpState {
        use agora_shared::AttendanceStatus::*;

        let attendee = |id: &str, name: &str, avatar: &str, status| {
            Arc::new(Attendee {
                id: id.to_string(),
                name: name.to_string(),
                avatar: avatar.to_string(),
                status: Some(status),
            })
        };

        RsvpState {
            status: None,
            attendees: vec![
                attendee("1", "Alex Johnson", "/q1.png", Going),
                attendee("2", "Jamie Smith", "/q2.png", Going),
                attendee("3", "Taylor Brown", "/q3.png", Maybe),
                attendee("4", "Casey Wilson", "/q4.png", NotGoing),
                attendee("5", "Jordan Lee", "/q5.png", Going),
            ],
        }
    }

    fn reduce(state: &mut RsvpState, action: RsvpAction) -> bool {
        match action {
            RsvpAction::Respond(status) => state.respond(status),
        }
    }

    fn project(state: &RsvpState) -> RsvpView {
        RsvpView {
            status: state.status,
            counts: RsvpCounts {
                going: state.count(AttendanceStatus::Going),
                maybe: state.count(AttendanceStatus::Maybe),
                not_going: state.count(AttendanceStatus::NotGoing),
            },
            visible: state
                .attendees
                .iter()
                .filter(|a| {
                    matches!(
                        a.status,
                        Some(AttendanceStatus::Going) | Some(AttendanceStatus::Maybe)
                    )
                })
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    #[test]
    fn test_seed_counts() {
        let view = Store::<EventRsvp>::new().view();
        assert_eq!(
            view.counts,
            RsvpCounts {
                going: 3,
                maybe: 1,
                not_going: 1
            }
        );
        assert_eq!(view.visible.len(), 4);
        assert_eq!(view.status, None);
    }

    #[test]
    fn test_single_local_record() {
        let store: Store<EventRsvp> = Store::new();
        store.dispatch(RsvpAction::Respond(Some(AttendanceStatus::Going)));
        store.dispatch(RsvpAction::Respond(Some(AttendanceStatus::Maybe)));
        store.dispatch(RsvpAction::Respond(Some(AttendanceStatus::NotGoing)));

        let state = store.snapshot();
        let mine: Vec<_> = state.attendees.iter().filter(|a| a.name == "You").collect();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, LOCAL_ATTENDEE_ID);
        assert_eq!(mine[0].status, Some(AttendanceStatus::NotGoing));

        let view = store.view();
        assert_eq!(view.counts.not_going, 2);
        assert_eq!(view.counts.going, 3);
        assert_eq!(view.status, Some(AttendanceStatus::NotGoing));
    }

    #[test]
    fn test_repeat_answer_is_noop() {
        let store: Store<EventRsvp> = Store::new();
        assert!(store.dispatch(RsvpAction::Respond(Some(AttendanceStatus::Maybe))));
        assert!(!store.dispatch(RsvpAction::Respond(Some(AttendanceStatus::Maybe))));
        assert_eq!(store.view().counts.maybe, 2);
    }

    #[test]
    fn test_withdraw_keeps_record() {
        let mut state = EventRsvp::seed();
        state.respond(Some(AttendanceStatus::Going));
        assert!(state.respond(None));
        assert_eq!(state.attendees.len(), 6);
        assert_eq!(state.count(AttendanceStatus::Going), 3);
    }
}
