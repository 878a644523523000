//! Multi-user presence: who else is looking at the canvas.
//!
//! The relay itself lives elsewhere. This module defines the JSON frames
//! exchanged with it and keeps a roster of participants. Nothing here touches
//! shapes; presence never merges edits.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Presence errors. Never propagated into drawing logic.
#[derive(Debug, Error)]
pub enum PresenceError {
    #[error("Failed to encode presence frame: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("Failed to decode presence frame: {0}")]
    Decode(#[source] serde_json::Error),
}

/// A user present on the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub username: String,
}

/// Messages sent to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Join {
        room: String,
        #[serde(flatten)]
        participant: Participant,
    },
    Leave,
}

impl ClientMessage {
    pub fn to_json(&self) -> Result<String, PresenceError> {
        serde_json::to_string(self).map_err(PresenceError::Encode)
    }
}

/// Messages received from the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Room joined; lists everyone already present.
    Joined {
        room: String,
        participants: Vec<Participant>,
    },
    ParticipantJoined {
        #[serde(flatten)]
        participant: Participant,
    },
    ParticipantLeft {
        id: String,
    },
    Error {
        message: String,
    },
}

impl ServerMessage {
    pub fn from_json(raw: &str) -> Result<Self, PresenceError> {
        serde_json::from_str(raw).map_err(PresenceError::Decode)
    }
}

/// Connection state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Error,
}

/// Discrete events delivered by the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum PresenceEvent {
    Connecting,
    Connected,
    Disconnected,
    Failed { reason: String },
    /// A raw text frame from the relay.
    Frame(String),
}

type ParticipantsChanged = Box<dyn FnMut(&[Participant])>;

/// Roster of remote participants, fed by transport events.
pub struct PresenceRoster {
    local: Participant,
    state: ConnectionState,
    participants: Vec<Participant>,
    on_change: Option<ParticipantsChanged>,
}

impl fmt::Debug for PresenceRoster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresenceRoster")
            .field("local", &self.local)
            .field("state", &self.state)
            .field("participants", &self.participants)
            .finish_non_exhaustive()
    }
}

impl PresenceRoster {
    pub fn new(local: Participant) -> Self {
        Self {
            local,
            state: ConnectionState::Disconnected,
            participants: Vec::new(),
            on_change: None,
        }
    }

    /// Register the participants-changed callback.
    pub fn on_participants_changed(&mut self, callback: impl FnMut(&[Participant]) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    pub fn local(&self) -> &Participant {
        &self.local
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Remote participants, in join order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Frame announcing the local participant in `room`.
    pub fn join_message(&self, room: &str) -> Result<String, PresenceError> {
        ClientMessage::Join {
            room: room.to_string(),
            participant: self.local.clone(),
        }
        .to_json()
    }

    /// Apply one transport event.
    pub fn handle_event(&mut self, event: PresenceEvent) {
        match event {
            PresenceEvent::Connecting => self.set_state(ConnectionState::Connecting),
            PresenceEvent::Connected => self.set_state(ConnectionState::Connected),
            PresenceEvent::Disconnected => {
                self.set_state(ConnectionState::Disconnected);
                self.replace_participants(Vec::new());
            }
            PresenceEvent::Failed { reason } => {
                log::warn!("Presence connection failed: {reason}");
                self.set_state(ConnectionState::Error);
                self.replace_participants(Vec::new());
            }
            PresenceEvent::Frame(raw) => match ServerMessage::from_json(&raw) {
                Ok(message) => self.handle_message(message),
                Err(e) => log::warn!("Ignoring presence frame: {e}"),
            },
        }
    }

    fn handle_message(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::Joined { room, participants } => {
                log::info!("Joined room {room} with {} participant(s)", participants.len());
                let others = participants
                    .into_iter()
                    .filter(|p| p.id != self.local.id)
                    .collect();
                self.replace_participants(others);
            }
            ServerMessage::ParticipantJoined { participant } => {
                if participant.id == self.local.id
                    || self.participants.iter().any(|p| p.id == participant.id)
                {
                    return;
                }
                log::info!("{} joined", participant.username);
                self.participants.push(participant);
                self.notify();
            }
            ServerMessage::ParticipantLeft { id } => {
                let before = self.participants.len();
                self.participants.retain(|p| p.id != id);
                if self.participants.len() != before {
                    self.notify();
                }
            }
            ServerMessage::Error { message } => {
                log::warn!("Presence relay error: {message}");
                self.set_state(ConnectionState::Error);
            }
        }
    }

    fn set_state(&mut self, state: ConnectionState) {
        if self.state != state {
            log::info!("Presence connection: {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    fn replace_participants(&mut self, participants: Vec<Participant>) {
        if self.participants != participants {
            self.participants = participants;
            self.notify();
        }
    }

    fn notify(&mut self) {
        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.participants);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn participant(id: &str, name: &str) -> Participant {
        Participant {
            id: id.to_string(),
            username: name.to_string(),
        }
    }

    fn roster_with_log() -> (PresenceRoster, Rc<RefCell<Vec<usize>>>) {
        let mut roster = PresenceRoster::new(participant("me", "Me"));
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        roster.on_participants_changed(move |all| sink.borrow_mut().push(all.len()));
        (roster, log)
    }

    #[test]
    fn test_join_frame_format() {
        let roster = PresenceRoster::new(participant("u1", "Ada"));
        let json = roster.join_message("room-1").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "join");
        assert_eq!(value["room"], "room-1");
        assert_eq!(value["id"], "u1");
        assert_eq!(value["username"], "Ada");
    }

    #[test]
    fn test_roster_tracks_participants() {
        let (mut roster, log) = roster_with_log();
        roster.handle_event(PresenceEvent::Connected);
        roster.handle_event(PresenceEvent::Frame(
            r#"{"type":"joined","room":"r","participants":[{"id":"me","username":"Me"},{"id":"a","username":"Ada"}]}"#
                .to_string(),
        ));
        assert_eq!(roster.participants(), &[participant("a", "Ada")]);

        roster.handle_event(PresenceEvent::Frame(
            r#"{"type":"participant_joined","id":"b","username":"Bob"}"#.to_string(),
        ));
        // Duplicate join is ignored.
        roster.handle_event(PresenceEvent::Frame(
            r#"{"type":"participant_joined","id":"b","username":"Bob"}"#.to_string(),
        ));
        roster.handle_event(PresenceEvent::Frame(
            r#"{"type":"participant_left","id":"a"}"#.to_string(),
        ));
        assert_eq!(roster.participants(), &[participant("b", "Bob")]);
        assert_eq!(*log.borrow(), vec![1, 2, 1]);
    }

    #[test]
    fn test_failures_only_change_state() {
        let (mut roster, log) = roster_with_log();
        roster.handle_event(PresenceEvent::Connecting);
        assert_eq!(roster.state(), ConnectionState::Connecting);

        roster.handle_event(PresenceEvent::Frame("garbage".to_string()));
        assert_eq!(roster.state(), ConnectionState::Connecting);

        roster.handle_event(PresenceEvent::Failed {
            reason: "refused".to_string(),
        });
        assert_eq!(roster.state(), ConnectionState::Error);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_disconnect_clears_roster() {
        let (mut roster, log) = roster_with_log();
        roster.handle_event(PresenceEvent::Frame(
            r#"{"type":"participant_joined","id":"b","username":"Bob"}"#.to_string(),
        ));
        roster.handle_event(PresenceEvent::Disconnected);
        assert!(roster.participants().is_empty());
        assert_eq!(*log.borrow(), vec![1, 0]);
    }

    #[test]
    fn test_server_error_frame() {
        let mut roster = PresenceRoster::new(participant("me", "Me"));
        roster.handle_event(PresenceEvent::Connected);
        roster.handle_event(PresenceEvent::Frame(
            r#"{"type":"error","message":"room full"}"#.to_string(),
        ));
        assert_eq!(roster.state(), ConnectionState::Error);
    }
}
