//! Session participants.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// A member of a shared-expense session. Identity is stable for the
/// session's lifetime and maps to exactly one allocation weight at
/// computation time.
pub struct Participant {
    pub id: Uuid,
    pub display_name: String,
    pub role: ParticipantRole,
}

impl Participant {
    pub fn new(display_name: impl Into<String>, role: ParticipantRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name: display_name.into(),
            role,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Distinguishes the session creator from invited members.
pub enum ParticipantRole {
    Owner,
    Member,
}

impl fmt::Display for ParticipantRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ParticipantRole::Owner => "Owner",
            ParticipantRole::Member => "Member",
        };
        f.write_str(label)
    }
}
