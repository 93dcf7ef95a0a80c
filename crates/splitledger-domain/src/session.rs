//! Sessions: a named roster of participants settling expenses together.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::{Currency, Percentage};
use crate::participant::{Participant, ParticipantRole};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// A shared-expense session. The creator is always part of the roster;
/// `weights` is the optional percentage allocation, resolved once at
/// computation entry (absent means equal split across the full roster).
pub struct Session {
    pub id: Uuid,
    pub name: String,
    pub kind: SessionKind,
    pub currency: Currency,
    pub creator: Participant,
    pub members: Vec<Participant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<AllocationWeight>>,
}

impl Session {
    pub fn new(
        name: impl Into<String>,
        kind: SessionKind,
        currency: Currency,
        creator_name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            currency,
            creator: Participant::new(creator_name, ParticipantRole::Owner),
            members: Vec::new(),
            weights: None,
        }
    }

    pub fn with_member(mut self, display_name: impl Into<String>) -> Self {
        self.members
            .push(Participant::new(display_name, ParticipantRole::Member));
        self
    }

    pub fn with_weights(mut self, weights: Vec<AllocationWeight>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// The full roster in stable order: creator first, then members in
    /// insertion order. Remainder distribution and tie-breaks follow this
    /// order.
    pub fn roster(&self) -> Vec<&Participant> {
        std::iter::once(&self.creator)
            .chain(self.members.iter())
            .collect()
    }

    pub fn participant_count(&self) -> usize {
        self.members.len() + 1
    }

    pub fn participant(&self, id: Uuid) -> Option<&Participant> {
        if self.creator.id == id {
            return Some(&self.creator);
        }
        self.members.iter().find(|member| member.id == id)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Session lifecycle taxonomy; informational to the engine, surfaced in
/// ledger entry descriptions.
pub enum SessionKind {
    OneOff,
    Recurring,
    Permanent,
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionKind::OneOff => "One-off",
            SessionKind::Recurring => "Recurring",
            SessionKind::Permanent => "Permanent",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// One participant's configured share of the session's costs. Weights for
/// all roster participants must sum to 100% within one minor
/// percentage point.
pub struct AllocationWeight {
    pub participant_id: Uuid,
    pub percentage: Percentage,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eur() -> Currency {
        Currency::from_code("EUR").unwrap()
    }

    #[test]
    fn roster_lists_creator_first_then_members_in_order() {
        let session = Session::new("Trip", SessionKind::OneOff, eur(), "Ana")
            .with_member("Bruno")
            .with_member("Carla");

        let names: Vec<&str> = session
            .roster()
            .iter()
            .map(|p| p.display_name.as_str())
            .collect();
        assert_eq!(names, ["Ana", "Bruno", "Carla"]);
        assert_eq!(session.participant_count(), 3);
    }

    #[test]
    fn participant_lookup_covers_creator_and_members() {
        let session = Session::new("Flat", SessionKind::Permanent, eur(), "Ana").with_member("Bruno");
        let creator_id = session.creator.id;
        let member_id = session.members[0].id;

        assert_eq!(session.participant(creator_id).unwrap().role, ParticipantRole::Owner);
        assert_eq!(session.participant(member_id).unwrap().role, ParticipantRole::Member);
        assert!(session.participant(Uuid::new_v4()).is_none());
    }
}
