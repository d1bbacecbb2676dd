use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Account role, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Visitor,
    User,
    FoundationAdmin,
    SuperAdmin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Visitor, Role::User, Role::FoundationAdmin, Role::SuperAdmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Visitor => "VISITOR",
            Role::User => "USER",
            Role::FoundationAdmin => "FOUNDATION_ADMIN",
            Role::SuperAdmin => "SUPER_ADMIN",
        }
    }

    /// Foundation staff or platform administrators.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::FoundationAdmin | Role::SuperAdmin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "pet_species", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PetSpecies {
    Dog,
    Cat,
    Rabbit,
    Bird,
    Hamster,
    GuineaPig,
    Fish,
    Reptile,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "pet_gender", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PetGender {
    Male,
    Female,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "pet_size", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PetSize {
    Small,
    Medium,
    Large,
    ExtraLarge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "pet_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PetStatus {
    Available,
    Pending,
    Adopted,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "adoption_request_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdoptionRequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl AdoptionRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdoptionRequestStatus::Pending => "PENDING",
            AdoptionRequestStatus::Approved => "APPROVED",
            AdoptionRequestStatus::Rejected => "REJECTED",
            AdoptionRequestStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, AdoptionRequestStatus::Pending)
    }

    /// Whether a request may move from `self` to `next`.
    ///
    /// With `strict` off every move is accepted, matching the permissive
    /// review workflow where a later decision overwrites an earlier one.
    pub fn can_transition_to(&self, next: AdoptionRequestStatus, strict: bool) -> bool {
        if !strict {
            return true;
        }
        *self == AdoptionRequestStatus::Pending && next != AdoptionRequestStatus::Pending
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AdoptionRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AdoptionRequestStatus::*;

    #[test]
    fn pending_moves_to_every_terminal_state() {
        for next in [Approved, Rejected, Cancelled] {
            assert!(Pending.can_transition_to(next, true), "PENDING -> {}", next);
        }
        assert!(!Pending.can_transition_to(Pending, true));
    }

    #[test]
    fn terminal_states_are_final_when_strict() {
        for from in [Approved, Rejected, Cancelled] {
            assert!(from.is_terminal());
            for next in [Pending, Approved, Rejected, Cancelled] {
                assert!(!from.can_transition_to(next, true), "{} -> {}", from, next);
            }
        }
    }

    #[test]
    fn permissive_mode_allows_overwrites() {
        assert!(Approved.can_transition_to(Cancelled, false));
        assert!(Rejected.can_transition_to(Approved, false));
    }

    #[test]
    fn enums_use_screaming_snake_case_on_the_wire() {
        assert_eq!(serde_json::to_string(&Role::FoundationAdmin).unwrap(), "\"FOUNDATION_ADMIN\"");
        assert_eq!(serde_json::to_string(&PetSpecies::GuineaPig).unwrap(), "\"GUINEA_PIG\"");
        assert_eq!(serde_json::to_string(&PetSize::ExtraLarge).unwrap(), "\"EXTRA_LARGE\"");
        let status: AdoptionRequestStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(status, Cancelled);
    }

    #[test]
    fn staff_roles() {
        assert!(Role::FoundationAdmin.is_staff());
        assert!(Role::SuperAdmin.is_staff());
        assert!(!Role::User.is_staff());
        assert!(!Role::Visitor.is_staff());
    }
}
