//! Identifier types for catalog and booking records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid user identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid user id: {reason}")]
pub struct InvalidUserId {
    reason: &'static str,
}

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Returns the raw numeric value.
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a persisted catalog route.
    RouteId
);

numeric_id!(
    /// Identifier of a vehicle registered by an operator.
    VehicleId
);

numeric_id!(
    /// Identifier of a reservation.
    ReservationId
);

numeric_id!(
    /// Identifier of an organisation (operator company) owning routes.
    OrganisationId
);

/// Identifier of an authenticated user.
///
/// Authentication happens outside the core; the only validation here is
/// that the identifier is non-blank.
///
/// # Examples
///
/// ```
/// use trip_planner::domain::UserId;
///
/// let user = UserId::new("amira@example.tn").unwrap();
/// assert_eq!(user.as_str(), "amira@example.tn");
///
/// assert!(UserId::new("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a user id, trimming surrounding whitespace.
    pub fn new(s: impl AsRef<str>) -> Result<Self, InvalidUserId> {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            return Err(InvalidUserId {
                reason: "user id cannot be empty",
            });
        }
        Ok(UserId(trimmed.to_string()))
    }

    /// Returns the user id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = InvalidUserId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        UserId::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Caller context for lifecycle operations.
///
/// Passed explicitly to every operation that acts on behalf of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The user performing the operation.
    pub user: UserId,

    /// The organisation the user acts for, if any.
    pub organisation: Option<OrganisationId>,
}

impl Session {
    /// Session for a user acting on their own behalf.
    pub fn user(user: UserId) -> Self {
        Self {
            user,
            organisation: None,
        }
    }

    /// Session for a user acting for an organisation.
    pub fn for_organisation(user: UserId, organisation: OrganisationId) -> Self {
        Self {
            user,
            organisation: Some(organisation),
        }
    }
}
