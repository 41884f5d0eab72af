//! Portal and content status enums.
//!
//! All statuses are persisted as lowercase text columns; `as_str` /
//! `FromStr` give the canonical wire and storage spelling, and the macro
//! keeps the serde representation in lockstep with it.

use serde::{Deserialize, Serialize};

/// Error returned when a stored status string has no matching variant.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown {kind} value: {value}")]
pub struct ParseStatusError {
    /// The enum the value was parsed for.
    pub kind: &'static str,
    /// The offending input.
    pub value: String,
}

macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Canonical lowercase spelling, as stored in the database.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ParseStatusError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(ParseStatusError {
                        kind: stringify!($name),
                        value: other.to_owned(),
                    }),
                }
            }
        }
    };
}

text_enum! {
    /// The three self-service portals.
    AccountKind {
        Admin => "admin",
        Franchise => "franchise",
        Staff => "staff",
    }
}

impl AccountKind {
    /// Verification-token time-to-live in hours (24 h for admin and staff,
    /// 7 days for franchise partners).
    #[must_use]
    pub const fn token_ttl_hours(&self) -> i64 {
        match self {
            Self::Admin | Self::Staff => 24,
            Self::Franchise => 168,
        }
    }
}

text_enum! {
    /// Portal account lifecycle state.
    ///
    /// Accounts are created `pending` and become `active` only through
    /// email verification; `rejected` and `deactivated` are manual admin
    /// transitions.
    AccountStatus {
        Pending => "pending",
        Active => "active",
        Rejected => "rejected",
        Deactivated => "deactivated",
    }
}

text_enum! {
    /// Admin-portal role. Verified admins may still be unelevated members.
    AccountRole {
        Member => "member",
        Admin => "admin",
    }
}

text_enum! {
    /// Blog post publication state.
    BlogStatus {
        Draft => "draft",
        Published => "published",
        Archived => "archived",
    }
}

text_enum! {
    /// Course enrollment state.
    CourseStatus {
        Draft => "draft",
        Open => "open",
        Closed => "closed",
    }
}

text_enum! {
    /// Gallery image visibility.
    GalleryStatus {
        Hidden => "hidden",
        Visible => "visible",
    }
}

text_enum! {
    /// Portfolio item publication state.
    PortfolioStatus {
        Draft => "draft",
        Published => "published",
    }
}

text_enum! {
    /// Testimonial moderation state.
    TestimonialStatus {
        Pending => "pending",
        Approved => "approved",
        Hidden => "hidden",
    }
}

text_enum! {
    /// Course registration follow-up state.
    RegistrationStatus {
        New => "new",
        Contacted => "contacted",
        Enrolled => "enrolled",
        Closed => "closed",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_through_str() {
        for status in [
            AccountStatus::Pending,
            AccountStatus::Active,
            AccountStatus::Rejected,
            AccountStatus::Deactivated,
        ] {
            assert_eq!(status.as_str().parse::<AccountStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_unknown_value_is_an_error() {
        let err = "shipped".parse::<BlogStatus>().unwrap_err();
        assert_eq!(err.kind, "BlogStatus");
        assert_eq!(err.value, "shipped");
    }

    #[test]
    fn test_serde_matches_storage_spelling() {
        let json = serde_json::to_string(&BlogStatus::Published).unwrap();
        assert_eq!(json, "\"published\"");
        let parsed: AccountKind = serde_json::from_str("\"franchise\"").unwrap();
        assert_eq!(parsed, AccountKind::Franchise);
    }

    #[test]
    fn test_token_ttls() {
        assert_eq!(AccountKind::Admin.token_ttl_hours(), 24);
        assert_eq!(AccountKind::Staff.token_ttl_hours(), 24);
        assert_eq!(AccountKind::Franchise.token_ttl_hours(), 168);
    }

    #[test]
    fn test_display() {
        assert_eq!(AccountKind::Staff.to_string(), "staff");
        assert_eq!(RegistrationStatus::Enrolled.to_string(), "enrolled");
    }
}
