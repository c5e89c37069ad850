use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tradecore_core::AppError;

/// Role types assignable to marketplace users.
///
/// The enumeration is closed: every role type referenced by an
/// assignment resolves to exactly one catalog definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleType {
    /// Regular marketplace user.
    User,
    /// Generic artisan/contractor without a single trade.
    Artisan,
    /// Mason trade role.
    Mason,
    /// Plumber trade role.
    Plumber,
    /// Electrician trade role.
    Electrician,
    /// Carpenter trade role.
    Carpenter,
    /// Painter trade role.
    Painter,
    /// Tiler trade role.
    Tiler,
    /// Roofer trade role.
    Roofer,
    /// Platform administrator.
    Admin,
    /// Content moderator.
    Moderator,
}

impl RoleType {
    /// Returns the canonical storage value for this role type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Artisan => "ARTISAN",
            Self::Mason => "MASON",
            Self::Plumber => "PLUMBER",
            Self::Electrician => "ELECTRICIAN",
            Self::Carpenter => "CARPENTER",
            Self::Painter => "PAINTER",
            Self::Tiler => "TILER",
            Self::Roofer => "ROOFER",
            Self::Admin => "ADMIN",
            Self::Moderator => "MODERATOR",
        }
    }

    /// Returns all known role types.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[RoleType] = &[
            RoleType::User,
            RoleType::Artisan,
            RoleType::Mason,
            RoleType::Plumber,
            RoleType::Electrician,
            RoleType::Carpenter,
            RoleType::Painter,
            RoleType::Tiler,
            RoleType::Roofer,
            RoleType::Admin,
            RoleType::Moderator,
        ];

        ALL
    }
}

impl FromStr for RoleType {
    type Err = AppError;

    /// Parses a role type value. Matching is case-insensitive; the
    /// canonical form is upper snake case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "USER" => Ok(Self::User),
            "ARTISAN" => Ok(Self::Artisan),
            "MASON" => Ok(Self::Mason),
            "PLUMBER" => Ok(Self::Plumber),
            "ELECTRICIAN" => Ok(Self::Electrician),
            "CARPENTER" => Ok(Self::Carpenter),
            "PAINTER" => Ok(Self::Painter),
            "TILER" => Ok(Self::Tiler),
            "ROOFER" => Ok(Self::Roofer),
            "ADMIN" => Ok(Self::Admin),
            "MODERATOR" => Ok(Self::Moderator),
            _ => Err(AppError::UnknownRoleType(value.to_owned())),
        }
    }
}

/// Trade specialization attached to trade-specific role definitions.
///
/// Callers look the specialization up on the definition; there is no
/// per-trade subtype to match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Specialization {
    /// Masonry and bricklaying work.
    Masonry,
    /// Plumbing and pipe fitting work.
    Plumbing,
    /// Electrical installation work.
    Electrical,
    /// Carpentry and joinery work.
    Carpentry,
    /// Painting and decorating work.
    Painting,
    /// Wall and floor tiling work.
    Tiling,
    /// Roofing work.
    Roofing,
}

impl Specialization {
    /// Returns a stable storage value for this specialization.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Masonry => "masonry",
            Self::Plumbing => "plumbing",
            Self::Electrical => "electrical",
            Self::Carpentry => "carpentry",
            Self::Painting => "painting",
            Self::Tiling => "tiling",
            Self::Roofing => "roofing",
        }
    }
}
