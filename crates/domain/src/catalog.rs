use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

use tradecore_core::AppResult;

use crate::{Permission, RoleType, Specialization};

/// Immutable definition of one assignable role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDefinition {
    /// Canonical role type.
    pub role_type: RoleType,
    /// Human-readable role name for display surfaces.
    pub display_name: &'static str,
    /// Effective permission grants.
    pub permissions: BTreeSet<Permission>,
    /// Display/ranking weight; higher is more authoritative. Never
    /// consulted for access decisions.
    pub priority: u8,
    /// Trade specialization for trade-specific roles.
    pub specialization: Option<Specialization>,
}

/// Process-wide registry of role definitions.
///
/// Built once at startup and never mutated afterwards; shared by
/// reference. Covers every [`RoleType`] variant, so typed lookups are
/// total.
#[derive(Debug, Clone)]
pub struct RoleCatalog {
    definitions: HashMap<RoleType, RoleDefinition>,
}

impl RoleCatalog {
    /// Builds the standard marketplace catalog.
    ///
    /// Permission sets are composed as data: the administrative set is
    /// the union of the base, trade, and admin-only sets; moderation is
    /// base plus moderation-only; each trade role carries the trade set
    /// optionally extended with trade-specific grants.
    #[must_use]
    pub fn standard() -> Self {
        let base = base_permissions();
        let trade = trade_permissions(&base);
        let moderation = moderation_permissions(&base);
        let admin = admin_permissions(&base, &trade);

        let mut definitions = HashMap::new();
        for definition in [
            RoleDefinition {
                role_type: RoleType::User,
                display_name: "Regular User",
                permissions: base.clone(),
                priority: 10,
                specialization: None,
            },
            RoleDefinition {
                role_type: RoleType::Artisan,
                display_name: "Artisan/Contractor",
                permissions: trade.clone(),
                priority: 60,
                specialization: None,
            },
            trade_role(RoleType::Mason, "Mason", &trade, 58, Specialization::Masonry, &[]),
            trade_role(
                RoleType::Plumber,
                "Plumber",
                &trade,
                56,
                Specialization::Plumbing,
                &[Permission::TradeGasFitting],
            ),
            trade_role(
                RoleType::Electrician,
                "Electrician",
                &trade,
                54,
                Specialization::Electrical,
                &[Permission::TradeElectricalCertification],
            ),
            trade_role(
                RoleType::Carpenter,
                "Carpenter",
                &trade,
                52,
                Specialization::Carpentry,
                &[],
            ),
            trade_role(RoleType::Painter, "Painter", &trade, 50, Specialization::Painting, &[]),
            trade_role(RoleType::Tiler, "Tiler", &trade, 48, Specialization::Tiling, &[]),
            trade_role(
                RoleType::Roofer,
                "Roofer",
                &trade,
                46,
                Specialization::Roofing,
                &[Permission::TradeWorkingAtHeight],
            ),
            RoleDefinition {
                role_type: RoleType::Admin,
                display_name: "Administrator",
                permissions: admin,
                priority: 100,
                specialization: None,
            },
            RoleDefinition {
                role_type: RoleType::Moderator,
                display_name: "Moderator",
                permissions: moderation,
                priority: 90,
                specialization: None,
            },
        ] {
            definitions.insert(definition.role_type, definition);
        }

        Self { definitions }
    }

    /// Resolves a role type value to its definition.
    ///
    /// Matching is case-insensitive; unrecognized values fail with
    /// `AppError::UnknownRoleType` before any storage is touched.
    pub fn lookup(&self, role_type: &str) -> AppResult<&RoleDefinition> {
        let role_type = RoleType::from_str(role_type)?;
        Ok(self.definition(role_type))
    }

    /// Returns the definition for a typed role.
    #[must_use]
    pub fn definition(&self, role_type: RoleType) -> &RoleDefinition {
        // Total by construction: `standard` inserts every variant.
        &self.definitions[&role_type]
    }
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn trade_role(
    role_type: RoleType,
    display_name: &'static str,
    trade: &BTreeSet<Permission>,
    priority: u8,
    specialization: Specialization,
    extras: &[Permission],
) -> RoleDefinition {
    let mut permissions = trade.clone();
    permissions.extend(extras.iter().copied());

    RoleDefinition {
        role_type,
        display_name,
        permissions,
        priority,
        specialization: Some(specialization),
    }
}

fn base_permissions() -> BTreeSet<Permission> {
    BTreeSet::from([
        Permission::FeedRead,
        Permission::CommentCreate,
        Permission::ReactionCreate,
        Permission::ReportCreate,
        Permission::ProfileEditOwn,
    ])
}

fn trade_permissions(base: &BTreeSet<Permission>) -> BTreeSet<Permission> {
    let mut permissions = base.clone();
    permissions.extend([
        Permission::PortfolioManage,
        Permission::WorkPublish,
        Permission::JobQuote,
    ]);
    permissions
}

fn moderation_permissions(base: &BTreeSet<Permission>) -> BTreeSet<Permission> {
    let mut permissions = base.clone();
    permissions.extend([
        Permission::ModerationCommentRemove,
        Permission::ModerationReportResolve,
        Permission::ModerationUserSuspend,
    ]);
    permissions
}

fn admin_permissions(
    base: &BTreeSet<Permission>,
    trade: &BTreeSet<Permission>,
) -> BTreeSet<Permission> {
    let mut permissions = base.clone();
    permissions.extend(trade.iter().copied());
    permissions.extend([
        Permission::AdminUserManage,
        Permission::AdminRoleManage,
        Permission::AdminReportExport,
    ]);
    permissions
}
