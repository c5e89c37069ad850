use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tradecore_core::AppError;

/// Permissions enforced by authorization checks.
///
/// A permission is an opaque grant for one action; access is gated by
/// permission presence only, never by role priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Allows reading the marketplace feed.
    FeedRead,
    /// Allows commenting on feed entries.
    CommentCreate,
    /// Allows reacting to feed entries.
    ReactionCreate,
    /// Allows reporting content.
    ReportCreate,
    /// Allows editing the caller's own profile.
    ProfileEditOwn,
    /// Allows managing a professional portfolio.
    PortfolioManage,
    /// Allows publishing portfolio works.
    WorkPublish,
    /// Allows quoting on posted jobs.
    JobQuote,
    /// Allows removing comments as a moderator.
    ModerationCommentRemove,
    /// Allows resolving content reports.
    ModerationReportResolve,
    /// Allows suspending users.
    ModerationUserSuspend,
    /// Allows managing user accounts.
    AdminUserManage,
    /// Allows managing role assignments.
    AdminRoleManage,
    /// Allows exporting report data.
    AdminReportExport,
    /// Allows advertising certified gas fitting work.
    TradeGasFitting,
    /// Allows advertising certified electrical work.
    TradeElectricalCertification,
    /// Allows advertising certified work at height.
    TradeWorkingAtHeight,
}

impl Permission {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FeedRead => "feed.read",
            Self::CommentCreate => "comment.create",
            Self::ReactionCreate => "reaction.create",
            Self::ReportCreate => "report.create",
            Self::ProfileEditOwn => "profile.edit_own",
            Self::PortfolioManage => "portfolio.manage",
            Self::WorkPublish => "work.publish",
            Self::JobQuote => "job.quote",
            Self::ModerationCommentRemove => "moderation.comment.remove",
            Self::ModerationReportResolve => "moderation.report.resolve",
            Self::ModerationUserSuspend => "moderation.user.suspend",
            Self::AdminUserManage => "admin.user.manage",
            Self::AdminRoleManage => "admin.role.manage",
            Self::AdminReportExport => "admin.report.export",
            Self::TradeGasFitting => "trade.gas_fitting",
            Self::TradeElectricalCertification => "trade.electrical_certification",
            Self::TradeWorkingAtHeight => "trade.working_at_height",
        }
    }

    /// Returns all known permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Permission] = &[
            Permission::FeedRead,
            Permission::CommentCreate,
            Permission::ReactionCreate,
            Permission::ReportCreate,
            Permission::ProfileEditOwn,
            Permission::PortfolioManage,
            Permission::WorkPublish,
            Permission::JobQuote,
            Permission::ModerationCommentRemove,
            Permission::ModerationReportResolve,
            Permission::ModerationUserSuspend,
            Permission::AdminUserManage,
            Permission::AdminRoleManage,
            Permission::AdminReportExport,
            Permission::TradeGasFitting,
            Permission::TradeElectricalCertification,
            Permission::TradeWorkingAtHeight,
        ];

        ALL
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .find(|permission| permission.as_str() == value)
            .copied()
            .ok_or_else(|| AppError::Validation(format!("unknown permission value '{value}'")))
    }
}
