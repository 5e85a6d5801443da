//! Authorization guard for plaza.
//!
//! Every operation carries a [`Policy`]; [`authorize`] evaluates it against
//! the acting identity and, where relevant, the owner of the target entity.
//! This table is the only place role and ownership rules live.

use thiserror::Error;

use super::token::Identity;
use crate::db::Role;
use crate::PlazaError;

/// Access rule attached to an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Anyone, with or without a credential.
    Public,
    /// Any authenticated identity.
    Authenticated,
    /// An identity holding the given role.
    Role(Role),
    /// The identity that owns the target.
    Owner,
    /// The owner, or an identity holding the given role.
    OwnerOrRole(Role),
}

impl Policy {
    /// Whether this policy needs the target's owner to decide.
    pub fn needs_owner(&self) -> bool {
        matches!(self, Policy::Owner | Policy::OwnerOrRole(_))
    }
}

/// Operations subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreatePost,
    CreateComment,
    CreateAdminReply,
    UpdatePost,
    UpdateComment,
    UpdateAdminReply,
    DeletePost,
    DeleteComment,
    DeleteAdminReply,
    LikePost,
    LikeComment,
    Read,
    ModeratePosts,
}

impl Operation {
    /// The policy governing this operation.
    pub fn policy(&self) -> Policy {
        match self {
            Operation::CreatePost
            | Operation::CreateComment
            | Operation::LikePost
            | Operation::LikeComment => Policy::Authenticated,
            Operation::CreateAdminReply | Operation::ModeratePosts => Policy::Role(Role::Admin),
            Operation::UpdatePost
            | Operation::UpdateComment
            | Operation::UpdateAdminReply
            | Operation::DeleteAdminReply => Policy::Owner,
            Operation::DeletePost | Operation::DeleteComment => Policy::OwnerOrRole(Role::Admin),
            Operation::Read => Policy::Public,
        }
    }

    /// Client-facing error for a denial of this operation.
    pub fn denial_error(&self, denial: Denial) -> PlazaError {
        let message = match (self, denial) {
            (_, Denial::Unauthenticated) => return PlazaError::from(denial),
            (Operation::CreateAdminReply, _) => "Only admins can post official replies",
            (Operation::ModeratePosts, _) => "Only admins can access moderation dashboard",
            (Operation::UpdatePost, _) => "You can only update your own posts",
            (Operation::UpdateComment, _) => "You can only update your own comments",
            (Operation::UpdateAdminReply, _) => "You can only update your own replies",
            (Operation::DeletePost, _) => "You don't have permission to delete this post",
            (Operation::DeleteComment, _) => "You don't have permission to delete this comment",
            (Operation::DeleteAdminReply, _) => "You can only delete your own replies",
            _ => return PlazaError::from(denial),
        };
        PlazaError::Permission(message.to_string())
    }

    /// Short name used in log events.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreatePost => "create_post",
            Operation::CreateComment => "create_comment",
            Operation::CreateAdminReply => "create_admin_reply",
            Operation::UpdatePost => "update_post",
            Operation::UpdateComment => "update_comment",
            Operation::UpdateAdminReply => "update_admin_reply",
            Operation::DeletePost => "delete_post",
            Operation::DeleteComment => "delete_comment",
            Operation::DeleteAdminReply => "delete_admin_reply",
            Operation::LikePost => "like_post",
            Operation::LikeComment => "like_comment",
            Operation::Read => "read",
            Operation::ModeratePosts => "moderate_posts",
        }
    }
}

/// Why an operation was denied.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// No acting identity.
    #[error("authentication required")]
    Unauthenticated,

    /// The identity lacks the required role.
    #[error("insufficient role")]
    Forbidden,

    /// The identity does not own the target.
    #[error("not the owner of this resource")]
    NotOwner,
}

impl Denial {
    /// Short name used in log events.
    pub fn reason(&self) -> &'static str {
        match self {
            Denial::Unauthenticated => "unauthenticated",
            Denial::Forbidden => "forbidden",
            Denial::NotOwner => "not_owner",
        }
    }
}

impl From<Denial> for PlazaError {
    fn from(d: Denial) -> Self {
        match d {
            Denial::Unauthenticated => PlazaError::Auth("No token provided".to_string()),
            Denial::Forbidden => PlazaError::Permission("Admin access required".to_string()),
            Denial::NotOwner => {
                PlazaError::Permission("You can only modify your own content".to_string())
            }
        }
    }
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

impl Decision {
    /// Convert into a `Result`.
    pub fn into_result(self) -> Result<(), Denial> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(d) => Err(d),
        }
    }
}

/// Decide whether `actor` may perform `op` on a target owned by `owner`.
///
/// `owner` is ignored by policies that do not look at ownership. For
/// ownership policies a missing owner never matches.
pub fn authorize(actor: Option<&Identity>, op: Operation, owner: Option<i64>) -> Decision {
    let decision = evaluate(actor, op.policy(), owner);

    if let Decision::Deny(denial) = decision {
        match denial {
            Denial::Unauthenticated => {
                tracing::debug!(operation = op.as_str(), reason = denial.reason(), "access denied");
            }
            Denial::Forbidden | Denial::NotOwner => {
                tracing::warn!(
                    operation = op.as_str(),
                    reason = denial.reason(),
                    user_id = actor.map(|a| a.id),
                    owner_id = owner,
                    "access denied"
                );
            }
        }
    }

    decision
}

/// Shorthand for `authorize(..)` converted into a crate error carrying a
/// message specific to the operation.
pub fn require(actor: Option<&Identity>, op: Operation, owner: Option<i64>) -> crate::Result<()> {
    authorize(actor, op, owner)
        .into_result()
        .map_err(|d| op.denial_error(d))
}

/// Check the part of `op`'s policy that does not depend on the target and
/// return the acting identity.
///
/// Ownership policies only need an identity at this point; call
/// [`require`] with the owner once the target is loaded.
pub fn require_actor(actor: Option<&Identity>, op: Operation) -> crate::Result<&Identity> {
    let decision = match actor {
        Some(_) if op.policy().needs_owner() => Decision::Allow,
        _ => authorize(actor, op, None),
    };
    decision.into_result().map_err(|d| op.denial_error(d))?;
    actor.ok_or_else(|| op.denial_error(Denial::Unauthenticated))
}

fn evaluate(actor: Option<&Identity>, policy: Policy, owner: Option<i64>) -> Decision {
    if policy == Policy::Public {
        return Decision::Allow;
    }

    let Some(actor) = actor else {
        return Decision::Deny(Denial::Unauthenticated);
    };

    let is_owner = owner == Some(actor.id);

    match policy {
        Policy::Public | Policy::Authenticated => Decision::Allow,
        Policy::Role(role) if actor.role == role => Decision::Allow,
        Policy::Role(_) => Decision::Deny(Denial::Forbidden),
        Policy::Owner if is_owner => Decision::Allow,
        Policy::Owner => Decision::Deny(Denial::NotOwner),
        Policy::OwnerOrRole(role) if is_owner || actor.role == role => Decision::Allow,
        Policy::OwnerOrRole(_) => Decision::Deny(Denial::NotOwner),
    }
}
