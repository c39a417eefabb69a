//! Access - Risoluzione ruolo -> capacità
//!
//! Le pagine non controllano mai il ruolo direttamente: chiedono una capacità.
//! La tabella ruolo/capacità vive solo qui.

use crate::entities::{AccountMembership, AccountRole};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument, warn};

use super::AppError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Rinominare l'account e cambiarne il logo
    ManageAccount,
    /// Cambiare ruolo o rimuovere altri membri
    ManageMembers,
    /// Creare e revocare inviti
    ManageInvites,
    /// Rinominare le categorie di messaggi
    EditCategories,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::ManageAccount => "manage_account",
            Capability::ManageMembers => "manage_members",
            Capability::ManageInvites => "manage_invites",
            Capability::EditCategories => "edit_categories",
        };
        f.write_str(name)
    }
}

/// Insieme di capacità dell'utente corrente sull'account
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub manage_account: bool,
    pub manage_members: bool,
    pub manage_invites: bool,
    pub edit_categories: bool,
}

/// Regole che non dipendono dal ruolo ma dalla configurazione
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy {
    pub standard_members_can_invite: bool,
}

impl Capabilities {
    pub fn resolve(role: AccountRole, policy: &AccessPolicy) -> Self {
        match role {
            AccountRole::Admin => Self {
                manage_account: true,
                manage_members: true,
                manage_invites: true,
                edit_categories: true,
            },
            AccountRole::Standard => Self {
                manage_account: false,
                manage_members: false,
                manage_invites: policy.standard_members_can_invite,
                edit_categories: true,
            },
            AccountRole::Guest => Self::default(),
        }
    }

    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::ManageAccount => self.manage_account,
            Capability::ManageMembers => self.manage_members,
            Capability::ManageInvites => self.manage_invites,
            Capability::EditCategories => self.edit_categories,
        }
    }
}

/// Utente autenticato e sua membership nell'account indicato dal path
#[derive(Debug, Clone)]
pub struct AccountContext {
    pub user_id: String,
    pub account_id: String,
    pub membership: AccountMembership,
    pub capabilities: Capabilities,
}

impl AccountContext {
    pub fn new(membership: AccountMembership, policy: &AccessPolicy) -> Self {
        let capabilities = Capabilities::resolve(membership.role, policy);
        Self {
            user_id: membership.user_id.clone(),
            account_id: membership.account_id.clone(),
            membership,
            capabilities,
        }
    }

    pub fn role(&self) -> AccountRole {
        self.membership.role
    }
}

/// Verifica che il contesto abbia la capacità richiesta
#[instrument(skip(ctx), fields(user_id = %ctx.user_id, account_id = %ctx.account_id))]
pub fn require_capability(ctx: &AccountContext, capability: Capability) -> Result<(), AppError> {
    if !ctx.capabilities.allows(capability) {
        warn!(
            "User {} with role {} lacks capability {}",
            ctx.user_id,
            ctx.role(),
            capability
        );
        return Err(AppError::forbidden("Insufficient role")
            .with_details(format!("This action requires the {} capability", capability)));
    }
    debug!("Capability {} granted", capability);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn membership(role: AccountRole) -> AccountMembership {
        AccountMembership {
            id: "m1".into(),
            account_id: "acc".into(),
            user_id: "u1".into(),
            role,
            created_at: None,
        }
    }

    #[test]
    fn admin_has_every_capability() {
        let caps = Capabilities::resolve(AccountRole::Admin, &AccessPolicy::default());
        assert!(caps.manage_account && caps.manage_members && caps.manage_invites && caps.edit_categories);
    }

    #[test]
    fn standard_invites_only_when_policy_allows() {
        let closed = Capabilities::resolve(AccountRole::Standard, &AccessPolicy::default());
        assert!(!closed.manage_invites);
        assert!(closed.edit_categories);
        assert!(!closed.manage_members);

        let open = Capabilities::resolve(
            AccountRole::Standard,
            &AccessPolicy {
                standard_members_can_invite: true,
            },
        );
        assert!(open.manage_invites);
    }

    #[test]
    fn guest_is_read_only() {
        assert_eq!(
            Capabilities::resolve(AccountRole::Guest, &AccessPolicy::default()),
            Capabilities::default()
        );
    }

    #[test]
    fn require_capability_rejects_missing() {
        let ctx = AccountContext::new(membership(AccountRole::Guest), &AccessPolicy::default());
        let err = require_capability(&ctx, Capability::ManageInvites).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::FORBIDDEN);

        let ctx = AccountContext::new(membership(AccountRole::Admin), &AccessPolicy::default());
        assert!(require_capability(&ctx, Capability::ManageInvites).is_ok());
    }
}
