//! Membership services - Gestione membri e ruoli nell'account

use crate::core::{AccountContext, AppError, AppState, Capability, require_capability};
use crate::dtos::{MemberDTO, UpdateMembershipDTO};
use crate::entities::{AccountMembership, AccountRole};
use crate::repositories::{Delete, Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, State},
    http::StatusCode,
};
use axum_macros::debug_handler;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Membership del membro target, dopo aver verificato permessi e che non sia l'utente corrente
async fn target_membership(
    state: &AppState,
    ctx: &AccountContext,
    target_user_id: &str,
    self_message: &'static str,
) -> Result<AccountMembership, AppError> {
    require_capability(ctx, Capability::ManageMembers)?;

    // nessuno modifica la propria membership, nemmeno un admin
    if target_user_id == ctx.user_id {
        warn!("User {} attempted to modify own membership", ctx.user_id);
        return Err(AppError::forbidden(self_message));
    }

    state
        .memberships
        .find_by_account_and_user(&ctx.account_id, target_user_id)
        .await?
        .ok_or_else(|| {
            warn!(
                "Target user {} is not a member of account {}",
                target_user_id, ctx.account_id
            );
            AppError::not_found("The user is not a member of this account")
        })
}

#[instrument(skip(state, ctx), fields(account_id = %ctx.account_id, updating_user = %ctx.user_id, target_user = %target_user_id, new_role = %role))]
pub async fn change_member_role(
    state: &AppState,
    ctx: &AccountContext,
    target_user_id: &str,
    role: AccountRole,
) -> Result<MemberDTO, AppError> {
    debug!("Changing member role");
    let target = target_membership(state, ctx, target_user_id, "You cannot change your own role")
        .await?;

    if target.role == role {
        debug!("Role unchanged, skipping update");
        return Ok(MemberDTO::from(target));
    }

    let updated = state
        .memberships
        .update(&target.id, &UpdateMembershipDTO { role: Some(role) })
        .await?;

    let profile = state.profiles.read(&updated.user_id).await?;
    let mut member = MemberDTO::from(updated);
    if let Some(profile) = profile {
        member.email = Some(profile.email);
        member.full_name = profile.full_name;
    }
    member.can_change_role = true;
    member.can_remove = true;

    info!("Member role updated to {}", role);
    Ok(member)
}

#[instrument(skip(state, ctx), fields(account_id = %ctx.account_id, removing_user = %ctx.user_id, target_user = %target_user_id))]
pub async fn remove_member(
    state: &AppState,
    ctx: &AccountContext,
    target_user_id: &str,
) -> Result<(), AppError> {
    debug!("Removing member from account");
    let target =
        target_membership(state, ctx, target_user_id, "You cannot remove yourself").await?;

    state.memberships.delete(&target.id).await?;

    info!("Member successfully removed from account");
    Ok(())
}

// ********************* HANDLER HTTP **********************//

#[debug_handler]
#[instrument(skip(state, ctx, body), fields(account_id = %ctx.account_id, target_user = %user_id))]
pub async fn update_member_role(
    State(state): State<Arc<AppState>>,
    Path((_account_id, user_id)): Path<(String, String)>,
    Extension(ctx): Extension<AccountContext>, // ottenuto dall'account_membership_middleware
    Json(body): Json<AccountRole>,
) -> Result<Json<MemberDTO>, AppError> {
    change_member_role(&state, &ctx, &user_id, body).await.map(Json)
}

#[instrument(skip(state, ctx), fields(account_id = %ctx.account_id, target_user = %user_id))]
pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    Path((_account_id, user_id)): Path<(String, String)>,
    Extension(ctx): Extension<AccountContext>,
) -> Result<StatusCode, AppError> {
    remove_member(&state, &ctx, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
