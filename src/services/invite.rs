//! Invite services - Creazione, revoca e risposta agli inviti dell'account

use crate::core::{AccountContext, AppError, AppState, Capability, Session, require_capability};
use crate::dtos::{
    CreateInviteDTO, CreateInviteRequestDTO, CreateMembershipDTO, InviteDTO, MyAccountDTO,
    UpdateInviteDTO,
};
use crate::entities::AccountInvite;
use crate::repositories::{Create, Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, State},
};
use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    static ref INVITE_CODE: Regex = Regex::new(r"^[0-9a-f]{32}$").unwrap();
}

/// Codice casuale dell'invito: UUID v4 senza trattini (32 caratteri esadecimali)
pub fn generate_invite_code() -> String {
    Uuid::new_v4().simple().to_string()
}

#[instrument(skip(state, ctx, request), fields(account_id = %ctx.account_id, inviter = %ctx.user_id, role = %request.role))]
pub async fn create_invite(
    state: &AppState,
    ctx: &AccountContext,
    request: CreateInviteRequestDTO,
) -> Result<InviteDTO, AppError> {
    debug!("Creating account invite");
    require_capability(ctx, Capability::ManageInvites)?;

    let request = CreateInviteRequestDTO {
        email: request
            .email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty()),
        role: request.role,
    };
    request.validate()?;

    let invite = state
        .invites
        .create(&CreateInviteDTO {
            account_id: ctx.account_id.clone(),
            inviter_id: ctx.user_id.clone(),
            email: request.email,
            role: request.role,
            invite_code: generate_invite_code(),
            active: true,
        })
        .await?;

    info!("Invite {} created", invite.id);
    Ok(InviteDTO::from_invite(invite, &state.app_origin))
}

/// Disattiva l'invito; il record resta nello store
#[instrument(skip(state, ctx), fields(account_id = %ctx.account_id, invite_id = %invite_id))]
pub async fn revoke_invite(
    state: &AppState,
    ctx: &AccountContext,
    invite_id: &str,
) -> Result<InviteDTO, AppError> {
    debug!("Revoking invite");
    require_capability(ctx, Capability::ManageInvites)?;

    let invite_id = invite_id.to_string();
    let invite = state
        .invites
        .read(&invite_id)
        .await?
        .filter(|invite| invite.account_id == ctx.account_id)
        .ok_or_else(|| {
            warn!("Invite {} not found in account", invite_id);
            AppError::not_found("Invite not found")
        })?;

    let invite = state
        .invites
        .update(
            &invite.id,
            &UpdateInviteDTO {
                active: Some(false),
                ..UpdateInviteDTO::default()
            },
        )
        .await?;

    info!("Invite revoked");
    Ok(InviteDTO::from_invite(invite, &state.app_origin))
}

/// Invito ancora apribile per il codice dato
async fn open_invite(state: &AppState, invite_code: &str) -> Result<AccountInvite, AppError> {
    // codice malformato: nessuna chiamata allo store
    if !INVITE_CODE.is_match(invite_code) {
        warn!("Malformed invite code");
        return Err(AppError::bad_request("Malformed invite code"));
    }

    let invite = state
        .invites
        .find_by_code(invite_code)
        .await?
        .ok_or_else(|| {
            warn!("Invite code not found");
            AppError::not_found("Invite not found")
        })?;

    if !invite.is_open() {
        warn!("Invite {} is no longer open", invite.id);
        return Err(AppError::conflict("Invite is no longer valid"));
    }
    Ok(invite)
}

/// Email dell'utente corrente: quella del token, altrimenti quella del profilo
async fn session_email(state: &AppState, session: &Session) -> Result<Option<String>, AppError> {
    if let Some(email) = &session.email {
        return Ok(Some(email.clone()));
    }
    let user_id = session.user_id.clone();
    Ok(state.profiles.read(&user_id).await?.map(|profile| profile.email))
}

/// Un invito indirizzato a un'email può essere usato solo da quell'utente
async fn check_recipient(
    state: &AppState,
    session: &Session,
    invite: &AccountInvite,
) -> Result<(), AppError> {
    let Some(expected) = invite.email.as_deref() else {
        return Ok(());
    };

    let matches = session_email(state, session)
        .await?
        .is_some_and(|email| email.trim().eq_ignore_ascii_case(expected.trim()));
    if !matches {
        warn!(
            "User {} is not the recipient of invite {}",
            session.user_id, invite.id
        );
        return Err(AppError::forbidden(
            "This invite was sent to a different email address",
        ));
    }
    Ok(())
}

async fn is_member(state: &AppState, account_id: &str, user_id: &str) -> Result<bool, AppError> {
    Ok(state
        .memberships
        .find_by_account_and_user(account_id, user_id)
        .await?
        .is_some())
}

#[instrument(skip(state, session, invite_code), fields(user_id = %session.user_id))]
pub async fn accept_invite(
    state: &AppState,
    session: &Session,
    invite_code: &str,
) -> Result<MyAccountDTO, AppError> {
    debug!("Accepting invite");
    let invite = open_invite(state, invite_code).await?;

    if is_member(state, &invite.account_id, &session.user_id).await? {
        warn!(
            "User {} is already a member of account {}",
            session.user_id, invite.account_id
        );
        return Err(AppError::conflict("You are already a member of this account"));
    }
    check_recipient(state, session, &invite).await?;

    // l'invito si chiude prima di creare la membership: tra due richieste
    // concorrenti solo una trova l'invito ancora aperto
    let claimed = state
        .invites
        .claim_open(
            &invite.id,
            &UpdateInviteDTO {
                active: Some(false),
                ..UpdateInviteDTO::default()
            },
        )
        .await?;
    if claimed.is_none() {
        warn!("Invite {} was closed by a concurrent request", invite.id);
        return Err(AppError::conflict("Invite is no longer valid"));
    }

    let membership = match state
        .memberships
        .create(&CreateMembershipDTO {
            account_id: invite.account_id.clone(),
            user_id: session.user_id.clone(),
            role: invite.role,
        })
        .await
    {
        Ok(membership) => membership,
        Err(e) => {
            warn!("Membership creation failed, reopening invite {}", invite.id);
            let reopen = UpdateInviteDTO {
                active: Some(true),
                ..UpdateInviteDTO::default()
            };
            if let Err(rollback) = state.invites.update(&invite.id, &reopen).await {
                error!("Failed to reopen invite {}: {}", invite.id, rollback);
            }
            return Err(e.into());
        }
    };

    // l'invito è già chiuso: un errore qui non annulla l'ingresso nell'account
    let stamp = UpdateInviteDTO {
        accepted_at: Some(Utc::now()),
        ..UpdateInviteDTO::default()
    };
    if let Err(e) = state.invites.update(&invite.id, &stamp).await {
        warn!("Failed to record acceptance time of invite {}: {}", invite.id, e);
    }

    let name = state
        .accounts
        .read(&membership.account_id)
        .await?
        .map(|account| account.name);

    info!(
        "User joined account {} as {}",
        membership.account_id, membership.role
    );
    Ok(MyAccountDTO {
        account_id: membership.account_id,
        name,
        role: membership.role,
    })
}

#[instrument(skip(state, session, invite_code), fields(user_id = %session.user_id))]
pub async fn decline_invite(
    state: &AppState,
    session: &Session,
    invite_code: &str,
) -> Result<(), AppError> {
    debug!("Declining invite");
    let invite = open_invite(state, invite_code).await?;

    // i membri gestiscono gli inviti con la revoca, non rifiutandoli
    if is_member(state, &invite.account_id, &session.user_id).await? {
        warn!(
            "Member {} attempted to decline invite {}",
            session.user_id, invite.id
        );
        return Err(AppError::forbidden(
            "Members of the account cannot decline its invites",
        ));
    }
    check_recipient(state, session, &invite).await?;

    let declined = state
        .invites
        .claim_open(
            &invite.id,
            &UpdateInviteDTO {
                active: Some(false),
                accepted_at: None,
                declined_at: Some(Utc::now()),
            },
        )
        .await?;
    if declined.is_none() {
        warn!("Invite {} was closed by a concurrent request", invite.id);
        return Err(AppError::conflict("Invite is no longer valid"));
    }

    info!("Invite {} declined", invite.id);
    Ok(())
}

// ********************* HANDLER HTTP **********************//

#[instrument(skip(state, ctx, body), fields(account_id = %ctx.account_id))]
pub async fn post_invite(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AccountContext>, // ottenuto dall'account_membership_middleware
    Json(body): Json<CreateInviteRequestDTO>,
) -> Result<Json<InviteDTO>, AppError> {
    create_invite(&state, &ctx, body).await.map(Json)
}

#[instrument(skip(state, ctx), fields(account_id = %ctx.account_id, invite_id = %invite_id))]
pub async fn post_revoke_invite(
    State(state): State<Arc<AppState>>,
    Path((_account_id, invite_id)): Path<(String, String)>,
    Extension(ctx): Extension<AccountContext>,
) -> Result<Json<InviteDTO>, AppError> {
    revoke_invite(&state, &ctx, &invite_id).await.map(Json)
}

#[instrument(skip(state, session, invite_code), fields(user_id = %session.user_id))]
pub async fn post_accept_invite(
    State(state): State<Arc<AppState>>,
    Path(invite_code): Path<String>,
    Extension(session): Extension<Session>,
) -> Result<Json<MyAccountDTO>, AppError> {
    accept_invite(&state, &session, &invite_code).await.map(Json)
}

#[instrument(skip(state, session, invite_code), fields(user_id = %session.user_id))]
pub async fn post_decline_invite(
    State(state): State<Arc<AppState>>,
    Path(invite_code): Path<String>,
    Extension(session): Extension<Session>,
) -> Result<(), AppError> {
    decline_invite(&state, &session, &invite_code).await
}
