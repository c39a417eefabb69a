//! Account services - Pagina account: dati dell'account, membri, inviti, logo

use crate::core::{AccountContext, AppError, AppState, Capability, Session, require_capability};
use crate::dtos::{
    AccountDTO, AccountPageDTO, InviteDTO, LogoUploadQuery, MemberDTO, MyAccountDTO,
    RenameAccountDTO, UpdateAccountDTO,
};
use crate::entities::{AccountMembership, Profile};
use crate::repositories::{Read, Update};
use crate::services::normalize_name;
use crate::storage::UploadOptions;
use axum::{
    Extension,
    body::Bytes,
    extract::{Json, Query, State},
    http::{HeaderMap, header},
};
use futures::future::try_join_all;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

lazy_static! {
    static ref LOGO_EXTENSION: Regex = Regex::new(r"^[A-Za-z0-9]{1,8}$").unwrap();
}

const DEFAULT_LOGO_EXTENSION: &str = "png";
const DEFAULT_LOGO_CONTENT_TYPE: &str = "image/png";

/// Path dello storage in cui vive il logo di un account
pub fn logo_path(account_id: &str, extension: &str) -> String {
    format!("accounts/{}/logo.{}", account_id, extension)
}

/// Estensione del file caricato, validata; `png` se il nome non ne ha una.
/// Sono ammessi solo formati raster: il logo viene servito dallo storage pubblico.
pub fn logo_extension(file_name: Option<&str>) -> Result<String, AppError> {
    let Some(extension) = file_name.and_then(|name| name.rsplit_once('.')).map(|(_, ext)| ext)
    else {
        return Ok(DEFAULT_LOGO_EXTENSION.to_string());
    };

    if !LOGO_EXTENSION.is_match(extension) {
        warn!("Rejected logo extension: {}", extension);
        return Err(AppError::bad_request("Invalid logo file extension"));
    }
    let extension = extension.to_lowercase();
    if content_type_for(&extension).is_none() {
        warn!("Unsupported logo format: {}", extension);
        return Err(AppError::bad_request("Unsupported logo format"));
    }
    Ok(extension)
}

fn content_type_for(extension: &str) -> Option<&'static str> {
    match extension {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Content type dichiarato dal client, solo se è uno dei formati raster ammessi
fn raster_content_type(declared: &str) -> Option<&'static str> {
    ["image/png", "image/jpeg", "image/gif", "image/webp"]
        .into_iter()
        .find(|allowed| declared.eq_ignore_ascii_case(allowed))
}

/// Risolve un path dello storage; un errore dello storage non deve impedire il caricamento della pagina
pub(crate) async fn resolve_file_url(state: &AppState, path: Option<&str>) -> Option<String> {
    let path = path?;
    match state.files.get_url(path).await {
        Ok(url) => url,
        Err(e) => {
            warn!("Failed to resolve URL for {}: {}", path, e);
            None
        }
    }
}

fn member_view(
    membership: AccountMembership,
    profile: Option<Profile>,
    ctx: &AccountContext,
) -> MemberDTO {
    let is_self = membership.user_id == ctx.user_id;
    let can_manage = ctx.capabilities.manage_members && !is_self;
    let mut member = MemberDTO::from(membership);
    if let Some(profile) = profile {
        member.email = Some(profile.email);
        member.full_name = profile.full_name;
    }
    member.is_self = is_self;
    member.can_change_role = can_manage;
    member.can_remove = can_manage;
    member
}

/// Legge tutto ciò che serve alla pagina account: account, membri e inviti attivi
#[instrument(skip(state, ctx), fields(account_id = %ctx.account_id, user_id = %ctx.user_id))]
pub async fn load_account_page(
    state: &AppState,
    ctx: &AccountContext,
) -> Result<AccountPageDTO, AppError> {
    debug!("Loading account page");

    let account = state.accounts.read(&ctx.account_id).await?.ok_or_else(|| {
        warn!("Account not found: {}", ctx.account_id);
        AppError::not_found("Account not found")
    })?;

    let memberships = state
        .memberships
        .find_many_by_account_id(&ctx.account_id)
        .await?;

    debug!("Found {} members in account", memberships.len());

    // profili letti in parallelo, l'ordine dei risultati segue quello delle membership
    let profiles = try_join_all(
        memberships
            .iter()
            .map(|m| state.profiles.read(&m.user_id)),
    )
    .await?;

    let members: Vec<MemberDTO> = memberships
        .into_iter()
        .zip(profiles)
        .map(|(membership, profile)| member_view(membership, profile, ctx))
        .collect();

    let invites: Vec<InviteDTO> = state
        .invites
        .find_active_by_account_id(&ctx.account_id)
        .await?
        .into_iter()
        .map(|invite| {
            let view = InviteDTO::from_invite(invite, &state.app_origin);
            if ctx.capabilities.manage_invites {
                view
            } else {
                view.redacted()
            }
        })
        .collect();

    let logo_url = resolve_file_url(state, account.logo_path.as_deref()).await;
    let mut account = AccountDTO::from(account);
    account.logo_url = logo_url;

    info!(
        "Account page loaded with {} members and {} active invites",
        members.len(),
        invites.len()
    );

    Ok(AccountPageDTO {
        account,
        my_role: ctx.role(),
        capabilities: ctx.capabilities,
        members,
        invites,
    })
}

/// Rinomina l'account; un nome vuoto viene rifiutato senza chiamare il record store
#[instrument(skip(state, ctx), fields(account_id = %ctx.account_id, user_id = %ctx.user_id))]
pub async fn rename_account(
    state: &AppState,
    ctx: &AccountContext,
    name: &str,
) -> Result<AccountDTO, AppError> {
    debug!("Renaming account");
    let Some(name) = normalize_name(name) else {
        warn!("Rejected empty account name");
        return Err(AppError::bad_request("Account name cannot be empty"));
    };
    RenameAccountDTO { name: name.clone() }.validate()?;

    require_capability(ctx, Capability::ManageAccount)?;

    let account = state
        .accounts
        .update(
            &ctx.account_id,
            &UpdateAccountDTO {
                name: Some(name),
                logo_path: None,
            },
        )
        .await?;

    let logo_url = resolve_file_url(state, account.logo_path.as_deref()).await;
    let mut account = AccountDTO::from(account);
    account.logo_url = logo_url;

    info!("Account renamed to '{}'", account.name);
    Ok(account)
}

/// Carica il logo sotto il path dell'account e aggiorna il record con il nuovo path
#[instrument(skip(state, ctx, bytes), fields(account_id = %ctx.account_id, size = bytes.len()))]
pub async fn upload_account_logo(
    state: &AppState,
    ctx: &AccountContext,
    file_name: Option<&str>,
    content_type: Option<&str>,
    bytes: Vec<u8>,
) -> Result<AccountDTO, AppError> {
    debug!("Uploading account logo");
    require_capability(ctx, Capability::ManageAccount)?;

    if bytes.is_empty() {
        warn!("Empty logo upload");
        return Err(AppError::bad_request("Logo file is empty"));
    }

    let extension = logo_extension(file_name)?;
    let path = logo_path(&ctx.account_id, &extension);
    let options = UploadOptions {
        content_type: content_type
            .and_then(raster_content_type)
            .or_else(|| content_type_for(&extension))
            .unwrap_or(DEFAULT_LOGO_CONTENT_TYPE)
            .to_string(),
        upsert: true,
    };

    state.files.upload(&path, bytes, &options).await?;
    debug!("Logo stored at {}", path);

    let account = state
        .accounts
        .update(
            &ctx.account_id,
            &UpdateAccountDTO {
                name: None,
                logo_path: Some(path),
            },
        )
        .await?;

    let logo_url = resolve_file_url(state, account.logo_path.as_deref()).await;
    let mut account = AccountDTO::from(account);
    account.logo_url = logo_url;

    info!("Account logo updated");
    Ok(account)
}

// ********************* HANDLER HTTP **********************//

#[instrument(skip(state, ctx), fields(account_id = %ctx.account_id))]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AccountContext>, // ottenuto dall'account_membership_middleware
) -> Result<Json<AccountPageDTO>, AppError> {
    load_account_page(&state, &ctx).await.map(Json)
}

#[instrument(skip(state, ctx, body), fields(account_id = %ctx.account_id))]
pub async fn update_account_name(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AccountContext>,
    Json(body): Json<RenameAccountDTO>,
) -> Result<Json<AccountDTO>, AppError> {
    rename_account(&state, &ctx, &body.name).await.map(Json)
}

#[instrument(skip(state, ctx, headers, body), fields(account_id = %ctx.account_id))]
pub async fn upload_logo(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LogoUploadQuery>,
    Extension(ctx): Extension<AccountContext>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<AccountDTO>, AppError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    upload_account_logo(
        &state,
        &ctx,
        params.file_name.as_deref(),
        content_type,
        body.to_vec(),
    )
    .await
    .map(Json)
}

/// Account dell'utente autenticato, per scegliere quale pagina aprire
#[instrument(skip(state, session), fields(user_id = %session.user_id))]
pub async fn list_my_accounts(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Vec<MyAccountDTO>>, AppError> {
    debug!("Listing accounts of user");
    let memberships = state
        .memberships
        .find_many_by_user_id(&session.user_id)
        .await?;

    let accounts = try_join_all(memberships.iter().map(|m| state.accounts.read(&m.account_id))).await?;

    let result: Vec<MyAccountDTO> = memberships
        .into_iter()
        .zip(accounts)
        .map(|(membership, account)| MyAccountDTO {
            account_id: membership.account_id,
            name: account.map(|a| a.name),
            role: membership.role,
        })
        .collect();

    info!("User belongs to {} accounts", result.len());
    Ok(Json(result))
}
