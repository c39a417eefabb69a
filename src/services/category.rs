//! Category services - Pagina messaggi: categorie con conteggio e rinomina

use crate::core::{AccountContext, AppError, AppState, Capability, require_capability};
use crate::dtos::{
    CategoryDTO, EMPTY_STATE_TEXT, MessagesPageDTO, RenameCategoryDTO, UpdateCategoryDTO,
};
use crate::entities::Message;
use crate::repositories::{Read, Update};
use crate::services::account::resolve_file_url;
use crate::services::normalize_name;
use axum::{
    Extension,
    extract::{Json, Path, State},
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Conteggio dei messaggi per categoria in un solo passaggio.
/// I messaggi senza categoria non vengono contati.
pub fn count_messages_by_category(messages: &[Message]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for category_id in messages.iter().filter_map(|m| m.category_id.as_ref()) {
        *counts.entry(category_id.clone()).or_insert(0) += 1;
    }
    counts
}

#[instrument(skip(state, ctx), fields(account_id = %ctx.account_id, user_id = %ctx.user_id))]
pub async fn load_messages_page(
    state: &AppState,
    ctx: &AccountContext,
) -> Result<MessagesPageDTO, AppError> {
    debug!("Loading message categories");

    let categories = state
        .categories
        .find_many_by_account_id(&ctx.account_id)
        .await?;
    let messages = state
        .messages
        .find_many_by_account_id(&ctx.account_id)
        .await?;

    debug!(
        "Found {} categories and {} messages",
        categories.len(),
        messages.len()
    );

    let counts = count_messages_by_category(&messages);

    let mut result = Vec::with_capacity(categories.len());
    for category in categories {
        let count = counts.get(&category.id).copied().unwrap_or(0);
        let thumbnail_url = resolve_file_url(state, category.thumbnail_path.as_deref()).await;
        let mut dto = CategoryDTO::new(category, count);
        dto.thumbnail_url = thumbnail_url;
        result.push(dto);
    }

    let empty_state = result.is_empty().then(|| EMPTY_STATE_TEXT.to_string());

    info!("Messages page loaded with {} categories", result.len());
    Ok(MessagesPageDTO {
        account_id: ctx.account_id.clone(),
        categories: result,
        empty_state,
    })
}

/// Rinomina una categoria; un nome vuoto viene rifiutato senza chiamare il record store
#[instrument(skip(state, ctx), fields(account_id = %ctx.account_id, category_id = %category_id))]
pub async fn rename_category(
    state: &AppState,
    ctx: &AccountContext,
    category_id: &str,
    name: &str,
) -> Result<CategoryDTO, AppError> {
    debug!("Renaming category");
    let Some(name) = normalize_name(name) else {
        warn!("Rejected empty category name");
        return Err(AppError::bad_request("Category name cannot be empty"));
    };
    RenameCategoryDTO { name: name.clone() }.validate()?;

    require_capability(ctx, Capability::EditCategories)?;

    let category_id = category_id.to_string();
    let category = state
        .categories
        .read(&category_id)
        .await?
        .filter(|c| c.account_id == ctx.account_id)
        .ok_or_else(|| {
            warn!("Category {} not found in account", category_id);
            AppError::not_found("Category not found")
        })?;

    let updated = state
        .categories
        .update(&category.id, &UpdateCategoryDTO { name: Some(name) })
        .await?;

    let count = state
        .messages
        .find_many_by_account_id(&ctx.account_id)
        .await?
        .iter()
        .filter(|m| m.category_id.as_deref() == Some(updated.id.as_str()))
        .count();
    let thumbnail_url = resolve_file_url(state, updated.thumbnail_path.as_deref()).await;
    let mut dto = CategoryDTO::new(updated, count);
    dto.thumbnail_url = thumbnail_url;

    info!("Category renamed to '{}'", dto.name);
    Ok(dto)
}

// ********************* HANDLER HTTP **********************//

#[instrument(skip(state, ctx), fields(account_id = %ctx.account_id))]
pub async fn list_message_categories(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AccountContext>, // ottenuto dall'account_membership_middleware
) -> Result<Json<MessagesPageDTO>, AppError> {
    load_messages_page(&state, &ctx).await.map(Json)
}

#[instrument(skip(state, ctx, body), fields(account_id = %ctx.account_id, category_id = %category_id))]
pub async fn update_category_name(
    State(state): State<Arc<AppState>>,
    Path((_account_id, category_id)): Path<(String, String)>,
    Extension(ctx): Extension<AccountContext>,
    Json(body): Json<RenameCategoryDTO>,
) -> Result<Json<CategoryDTO>, AppError> {
    rename_category(&state, &ctx, &category_id, &body.name)
        .await
        .map(Json)
}
