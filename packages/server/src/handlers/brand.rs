use axum::extract::{DefaultBodyLimit, Path, State};
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use common::storage::FileStore;
use serde_json::json;
use tracing::instrument;

use crate::entity::brand;
use crate::error::AppError;
use crate::extractors::form::FormPayload;
use crate::extractors::page::PageContext;
use crate::flash::{self, Flash};
use crate::models::brand::{BrandInput, BrandResponse, ValidImage, image_relative_path};
use crate::repository::{BrandFields, BrandRepository};
use crate::routes::names::route;
use crate::state::AppState;

/// Storage namespace brand logos are written under.
const IMAGE_NAMESPACE: &str = "brands";

/// Large enough to reject oversized logos with a validation message instead of a 413.
pub fn brand_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(8 * 1024 * 1024) // 8 MB
}

#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: PageContext,
) -> Result<Response, AppError> {
    let brands: Vec<BrandResponse> = state
        .brands
        .find_all()
        .await?
        .into_iter()
        .map(|model| BrandResponse::from_model(model, &*state.file_store))
        .collect();

    page.render("Brands/BrandList", json!({ "brands": brands }))
}

#[instrument(skip(page))]
pub async fn create(page: PageContext) -> Result<Response, AppError> {
    page.render("Brands/AddBrand", json!({}))
}

#[instrument(skip(state, jar, payload))]
pub async fn store(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: FormPayload,
) -> Result<Response, AppError> {
    let input = BrandInput::from_payload(&payload)?;
    let files = &*state.file_store;

    let image_path = match &input.image {
        Some(image) => Some(store_image(files, image).await?),
        None => None,
    };

    let created = state
        .brands
        .create(BrandFields {
            name: input.name,
            image_path: image_path.clone(),
        })
        .await;

    let brand = match created {
        Ok(brand) => brand,
        Err(err) => {
            if let Some(path) = &image_path {
                discard_file(files, path).await;
            }
            return Err(err.into());
        }
    };

    tracing::info!(brand_id = brand.id, has_image = image_path.is_some(), "Brand created");
    Ok(flash::redirect(
        jar,
        &index_url(),
        Flash::success("Brand created successfully."),
    ))
}

#[instrument(skip(state, page), fields(id))]
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    page: PageContext,
) -> Result<Response, AppError> {
    let brand = find_brand(&*state.brands, parse_id(&id)?).await?;
    let brand = BrandResponse::from_model(brand, &*state.file_store);

    page.render("Brands/EditBrand", json!({ "brand": brand }))
}

/// Replace name and, when a new file is sent, the logo.
///
/// The new file is written before the record changes and the old file is only
/// removed once the record points at the new one.
#[instrument(skip(state, jar, payload), fields(id))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: CookieJar,
    payload: FormPayload,
) -> Result<Response, AppError> {
    update_brand(&state, &id, jar, &payload).await
}

/// POST to a brand URL, dispatched on the form's `_method` field.
///
/// Multipart forms cannot be sent as PUT from a browser, so they post with
/// `_method=PUT`; delete buttons post `_method=DELETE`. No `_method` means update.
#[instrument(skip(state, jar, payload), fields(id))]
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: CookieJar,
    payload: FormPayload,
) -> Result<Response, AppError> {
    let method = payload.text("_method").map(|m| m.to_ascii_uppercase());
    match method.as_deref() {
        None | Some("PUT") | Some("PATCH") => update_brand(&state, &id, jar, &payload).await,
        Some("DELETE") => destroy_brand(&state, &id, jar).await,
        Some(other) => {
            tracing::debug!(method = %other, "Unsupported form method");
            Err(AppError::Validation("The form method is not supported.".into()))
        }
    }
}

async fn update_brand(
    state: &AppState,
    id: &str,
    jar: CookieJar,
    payload: &FormPayload,
) -> Result<Response, AppError> {
    let input = BrandInput::from_payload(payload)?;
    let id = parse_id(id)?;
    let files = &*state.file_store;

    let brand = find_brand(&*state.brands, id).await?;
    let current_path = brand
        .image_path
        .as_deref()
        .map(|stored| image_relative_path(files, stored).to_string());

    let (image_path, replaced_path) = match &input.image {
        Some(image) => (Some(store_image(files, image).await?), current_path),
        None => (current_path, None),
    };

    let updated = state
        .brands
        .update(
            id,
            BrandFields {
                name: input.name,
                image_path: image_path.clone(),
            },
        )
        .await;

    if let Err(err) = updated {
        if input.image.is_some()
            && let Some(path) = &image_path
        {
            discard_file(files, path).await;
        }
        return Err(err.into());
    }

    if let Some(old) = &replaced_path {
        discard_file(files, old).await;
    }

    tracing::info!(brand_id = id, image_replaced = input.image.is_some(), "Brand updated");
    Ok(flash::redirect(
        jar,
        &index_url(),
        Flash::success("Brand updated successfully."),
    ))
}

/// Delete the record first, then its logo; a logo that cannot be removed is
/// logged and left behind.
#[instrument(skip(state, jar), fields(id))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    destroy_brand(&state, &id, jar).await
}

async fn destroy_brand(state: &AppState, id: &str, jar: CookieJar) -> Result<Response, AppError> {
    let id = parse_id(id)?;
    let brand = find_brand(&*state.brands, id).await?;

    if !state.brands.delete(id).await? {
        return Err(AppError::NotFound("Brand not found".into()));
    }

    if let Some(stored) = brand.image_path.as_deref() {
        let files = &*state.file_store;
        discard_file(files, image_relative_path(files, stored)).await;
    }

    tracing::info!(brand_id = id, "Brand deleted");
    Ok(flash::redirect(
        jar,
        &index_url(),
        Flash::success("Brand deleted successfully."),
    ))
}

/// Ids that cannot name a row are as missing as ids with no row.
fn parse_id(raw: &str) -> Result<i32, AppError> {
    raw.parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::NotFound("Brand not found".into()))
}

async fn find_brand(brands: &dyn BrandRepository, id: i32) -> Result<brand::Model, AppError> {
    brands
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Brand not found".into()))
}

async fn store_image(files: &dyn FileStore, image: &ValidImage) -> Result<String, AppError> {
    Ok(files
        .store(IMAGE_NAMESPACE, image.kind.extension(), &image.bytes)
        .await?)
}

/// Best-effort removal of a file no record points at any more.
async fn discard_file(files: &dyn FileStore, path: &str) {
    match files.delete(path).await {
        Ok(true) => tracing::debug!(%path, "Removed file"),
        Ok(false) => tracing::warn!(%path, "File to remove was already gone"),
        Err(e) => tracing::warn!(%path, error = %e, "Failed to remove file, leaving an orphan"),
    }
}

fn index_url() -> String {
    route("brands.index", &[]).unwrap_or_else(|| "/brands".into())
}
