//! State → crop lookup

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::application::CropMapService;
use crate::infrastructure::database::repositories::StateCropRepository;
use crate::interfaces::http::common::{ApiError, MessageResponse};

#[derive(Clone)]
pub struct CropMapHandlerState {
    pub crop_map_service: Arc<CropMapService<StateCropRepository>>,
}

#[utoipa::path(
    get,
    path = "/map/crops/{state}",
    tag = "Crop Map",
    params(("state" = String, Path, description = "State name, any case")),
    responses(
        (
            status = 200,
            description = "Crops grown in the state; empty when unknown",
            body = Vec<String>
        ),
        (status = 500, description = "Failed to fetch crops", body = MessageResponse)
    )
)]
pub async fn get_crops_by_state(
    State(state): State<CropMapHandlerState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let crops = state
        .crop_map_service
        .crops_for_state(&name)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to fetch crops"))?;

    Ok(Json(crops))
}
