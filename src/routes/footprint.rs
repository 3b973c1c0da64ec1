//! Carbon footprint calculator route.

use axum::Json;

use crate::errors::{ApiResponse, AppError};
use crate::services::footprint::{self, FootprintInput, FootprintResult};

/// POST /api/v1/footprint/calculate
pub async fn calculate(
    Json(body): Json<FootprintInput>,
) -> Result<Json<ApiResponse<FootprintResult>>, AppError> {
    let result = footprint::calculate(&body)?;
    Ok(ApiResponse::success(result))
}
