use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
};

use foodgram_auth_types::identity::Viewer;

use crate::error::ApiError;
use crate::handlers::require_user;
use crate::state::AppState;
use crate::usecase::shopping_list::GetShoppingListUseCase;

pub const REPORT_FILENAME: &str = "shopping_list.txt";

// ── GET /recipes/download_shopping_cart ──────────────────────────────────────

pub async fn download_shopping_cart(
    viewer: Viewer,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let identity = require_user(viewer)?;
    let usecase = GetShoppingListUseCase {
        repo: state.shopping_list_repo(),
    };
    let report = usecase.report(identity.user_id).await?;
    Ok((
        [
            (CONTENT_TYPE, "text/plain; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{REPORT_FILENAME}\""),
            ),
        ],
        report,
    ))
}
