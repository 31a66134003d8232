use axum::Json;
use roster_core::status::{StatusOption, STATUS_OPTIONS};

/// GET /api/status-options: predefined choices for the cell editor.
pub async fn status_options() -> Json<&'static [StatusOption]> {
    Json(&STATUS_OPTIONS[..])
}
