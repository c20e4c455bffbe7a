//! Greeting endpoint

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HelloResponse {
    #[schema(example = "Hello world!")]
    pub msg: String,
}

/// Fixed greeting
#[utoipa::path(
    get,
    path = "/",
    tag = "hello",
    responses((status = 200, description = "Greeting", body = HelloResponse))
)]
pub async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        msg: "Hello world!".to_string(),
    })
}
