//! OpenAPI documentation configuration

use utoipa::OpenApi;

use crate::api::{health, hello};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Docstore API",
        version = "0.1.0",
        description = "Greeting endpoint and MongoDB readiness probe",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(hello::hello, health::readiness_check),
    components(schemas(hello::HelloResponse)),
    tags(
        (name = "hello", description = "Greeting"),
        (name = "health", description = "Liveness and readiness")
    )
)]
pub struct ApiDoc;
