use axum::response::{Html, Json};
use utoipa::OpenApi;

use crate::models::{Client, ErrorDetail, ErrorResponse};

/// OpenAPI document for the client endpoints
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Client Service API",
        version = "1.0.0",
        description = "API for managing clients"
    ),
    paths(super::api::create_client),
    components(schemas(Client, ErrorResponse, ErrorDetail)),
    tags(
        (name = "clients", description = "Client registration")
    )
)]
pub struct ApiDoc;

const SWAGGER_UI_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Client Service API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({
        url: '/api-docs/openapi.json',
        dom_id: '#swagger-ui',
      });
    };
  </script>
</body>
</html>
"#;

/// Interactive documentation page
pub async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI_PAGE)
}

/// Raw OpenAPI JSON consumed by the documentation page
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
