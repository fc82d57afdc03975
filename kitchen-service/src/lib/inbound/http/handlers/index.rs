use axum::response::Response;

use super::found;

pub async fn index() -> Response {
    found("/login")
}
