//! Request extractors whose rejections render as problem JSON
//!
//! Handlers take [`JsonBody`], [`QueryParams`] and [`PathParam`] instead of
//! the bare axum extractors, so a body or query string that fails to
//! deserialize answers 400 with field-keyed `errors` rather than axum's
//! plain-text 422.
//!
//! ```rust,ignore
//! async fn create(WithRejection(Json(req), _): JsonBody<RecipeRequest>) { .. }
//! ```

use axum::Json;
use axum::extract::Path;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum_extra::extract::QueryRejection;

pub use axum_extra::extract::{Query, WithRejection};

use crate::error::app_error::AppError;
use crate::error::fields::{FieldErrors, NON_FIELD_ERRORS};
use crate::error::kind::ErrorKind;

/// JSON request body
pub type JsonBody<T> = WithRejection<Json<T>, AppError>;

/// Query string, repeated keys allowed
pub type QueryParams<T> = WithRejection<Query<T>, AppError>;

/// Path segment
pub type PathParam<T> = WithRejection<Path<T>, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(e) => {
                AppError::new(ErrorKind::UnsupportedMediaType, e.body_text())
                    .with_action("Send the body with Content-Type: application/json")
            }
            JsonRejection::JsonDataError(e) => field_errors(&e.body_text()).into(),
            JsonRejection::JsonSyntaxError(e) => {
                AppError::bad_request(format!("JSON parse error: {}", detail(&e.body_text())))
            }
            other => AppError::bad_request(other.body_text()),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        field_errors(&rejection.body_text()).into()
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(rejection = %rejection.body_text(), "Unmatched path parameter");
        AppError::not_found("Not found.")
    }
}

/// Message without the rejection label and serde's position suffix
fn detail(body_text: &str) -> &str {
    let message = body_text
        .split_once(": ")
        .map_or(body_text, |(_, rest)| rest);
    message
        .rsplit_once(" at line ")
        .map_or(message, |(head, _)| head)
}

/// Key a deserializer failure on the top-level field it names
///
/// `ingredients[0].amount: invalid type` lands under `ingredients`. Failures
/// without a field path land under [`NON_FIELD_ERRORS`].
fn field_errors(body_text: &str) -> FieldErrors {
    let detail = detail(body_text);
    match detail.split_once(": ") {
        Some((path, message)) if is_field_path(path) => {
            let field = path.split(['.', '[']).next().unwrap_or(path);
            FieldErrors::new().with(field, message)
        }
        _ => FieldErrors::new().with(NON_FIELD_ERRORS, detail),
    }
}

fn is_field_path(path: &str) -> bool {
    !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::extract::{FromRequest, FromRequestParts};
    use axum::http::{Request, header};
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct RecipeBody {
        cooking_time: Option<i64>,
        tags: Option<Vec<i64>>,
    }

    #[derive(Debug, Deserialize)]
    struct ListParams {
        author: Option<i64>,
    }

    fn json_request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/recipes")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_rejection(request: Request<Body>) -> AppError {
        JsonBody::<RecipeBody>::from_request(request, &())
            .await
            .unwrap_err()
    }

    #[tokio::test]
    async fn test_well_typed_body_passes() {
        let WithRejection(Json(body), _) =
            JsonBody::<RecipeBody>::from_request(json_request(r#"{"cooking_time": 10}"#), &())
                .await
                .unwrap();
        assert_eq!(body.cooking_time, Some(10));
        assert!(body.tags.is_none());
    }

    #[tokio::test]
    async fn test_wrong_type_keyed_on_field() {
        let err = json_rejection(json_request(r#"{"cooking_time": "ten"}"#)).await;

        assert_eq!(err.status_code(), 400);
        let messages = err.field_errors().get("cooking_time").unwrap();
        assert!(messages[0].contains("invalid type"));
        assert!(!messages[0].contains("at line"));
    }

    #[tokio::test]
    async fn test_nested_path_keyed_on_top_level_field() {
        let err = json_rejection(json_request(r#"{"tags": [1, "x"]}"#)).await;
        assert_eq!(err.status_code(), 400);
        assert!(err.field_errors().get("tags").is_some());
    }

    #[tokio::test]
    async fn test_syntax_error_is_bad_request() {
        let err = json_rejection(json_request(r#"{"cooking_time": "#)).await;
        assert_eq!(err.status_code(), 400);
        assert!(err.message().starts_with("JSON parse error"));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_unsupported() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/recipes")
            .body(Body::from(r#"{"cooking_time": 10}"#))
            .unwrap();
        let err = json_rejection(request).await;
        assert_eq!(err.kind(), ErrorKind::UnsupportedMediaType);
    }

    #[tokio::test]
    async fn test_bad_query_value_keyed_on_param() {
        let (mut parts, _) = Request::builder()
            .uri("/api/recipes?author=abc")
            .body(())
            .unwrap()
            .into_parts();

        let err = QueryParams::<ListParams>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.field_errors().get("author").is_some());
    }

    #[tokio::test]
    async fn test_good_query_passes() {
        let (mut parts, _) = Request::builder()
            .uri("/api/recipes?author=7")
            .body(())
            .unwrap()
            .into_parts();

        let WithRejection(Query(params), _) =
            QueryParams::<ListParams>::from_request_parts(&mut parts, &())
                .await
                .unwrap();
        assert_eq!(params.author, Some(7));
    }

    #[test]
    fn test_unkeyed_failure_lands_in_non_field_errors() {
        let errors = field_errors(
            "Failed to deserialize the JSON body into the target type: \
             invalid type: sequence, expected struct RecipeBody at line 1 column 0",
        );
        assert_eq!(
            errors.get(NON_FIELD_ERRORS),
            Some(&["invalid type: sequence, expected struct RecipeBody".to_string()][..])
        );
    }
}
