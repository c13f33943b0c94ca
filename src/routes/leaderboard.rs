use crate::database::{entities::LeaderboardEntry, DbErr};
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use log::error;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// The number of entries returned by the top query
const LEADERBOARD_SIZE: u64 = 10;

/// Router function creates a new router with all the underlying
/// routes for this file.
pub fn router() -> Router {
    Router::new().route("/leaderboard", get(get_leaderboard).put(submit_score))
}

/// Error type used in leaderboard routes to handle database
/// errors and invalid submission bodies
#[derive(Debug, Error)]
pub enum LeaderboardError {
    /// The submission body was missing, not JSON, or had
    /// fields of the wrong type
    #[error("Invalid body")]
    InvalidBody,
    /// Database error
    #[error("Server error occurred")]
    Database(#[from] DbErr),
}

/// Response structure containing the top leaderboard entries
#[derive(Serialize)]
pub struct LeaderboardResponse {
    /// The entries ordered by score descending
    result: Vec<LeaderboardEntry>,
}

/// Response structure for an accepted score submission
#[derive(Serialize)]
struct SubmitResponse {
    #[serde(rename = "statusCode")]
    status_code: u16,
    message: &'static str,
}

/// Structured error payload matching the shape of the
/// success responses
#[derive(Serialize)]
struct ErrorResponse {
    #[serde(rename = "statusCode")]
    status_code: u16,
    error: &'static str,
    message: String,
}

/// Typed form of a score submission body. Parsed from raw JSON
/// rather than deserialized directly so that every malformed
/// body maps onto the same error response
pub struct ScoreSubmission {
    name: String,
    score: f64,
}

impl ScoreSubmission {
    /// Validates that `value` is an object holding a string `name`
    /// and a numeric `score`. No range or length checks are applied
    fn parse(value: &Value) -> Option<Self> {
        let name = value.get("name")?.as_str()?.to_string();
        let score = value.get("score")?.as_f64()?;
        Some(Self { name, score })
    }
}

/// GET /leaderboard
///
/// Retrieves the top scoring entries, at most [`LEADERBOARD_SIZE`]
/// of them, ordered by score descending. Ties are resolved by
/// submission order
async fn get_leaderboard(
    Extension(db): Extension<DatabaseConnection>,
) -> Result<Json<LeaderboardResponse>, LeaderboardError> {
    let result = LeaderboardEntry::top(&db, LEADERBOARD_SIZE).await?;
    Ok(Json(LeaderboardResponse { result }))
}

/// PUT /leaderboard
///
/// Validates and stores a new leaderboard entry from a JSON body
/// of the form `{ "name": string, "score": number }`. Malformed
/// bodies are rejected without touching the database
async fn submit_score(
    Extension(db): Extension<DatabaseConnection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SubmitResponse>, LeaderboardError> {
    let Json(body) = body.map_err(|_| LeaderboardError::InvalidBody)?;

    let ScoreSubmission { name, score } =
        ScoreSubmission::parse(&body).ok_or(LeaderboardError::InvalidBody)?;

    LeaderboardEntry::create(&db, name, score).await?;

    Ok(Json(SubmitResponse {
        status_code: 200,
        message: "Your score has been posted",
    }))
}

/// IntoResponse implementation for LeaderboardError to allow it to be
/// used within the result type as a error response
impl IntoResponse for LeaderboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidBody => StatusCode::BAD_REQUEST,
            Self::Database(err) => {
                error!("Database error while handling leaderboard request: {err:?}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse {
            status_code: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown"),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod test {
    use super::router;
    use crate::database::{
        self,
        entities::{leaderboard, LeaderboardEntry},
        DatabaseConnection,
    };
    use axum::{
        body::{to_bytes, Body},
        http::{header::CONTENT_TYPE, Method, Request, StatusCode},
        Extension, Router,
    };
    use sea_orm::{EntityTrait, PaginatorTrait};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    /// Creates the leaderboard router backed by a fresh
    /// in-memory database
    async fn test_router() -> (Router, DatabaseConnection) {
        let db = database::connect_in_memory().await;
        let router = router().layer(Extension(db.clone()));
        (router, db)
    }

    /// Sends a request against the router returning the response
    /// status and parsed JSON body
    async fn send(router: &Router, method: Method, body: Option<Body>) -> (StatusCode, Value) {
        let req = Request::builder()
            .uri("/leaderboard")
            .method(method)
            .header(CONTENT_TYPE, "application/json")
            .body(body.unwrap_or_default())
            .unwrap();

        let res = router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let value: Value = serde_json::from_slice(&bytes).expect("Response body was not JSON");
        (status, value)
    }

    /// The fixed payload expected for every rejected submission
    fn invalid_body_payload() -> Value {
        json!({
            "statusCode": 400,
            "error": "Bad Request",
            "message": "Invalid body"
        })
    }

    /// An empty leaderboard should produce an empty result list
    #[tokio::test]
    async fn test_empty_leaderboard() {
        let (router, _db) = test_router().await;

        let (status, body) = send(&router, Method::GET, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "result": [] }));
    }

    /// Submitted scores should come back ordered by score
    /// descending with the fixed success payload
    #[tokio::test]
    async fn test_submit_then_query() {
        let (router, _db) = test_router().await;

        let expected = json!({
            "statusCode": 200,
            "message": "Your score has been posted"
        });

        let body = Body::from(json!({ "name": "Alice", "score": 50.0 }).to_string());
        let (status, value) = send(&router, Method::PUT, Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value, expected);

        let body = Body::from(json!({ "name": "Bob", "score": 90.0 }).to_string());
        let (status, value) = send(&router, Method::PUT, Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value, expected);

        let (status, value) = send(&router, Method::GET, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            value,
            json!({
                "result": [
                    { "name": "Bob", "score": 90.0 },
                    { "name": "Alice", "score": 50.0 }
                ]
            })
        );
    }

    /// With more entries than the leaderboard size only the
    /// highest scores are returned
    #[tokio::test]
    async fn test_truncates_to_top_ten() {
        let (router, db) = test_router().await;

        for value in 0..15 {
            LeaderboardEntry::create(&db, format!("Player{value}"), value as f64)
                .await
                .unwrap();
        }

        let (status, value) = send(&router, Method::GET, None).await;
        assert_eq!(status, StatusCode::OK);

        let result = value
            .get("result")
            .and_then(Value::as_array)
            .expect("Missing result array");
        assert_eq!(result.len(), 10);

        let scores: Vec<f64> = result
            .iter()
            .map(|entry| entry.get("score").and_then(Value::as_f64).unwrap())
            .collect();
        let expected: Vec<f64> = (5..15).rev().map(|value| value as f64).collect();
        assert_eq!(scores, expected);
    }

    /// Responses should never contain the internal identifier
    #[tokio::test]
    async fn test_identifier_not_exposed() {
        let (router, db) = test_router().await;

        LeaderboardEntry::create(&db, "Alice".to_string(), 50.0)
            .await
            .unwrap();

        let (_, value) = send(&router, Method::GET, None).await;
        let entry = &value["result"][0];
        assert_eq!(entry, &json!({ "name": "Alice", "score": 50.0 }));
    }

    /// Malformed submissions should be rejected with the fixed
    /// error payload without persisting anything
    #[tokio::test]
    async fn test_invalid_bodies_rejected() {
        let (router, db) = test_router().await;

        let bodies = [
            // Missing score
            json!({ "name": "X" }).to_string(),
            // Missing name
            json!({ "score": 10.0 }).to_string(),
            // Name of the wrong type
            json!({ "name": 5, "score": 10.0 }).to_string(),
            // Score of the wrong type
            json!({ "name": "X", "score": "10" }).to_string(),
            // Null body
            "null".to_string(),
            // Not JSON at all
            "not json".to_string(),
            // Empty body
            String::new(),
        ];

        for body in bodies {
            let (status, value) = send(&router, Method::PUT, Some(Body::from(body))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(value, invalid_body_payload());
        }

        let count = leaderboard::Entity::find().count(&db).await.unwrap();
        assert_eq!(count, 0);
    }

    /// Integer scores are accepted as numbers
    #[tokio::test]
    async fn test_integer_score_accepted() {
        let (router, db) = test_router().await;

        let body = Body::from(json!({ "name": "Alice", "score": 50 }).to_string());
        let (status, _) = send(&router, Method::PUT, Some(body)).await;
        assert_eq!(status, StatusCode::OK);

        let count = leaderboard::Entity::find().count(&db).await.unwrap();
        assert_eq!(count, 1);
    }
}
