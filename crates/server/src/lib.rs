use api_types::error::{ErrorResponse, ValidationIssue};
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use server::{router, run_with_listener};

mod expenses;
mod goals;
mod fields;
mod server;
mod user;

pub mod types {
    pub mod expense {
        pub use api_types::expense::{ExpenseListResponse, ExpenseNew, ExpenseView, TotalSpent};
    }

    pub mod goal {
        pub use api_types::goal::{GoalProgress, SpentGoalNew, SpentGoalView};
    }

    pub mod error {
        pub use api_types::error::{ErrorResponse, ValidationIssue};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) => StatusCode::BAD_REQUEST,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::InvalidAmount(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn body_for_engine_error(err: EngineError) -> ErrorResponse {
    match err {
        EngineError::Validation(errors) => ErrorResponse {
            error: "validation failed".to_string(),
            issues: errors
                .into_issues()
                .into_iter()
                .map(|issue| ValidationIssue {
                    path: issue.path,
                    message: issue.message,
                })
                .collect(),
        },
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            ErrorResponse {
                error: "internal server error".to_string(),
                issues: Vec::new(),
            }
        }
        other => ErrorResponse {
            error: other.to_string(),
            issues: Vec::new(),
        },
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), body_for_engine_error(err)),
            ServerError::Generic(error) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error,
                    issues: Vec::new(),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::ExpenseDraft;

    #[test]
    fn engine_validation_maps_to_400() {
        let errors = ExpenseDraft::default().validate().unwrap_err();
        let res = ServerError::from(EngineError::Validation(errors)).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_database_maps_to_500() {
        let err = EngineError::Database(sea_orm::DbErr::Custom("boom".to_string()));
        let res = ServerError::from(err).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn database_detail_is_not_exposed() {
        let err = EngineError::Database(sea_orm::DbErr::Custom("secret detail".to_string()));
        let body = body_for_engine_error(err);
        assert_eq!(body.error, "internal server error");
    }

    #[test]
    fn validation_issues_keep_field_paths() {
        let errors = ExpenseDraft {
            user_id: "alice".to_string(),
            title: Some("ab".to_string()),
            amount: Some("1".to_string()),
            date: Some("2024-05-01".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        let body = body_for_engine_error(EngineError::Validation(errors));
        assert_eq!(
            body.issues,
            vec![ValidationIssue {
                path: vec!["title".to_string()],
                message: "Title must be at least 3 characters".to_string(),
            }]
        );
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
