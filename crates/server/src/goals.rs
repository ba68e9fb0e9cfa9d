//! Spending goal API endpoints

use api_types::goal::{GoalProgress, SpentGoalNew, SpentGoalView};
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::{SpendingGoal, SpentGoalDraft};

use crate::{ServerError, fields, server::ServerState, user::AuthUser};

fn map_goal(goal: SpendingGoal) -> SpentGoalView {
    SpentGoalView {
        id: goal.id,
        user_id: goal.user_id,
        spent_goal: goal.spent_goal,
        created_at: goal.created_at.to_rfc3339(),
    }
}

/// The caller's active goal.
pub async fn get(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<SpentGoalView>, ServerError> {
    let goal = state
        .engine
        .spent_goal(user.id())
        .await?
        .ok_or_else(|| engine::EngineError::KeyNotFound("spending goal".to_string()))?;
    Ok(Json(map_goal(goal)))
}

pub async fn set(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    payload: Result<Json<SpentGoalNew>, JsonRejection>,
) -> Result<(StatusCode, Json<SpentGoalView>), ServerError> {
    let Json(payload) = payload.map_err(|rejection| ServerError::Generic(rejection.body_text()))?;

    let mut mistyped = Vec::new();
    let goal = state
        .engine
        .set_spent_goal(SpentGoalDraft {
            user_id: user.0,
            spent_goal: fields::number("spentGoal", payload.spent_goal, &mut mistyped),
            mistyped,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(map_goal(goal))))
}

pub async fn progress(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<GoalProgress>, ServerError> {
    let progress = state.engine.goal_progress(user.id()).await?;
    Ok(Json(GoalProgress {
        total: progress.total.to_string(),
        goal: progress.goal,
        remaining: progress.remaining.to_string(),
        exceeded: progress.exceeded,
    }))
}
