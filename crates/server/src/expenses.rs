//! Expenses API endpoints

use api_types::expense::{ExpenseListResponse, ExpenseNew, ExpenseView, TotalSpent};
use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use engine::{Expense, ExpenseDraft};

use crate::{ServerError, fields, server::ServerState, user::AuthUser};

fn map_expense(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        user_id: expense.user_id,
        title: expense.title,
        description: expense.description,
        amount: expense.amount.to_string(),
        date: expense.date.format("%Y-%m-%d").to_string(),
        created_at: expense.created_at.to_rfc3339(),
    }
}

fn expense_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, ServerError> {
    path.map(|Path(id)| id)
        .map_err(|rejection| ServerError::Generic(rejection.body_text()))
}

pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let expenses = state
        .engine
        .list_expenses(user.id())
        .await?
        .into_iter()
        .map(map_expense)
        .collect();

    Ok(Json(ExpenseListResponse { expenses }))
}

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    payload: Result<Json<ExpenseNew>, JsonRejection>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let Json(payload) = payload.map_err(|rejection| ServerError::Generic(rejection.body_text()))?;

    let mut mistyped = Vec::new();
    let draft = ExpenseDraft {
        user_id: user.0,
        title: fields::string("title", payload.title, &mut mistyped),
        description: fields::string("description", payload.description, &mut mistyped),
        amount: fields::string("amount", payload.amount, &mut mistyped),
        date: fields::string("date", payload.date, &mut mistyped),
        mistyped,
    };
    let expense = state.engine.create_expense(draft).await?;

    Ok((StatusCode::CREATED, Json(map_expense(expense))))
}

/// Sum of the caller's expenses, as a 2-decimal string.
pub async fn total_spent(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<TotalSpent>, ServerError> {
    let total = state.engine.total_spent(user.id()).await?;
    Ok(Json(TotalSpent {
        total: total.to_string().into(),
    }))
}

pub async fn get_one(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<ExpenseView>, ServerError> {
    let id = expense_id(path)?;
    let expense = state.engine.expense(id, user.id()).await?;
    Ok(Json(map_expense(expense)))
}

pub async fn delete(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<ExpenseView>, ServerError> {
    let id = expense_id(path)?;
    let expense = state.engine.delete_expense(id, user.id()).await?;
    Ok(Json(map_expense(expense)))
}
