//! The module contains the `Expense` struct and its storage shape.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{Money, validation::NewExpense};

/// A single recorded expense, owned by exactly one user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expense {
    pub id: i32,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub amount: Money,
    /// Day the expense occurred.
    pub date: NaiveDate,
    /// Insertion time.
    pub created_at: DateTime<Utc>,
}

impl From<Model> for Expense {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            title: model.title,
            description: model.description,
            amount: Money::new(model.amount_minor),
            date: model.date,
            created_at: model.created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    /// `NUMERIC(12, 2)` as hundredths.
    pub amount_minor: i64,
    pub date: Date,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn insert_from(expense: NewExpense, created_at: DateTime<Utc>) -> Self {
        Self {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(expense.user_id),
            title: ActiveValue::Set(expense.title),
            description: ActiveValue::Set(expense.description),
            amount_minor: ActiveValue::Set(expense.amount.minor()),
            date: ActiveValue::Set(expense.date),
            created_at: ActiveValue::Set(created_at),
        }
    }
}
