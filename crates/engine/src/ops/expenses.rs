use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, Statement, TransactionTrait, prelude::*};

use crate::{EngineError, Expense, ExpenseDraft, Money, ResultEngine, expenses};

use super::{Engine, with_tx};

impl Engine {
    /// Validate and store a new expense.
    ///
    /// Nothing is written when the draft is rejected.
    pub async fn create_expense(&self, draft: ExpenseDraft) -> ResultEngine<Expense> {
        let expense = draft.validate()?;
        let user_id = expense.user_id.clone();
        let model = expenses::ActiveModel::insert_from(expense, Utc::now());

        with_tx!(self, |db_tx| {
            let model = model.insert(&db_tx).await?;
            tracing::debug!(user_id = %user_id, expense_id = model.id, "expense created");
            Ok(Expense::from(model))
        })
    }

    /// Every expense of `user_id`, newest first.
    pub async fn list_expenses(&self, user_id: &str) -> ResultEngine<Vec<Expense>> {
        with_tx!(self, |db_tx| {
            let models = expenses::Entity::find()
                .filter(expenses::Column::UserId.eq(user_id))
                .order_by_desc(expenses::Column::Date)
                .order_by_desc(expenses::Column::Id)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Expense::from).collect())
        })
    }

    /// A single expense of `user_id`.
    ///
    /// Expenses owned by someone else are reported as missing.
    pub async fn expense(&self, id: i32, user_id: &str) -> ResultEngine<Expense> {
        with_tx!(self, |db_tx| {
            let model = expenses::Entity::find_by_id(id)
                .filter(expenses::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("expense {id}")))?;
            Ok(Expense::from(model))
        })
    }

    /// Delete an expense of `user_id`, returning the removed row.
    pub async fn delete_expense(&self, id: i32, user_id: &str) -> ResultEngine<Expense> {
        with_tx!(self, |db_tx| {
            let model = expenses::Entity::find_by_id(id)
                .filter(expenses::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("expense {id}")))?;
            expenses::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            tracing::debug!(user_id = %user_id, expense_id = id, "expense deleted");
            Ok(Expense::from(model))
        })
    }

    /// Sum of every expense amount owned by `user_id`.
    pub async fn total_spent(&self, user_id: &str) -> ResultEngine<Money> {
        with_tx!(self, |db_tx| {
            let backend = self.database.get_database_backend();
            let stmt = Statement::from_sql_and_values(
                backend,
                "SELECT COALESCE(SUM(amount_minor), 0) AS sum FROM expenses WHERE user_id = ?;",
                vec![user_id.into()],
            );
            let row = db_tx.query_one(stmt).await?;
            let sum: i64 = match row {
                Some(row) => row.try_get("", "sum")?,
                None => 0,
            };
            Ok(Money::new(sum))
        })
    }
}
