//! Storage and domain rules for spendlog.
//!
//! The [`Engine`] owns the database connection and exposes every operation
//! the API needs: recording and reading expenses, summing them, and keeping
//! the per-user spending goal. Untrusted input is checked by the
//! [`validation`] drafts before anything reaches the store.

pub use error::EngineError;
pub use expenses::Expense;
pub use money::Money;
pub use ops::{Engine, EngineBuilder, GoalProgress};
pub use spent_goals::SpendingGoal;
pub use validation::{
    ExpenseDraft, FieldError, NewExpense, NewSpentGoal, SpentGoalDraft, ValidationErrors,
};

pub mod validation;

mod error;
mod expenses;
mod money;
mod ops;
mod spent_goals;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
