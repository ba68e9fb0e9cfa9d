//! Insert validators.
//!
//! Untrusted payloads arrive as drafts (every field optional) and leave as
//! typed inserts ready for the store. The storage shape lives in the entity
//! modules; nothing here is derived from it at runtime.
//!
//! A validator reports every failing field, not only the first one. Messages
//! are user facing and returned verbatim by the API.

use std::{fmt, sync::LazyLock};

use chrono::NaiveDate;
use regex::Regex;

use crate::Money;

pub const REQUIRED: &str = "Required";
pub const TITLE_TOO_SHORT: &str = "Title must be at least 3 characters";
pub const DESCRIPTION_TOO_LONG: &str = "Description is to long";
pub const AMOUNT_INVALID: &str = "Amount must be a valid monetary value";
pub const AMOUNT_TOO_LARGE: &str = "Amount exceeds the maximum storable value";
pub const DATE_INVALID: &str = "Invalid date";
pub const GOAL_NEGATIVE: &str = "Number must be greater than or equal to 0";
pub const GOAL_NOT_INTEGER: &str = "Expected integer, received float";
pub const GOAL_TOO_LARGE: &str = "Number must be less than or equal to 2147483647";

const TITLE_MIN_CHARS: usize = 3;
const DESCRIPTION_MAX_CHARS: usize = 255;

// ASCII digits only, like `\d` in a JavaScript pattern.
#[allow(clippy::expect_used)]
static MONETARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(\.[0-9]{1,2})?$").expect("valid monetary pattern"));

/// Returns `true` if `raw` has the monetary shape accepted on insert.
pub fn is_monetary(raw: &str) -> bool {
    MONETARY.is_match(raw)
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: Vec<String>,
    pub message: String,
}

impl FieldError {
    /// A value of the wrong type, e.g. `Expected string, received number`.
    pub fn wrong_type(field: &str, expected: &str, received: &str) -> Self {
        Self {
            path: vec![field.to_string()],
            message: format!("Expected {expected}, received {received}"),
        }
    }
}

/// Every field that failed validation, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub(crate) fn push(&mut self, field: &str, message: &str) {
        self.0.push(FieldError {
            path: vec![field.to_string()],
            message: message.to_string(),
        });
    }

    /// Report the type errors recorded for `field`, returning whether any were.
    fn mistyped(&mut self, mistyped: &[FieldError], field: &str) -> bool {
        let before = self.0.len();
        self.0.extend(
            mistyped
                .iter()
                .filter(|issue| issue.path.first().is_some_and(|p| p == field))
                .cloned(),
        );
        self.0.len() > before
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn issues(&self) -> &[FieldError] {
        &self.0
    }

    pub fn into_issues(self) -> Vec<FieldError> {
        self.0
    }

    /// Messages reported for a top-level field.
    pub fn messages_for(&self, field: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|issue| issue.path.first().is_some_and(|p| p == field))
            .map(|issue| issue.message.as_str())
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", issue.path.join("."), issue.message)?;
        }
        Ok(())
    }
}

/// Expense insert payload as received.
#[derive(Debug, Clone, Default)]
pub struct ExpenseDraft {
    pub user_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub amount: Option<String>,
    pub date: Option<String>,
    /// Fields received with the wrong type. Their other checks are skipped.
    pub mistyped: Vec<FieldError>,
}

/// A validated expense, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub amount: Money,
    pub date: NaiveDate,
}

impl ExpenseDraft {
    pub fn validate(self) -> Result<NewExpense, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.user_id.is_empty() {
            errors.push("userId", REQUIRED);
        }

        let title = match self.title {
            _ if errors.mistyped(&self.mistyped, "title") => None,
            None => {
                errors.push("title", REQUIRED);
                None
            }
            Some(title) if title.chars().count() < TITLE_MIN_CHARS => {
                errors.push("title", TITLE_TOO_SHORT);
                None
            }
            Some(title) => Some(title),
        };

        if !errors.mistyped(&self.mistyped, "description")
            && let Some(description) = &self.description
            && description.chars().count() > DESCRIPTION_MAX_CHARS
        {
            errors.push("description", DESCRIPTION_TOO_LONG);
        }

        let amount = match self.amount.as_deref() {
            _ if errors.mistyped(&self.mistyped, "amount") => None,
            None => {
                errors.push("amount", REQUIRED);
                None
            }
            Some(raw) if !is_monetary(raw) => {
                errors.push("amount", AMOUNT_INVALID);
                None
            }
            Some(raw) => match raw.parse::<Money>() {
                Ok(amount) if amount.is_storable() => Some(amount),
                _ => {
                    errors.push("amount", AMOUNT_TOO_LARGE);
                    None
                }
            },
        };

        let date = match self.date.as_deref() {
            _ if errors.mistyped(&self.mistyped, "date") => None,
            None => {
                errors.push("date", REQUIRED);
                None
            }
            Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.push("date", DATE_INVALID);
                    None
                }
            },
        };

        match (title, amount, date) {
            (Some(title), Some(amount), Some(date)) if errors.is_empty() => Ok(NewExpense {
                user_id: self.user_id,
                title,
                description: self.description,
                amount,
                date,
            }),
            _ => Err(errors),
        }
    }
}

/// Spending goal insert payload as received.
#[derive(Debug, Clone, Default)]
pub struct SpentGoalDraft {
    pub user_id: String,
    pub spent_goal: Option<f64>,
    /// Fields received with the wrong type. Their other checks are skipped.
    pub mistyped: Vec<FieldError>,
}

/// A validated spending goal, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSpentGoal {
    pub user_id: String,
    pub spent_goal: i32,
}

impl SpentGoalDraft {
    pub fn validate(self) -> Result<NewSpentGoal, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if self.user_id.is_empty() {
            errors.push("userId", REQUIRED);
        }

        let value = self.spent_goal.unwrap_or(0.0);
        let spent_goal = if errors.mistyped(&self.mistyped, "spentGoal") {
            None
        } else if value < 0.0 {
            errors.push("spentGoal", GOAL_NEGATIVE);
            None
        } else if value.fract() != 0.0 {
            errors.push("spentGoal", GOAL_NOT_INTEGER);
            None
        } else if value > f64::from(i32::MAX) {
            errors.push("spentGoal", GOAL_TOO_LARGE);
            None
        } else {
            Some(value as i32)
        };

        match spent_goal {
            Some(spent_goal) if errors.is_empty() => Ok(NewSpentGoal {
                user_id: self.user_id,
                spent_goal,
            }),
            _ => Err(errors),
        }
    }
}
