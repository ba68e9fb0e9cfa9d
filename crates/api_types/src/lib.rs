use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A monetary figure as it travels over the wire.
///
/// The server always sends amounts as 2-decimal strings (`"42.50"`), but the
/// client renders whatever it receives, so a bare JSON number is accepted too.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<String> for Amount {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

pub mod error {
    use super::*;

    /// A single rejected field.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ValidationIssue {
        /// Field path, outermost key first (e.g. `["title"]`).
        pub path: Vec<String>,
        pub message: String,
    }

    /// Body of every non-2xx response.
    ///
    /// `issues` is only present when the request failed validation.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorResponse {
        pub error: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        pub issues: Vec<ValidationIssue>,
    }
}

pub mod expense {
    use super::*;

    /// Insert payload for `POST /expenses`.
    ///
    /// Fields are untyped JSON so that missing or mistyped fields are
    /// reported as validation issues rather than as a decoding failure. The
    /// owner is taken from the authenticated user, never from the body.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseNew {
        /// String.
        pub title: Option<Value>,
        /// String.
        pub description: Option<Value>,
        /// Decimal string with at most 2 fractional digits (`"12.50"`).
        pub amount: Option<Value>,
        /// Calendar date string, `YYYY-MM-DD`.
        pub date: Option<Value>,
    }

    /// An expense row as read back from storage.
    ///
    /// `date` and `created_at` are plain text, the way the store serializes
    /// them.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseView {
        pub id: i32,
        pub user_id: String,
        pub title: String,
        pub description: Option<String>,
        pub amount: String,
        pub date: String,
        pub created_at: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub expenses: Vec<ExpenseView>,
    }

    /// Response of `GET /expenses/total-spent`.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct TotalSpent {
        pub total: Amount,
    }
}

pub mod goal {
    use super::*;

    /// Insert payload for `POST /goal`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SpentGoalNew {
        /// Number, defaults to 0 when absent.
        pub spent_goal: Option<Value>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SpentGoalView {
        pub id: i32,
        pub user_id: String,
        pub spent_goal: i32,
        pub created_at: String,
    }

    /// Total spent compared against the active goal.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct GoalProgress {
        pub total: String,
        pub goal: i32,
        /// `goal - total`; negative once the goal is exceeded.
        pub remaining: String,
        pub exceeded: bool,
    }
}

#[cfg(test)]
mod tests {
    use super::{expense::TotalSpent, *};

    #[test]
    fn total_accepts_string_and_number() {
        let text: TotalSpent = serde_json::from_str(r#"{"total":"42.50"}"#).unwrap();
        assert_eq!(text.total.to_string(), "42.50");

        let number: TotalSpent = serde_json::from_str(r#"{"total":42.5}"#).unwrap();
        assert_eq!(number.total.to_string(), "42.5");
    }

    #[test]
    fn expense_view_uses_camel_case() {
        let view = expense::ExpenseView {
            id: 1,
            user_id: "alice".to_string(),
            title: "Coffee".to_string(),
            description: None,
            amount: "3.20".to_string(),
            date: "2024-05-01".to_string(),
            created_at: "2024-05-01T08:00:00+00:00".to_string(),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["userId"], "alice");
        assert_eq!(json["createdAt"], "2024-05-01T08:00:00+00:00");
    }

    #[test]
    fn error_response_omits_empty_issues() {
        let body = error::ErrorResponse {
            error: "not found".to_string(),
            issues: Vec::new(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"error":"not found"}"#);
    }

    #[test]
    fn insert_payloads_decode_any_field_type() {
        let expense: expense::ExpenseNew =
            serde_json::from_str(r#"{"title":7,"amount":12.5,"description":null}"#).unwrap();
        assert_eq!(expense.title, Some(Value::from(7)));
        assert_eq!(expense.amount, Some(Value::from(12.5)));
        assert_eq!(expense.description, None);
        assert_eq!(expense.date, None);

        let goal: goal::SpentGoalNew = serde_json::from_str(r#"{"spentGoal":"100"}"#).unwrap();
        assert_eq!(goal.spent_goal, Some(Value::from("100")));
    }
}
