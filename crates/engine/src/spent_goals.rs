//! Spending goals.
//!
//! A user may have several rows; the most recent one is the active goal.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::validation::NewSpentGoal;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpendingGoal {
    pub id: i32,
    pub user_id: String,
    /// Target in whole currency units.
    pub spent_goal: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Model> for SpendingGoal {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            spent_goal: model.spent_goal,
            created_at: model.created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "spentGoal")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: String,
    pub spent_goal: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub(crate) fn insert_from(goal: NewSpentGoal, created_at: DateTime<Utc>) -> Self {
        Self {
            id: ActiveValue::NotSet,
            user_id: ActiveValue::Set(goal.user_id),
            spent_goal: ActiveValue::Set(goal.spent_goal),
            created_at: ActiveValue::Set(created_at),
        }
    }
}
