use chrono::Utc;
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{Money, ResultEngine, SpendingGoal, SpentGoalDraft, spent_goals};

use super::{Engine, with_tx};

/// Total spent compared against the active goal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GoalProgress {
    pub total: Money,
    /// Active goal in whole units, `0` when none was ever set.
    pub goal: i32,
    /// `goal - total`; negative once the goal is exceeded.
    pub remaining: Money,
    pub exceeded: bool,
}

impl GoalProgress {
    pub fn new(total: Money, goal: i32) -> Self {
        let target = Money::from_units(i64::from(goal));
        Self {
            total,
            goal,
            remaining: target - total,
            exceeded: total > target,
        }
    }
}

impl Engine {
    /// Validate and record a new spending goal for the draft's user.
    ///
    /// Previous goals are kept; the new row becomes the active one.
    pub async fn set_spent_goal(&self, draft: SpentGoalDraft) -> ResultEngine<SpendingGoal> {
        let goal = draft.validate()?;
        let user_id = goal.user_id.clone();
        let model = spent_goals::ActiveModel::insert_from(goal, Utc::now());

        with_tx!(self, |db_tx| {
            let model = model.insert(&db_tx).await?;
            tracing::debug!(user_id = %user_id, spent_goal = model.spent_goal, "spending goal set");
            Ok(SpendingGoal::from(model))
        })
    }

    /// The active (most recent) goal of `user_id`, if any.
    pub async fn spent_goal(&self, user_id: &str) -> ResultEngine<Option<SpendingGoal>> {
        with_tx!(self, |db_tx| {
            let model = spent_goals::Entity::find()
                .filter(spent_goals::Column::UserId.eq(user_id))
                .order_by_desc(spent_goals::Column::CreatedAt)
                .order_by_desc(spent_goals::Column::Id)
                .one(&db_tx)
                .await?;
            Ok(model.map(SpendingGoal::from))
        })
    }

    pub async fn goal_progress(&self, user_id: &str) -> ResultEngine<GoalProgress> {
        let total = self.total_spent(user_id).await?;
        let goal = self
            .spent_goal(user_id)
            .await?
            .map(|goal| goal.spent_goal)
            .unwrap_or(0);
        Ok(GoalProgress::new(total, goal))
    }
}
