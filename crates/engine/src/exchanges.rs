//! Reward exchange log entries.
//!
//! An [`Exchange`] records one redemption. `points_used` is copied from the
//! reward's price at redemption time, so later price changes do not rewrite
//! history.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    pub id: Uuid,
    pub user_id: Uuid,
    pub reward_id: Uuid,
    pub points_used: i64,
    pub redeemed_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exchanges")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub reward_id: String,
    pub points_used: i64,
    pub redeemed_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Exchange> for ActiveModel {
    fn from(value: &Exchange) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::Set(value.user_id.to_string()),
            reward_id: ActiveValue::Set(value.reward_id.to_string()),
            points_used: ActiveValue::Set(value.points_used),
            redeemed_at: ActiveValue::Set(value.redeemed_at),
        }
    }
}

impl TryFrom<Model> for Exchange {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "exchange")?,
            user_id: parse_uuid(&model.user_id, "user")?,
            reward_id: parse_uuid(&model.reward_id, "reward")?,
            points_used: model.points_used,
            redeemed_at: model.redeemed_at,
        })
    }
}
