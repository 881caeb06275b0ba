//! Donation log entries.
//!
//! A [`Donation`] is written once, by the donation operation, and never
//! updated afterwards. `points_earned` is fixed at creation from the donated
//! food's point value.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError,
    util::{ensure_non_negative, parse_uuid},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_id: Uuid,
    pub restaurant_id: Uuid,
    /// Name of the food at donation time.
    pub food_name: String,
    pub quantity: i64,
    pub note: Option<String>,
    pub points_earned: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub food_id: String,
    pub restaurant_id: String,
    pub food_name: String,
    pub quantity: i64,
    pub note: Option<String>,
    pub points_earned: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Donation> for ActiveModel {
    fn from(value: &Donation) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::Set(value.user_id.to_string()),
            food_id: ActiveValue::Set(value.food_id.to_string()),
            restaurant_id: ActiveValue::Set(value.restaurant_id.to_string()),
            food_name: ActiveValue::Set(value.food_name.clone()),
            quantity: ActiveValue::Set(value.quantity),
            note: ActiveValue::Set(value.note.clone()),
            points_earned: ActiveValue::Set(value.points_earned),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Donation {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "donation")?,
            user_id: parse_uuid(&model.user_id, "user")?,
            food_id: parse_uuid(&model.food_id, "food")?,
            restaurant_id: parse_uuid(&model.restaurant_id, "restaurant")?,
            food_name: model.food_name,
            quantity: model.quantity,
            note: model.note,
            points_earned: ensure_non_negative(model.points_earned, "donation points")?,
            created_at: model.created_at,
        })
    }
}
