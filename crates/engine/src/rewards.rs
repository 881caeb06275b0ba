//! The module contains the `Reward` record: an item users buy with loyalty
//! points.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    util::{ensure_non_negative, parse_uuid},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub points_required: i64,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
}

impl Reward {
    pub fn new(
        name: String,
        points_required: i64,
        stock: i64,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description: None,
            points_required: ensure_non_negative(points_required, "reward points")?,
            stock: ensure_non_negative(stock, "reward stock")?,
            created_at,
        })
    }

    pub fn is_available(&self) -> bool {
        self.stock > 0
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rewards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub points_required: i64,
    pub stock: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Reward> for ActiveModel {
    fn from(value: &Reward) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            description: ActiveValue::Set(value.description.clone()),
            points_required: ActiveValue::Set(value.points_required),
            stock: ActiveValue::Set(value.stock),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Reward {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "reward")?,
            name: model.name,
            description: model.description,
            points_required: ensure_non_negative(model.points_required, "reward points")?,
            stock: ensure_non_negative(model.stock, "reward stock")?,
            created_at: model.created_at,
        })
    }
}
