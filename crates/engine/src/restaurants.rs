//! The module contains the `Restaurant` record. The ledger never writes it
//! after creation.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

/// A restaurant offering food that users can donate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub phone_number: Option<String>,
    pub description: Option<String>,
}

impl Restaurant {
    pub fn new(name: String, address: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            address,
            phone_number: None,
            description: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "restaurants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone_number: Option<String>,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Restaurant> for ActiveModel {
    fn from(value: &Restaurant) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            address: ActiveValue::Set(value.address.clone()),
            phone_number: ActiveValue::Set(value.phone_number.clone()),
            description: ActiveValue::Set(value.description.clone()),
        }
    }
}

impl TryFrom<Model> for Restaurant {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "restaurant")?,
            name: model.name,
            address: model.address,
            phone_number: model.phone_number,
            description: model.description,
        })
    }
}
