//! Initial schema.
//!
//! - `users`: accounts with their balance and loyalty points
//! - `restaurants`: partner restaurants
//! - `foods`: food sold by a restaurant, with stock
//! - `donations`: append-only log of food donations
//! - `rewards`: catalog of rewards redeemable with points
//! - `exchanges`: append-only log of reward redemptions

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    FullName,
    PhoneNumber,
    Address,
    Balance,
    TotalPoints,
    Active,
}

#[derive(Iden)]
enum Restaurants {
    Table,
    Id,
    Name,
    Address,
    PhoneNumber,
    Description,
}

#[derive(Iden)]
enum Foods {
    Table,
    Id,
    RestaurantId,
    Name,
    Description,
    Price,
    PointValue,
    Stock,
}

#[derive(Iden)]
enum Donations {
    Table,
    Id,
    UserId,
    FoodId,
    RestaurantId,
    FoodName,
    Quantity,
    Note,
    PointsEarned,
    CreatedAt,
}

#[derive(Iden)]
enum Rewards {
    Table,
    Id,
    Name,
    Description,
    PointsRequired,
    Stock,
    CreatedAt,
}

#[derive(Iden)]
enum Exchanges {
    Table,
    Id,
    UserId,
    RewardId,
    PointsUsed,
    RedeemedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::FullName).string().not_null())
                    .col(ColumnDef::new(Users::PhoneNumber).string())
                    .col(ColumnDef::new(Users::Address).string())
                    .col(
                        ColumnDef::new(Users::Balance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Users::TotalPoints)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Users::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        // Not unique: a deactivated account keeps its e-mail.
        manager
            .create_index(
                Index::create()
                    .name("idx-users-email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Restaurants
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Restaurants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Restaurants::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Restaurants::Name).string().not_null())
                    .col(ColumnDef::new(Restaurants::Address).string().not_null())
                    .col(ColumnDef::new(Restaurants::PhoneNumber).string())
                    .col(ColumnDef::new(Restaurants::Description).string())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Foods
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Foods::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Foods::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Foods::RestaurantId).string().not_null())
                    .col(ColumnDef::new(Foods::Name).string().not_null())
                    .col(ColumnDef::new(Foods::Description).string())
                    .col(ColumnDef::new(Foods::Price).big_integer().not_null())
                    .col(ColumnDef::new(Foods::PointValue).big_integer().not_null())
                    .col(
                        ColumnDef::new(Foods::Stock)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-foods-restaurant_id")
                            .from(Foods::Table, Foods::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-foods-restaurant_id")
                    .table(Foods::Table)
                    .col(Foods::RestaurantId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Donations
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Donations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Donations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Donations::UserId).string().not_null())
                    .col(ColumnDef::new(Donations::FoodId).string().not_null())
                    // Recorded as given by the caller, no foreign key.
                    .col(ColumnDef::new(Donations::RestaurantId).string().not_null())
                    .col(ColumnDef::new(Donations::FoodName).string().not_null())
                    .col(ColumnDef::new(Donations::Quantity).big_integer().not_null())
                    .col(ColumnDef::new(Donations::Note).string())
                    .col(
                        ColumnDef::new(Donations::PointsEarned)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Donations::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-donations-user_id")
                            .from(Donations::Table, Donations::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-donations-food_id")
                            .from(Donations::Table, Donations::FoodId)
                            .to(Foods::Table, Foods::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-donations-user_id")
                    .table(Donations::Table)
                    .col(Donations::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Rewards
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Rewards::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Rewards::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Rewards::Name).string().not_null())
                    .col(ColumnDef::new(Rewards::Description).string())
                    .col(
                        ColumnDef::new(Rewards::PointsRequired)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rewards::Stock)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Rewards::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. Exchanges
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Exchanges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Exchanges::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Exchanges::UserId).string().not_null())
                    .col(ColumnDef::new(Exchanges::RewardId).string().not_null())
                    .col(ColumnDef::new(Exchanges::PointsUsed).big_integer().not_null())
                    .col(ColumnDef::new(Exchanges::RedeemedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-exchanges-user_id")
                            .from(Exchanges::Table, Exchanges::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-exchanges-reward_id")
                            .from(Exchanges::Table, Exchanges::RewardId)
                            .to(Rewards::Table, Rewards::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-exchanges-user_id")
                    .table(Exchanges::Table)
                    .col(Exchanges::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse creation order, children first.
        manager
            .drop_table(Table::drop().table(Exchanges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rewards::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Donations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Foods::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Restaurants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
