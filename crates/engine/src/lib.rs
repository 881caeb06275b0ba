//! Ledger engine for the food donation service.
//!
//! Users hold a balance and loyalty points. Donating food spends balance,
//! takes units out of a restaurant's stock and earns points; redeeming a
//! reward spends points and takes one unit of the reward. Every write runs in
//! a single unit of work: either all of its records become visible together,
//! or none does.
//!
//! ```no_run
//! # async fn run(db: sea_orm::DatabaseConnection) -> Result<(), engine::EngineError> {
//! let engine = engine::Engine::builder().database(db).build().await?;
//! for reward in engine.active_rewards() {
//!     println!("{} ({} points)", reward.name, reward.points_required);
//! }
//! # Ok(())
//! # }
//! ```

pub use commands::{DonationCmd, NewFood, NewRestaurant, NewReward, ProfileUpdate};
pub use donations::Donation;
pub use error::EngineError;
pub use exchanges::Exchange;
pub use foods::Food;
pub use ops::{Engine, EngineBuilder};
pub use restaurants::Restaurant;
pub use rewards::Reward;
pub use session::SessionProvider;
pub use store::EntityKind;
pub use users::User;

mod commands;
mod coordinator;
mod donations;
mod error;
mod exchanges;
mod foods;
mod ops;
mod query;
mod restaurants;
mod rewards;
mod session;
mod store;
mod users;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
