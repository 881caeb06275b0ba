use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{DonationCmd, Engine, EngineError, NewFood, NewRestaurant, NewReward};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use serde::Serialize;
use uuid::Uuid;

mod prompt;
mod settings;

pub(crate) type CliResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[command(name = "donasi_admin")]
#[command(about = "Admin utilities for the donation ledger")]
struct Cli {
    /// Settings file (TOML), without extension.
    #[arg(long)]
    config: Option<String>,
    /// SQLite file to use instead of the configured database.
    #[arg(long, env = "DONASI_DATABASE")]
    database: Option<String>,
    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage restaurants.
    Restaurant(Restaurant),
    /// Manage the foods sold by restaurants.
    Food(Food),
    /// Manage the reward catalog.
    Reward(Reward),
    /// Manage user accounts.
    User(User),
    /// Donate food on behalf of a user.
    Donate(DonateArgs),
    /// Redeem a reward on behalf of a user.
    Redeem(RedeemArgs),
    /// Show a user's donations and redemptions.
    History(HistoryArgs),
}

#[derive(Args, Debug)]
struct Restaurant {
    #[command(subcommand)]
    command: RestaurantCommand,
}

#[derive(Subcommand, Debug)]
enum RestaurantCommand {
    Add(RestaurantAddArgs),
    List,
}

#[derive(Args, Debug)]
struct RestaurantAddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    address: String,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args, Debug)]
struct Food {
    #[command(subcommand)]
    command: FoodCommand,
}

#[derive(Subcommand, Debug)]
enum FoodCommand {
    Add(FoodAddArgs),
    List {
        #[arg(long)]
        restaurant: Uuid,
    },
}

#[derive(Args, Debug)]
struct FoodAddArgs {
    #[arg(long)]
    restaurant: Uuid,
    #[arg(long)]
    name: String,
    #[arg(long)]
    price: i64,
    #[arg(long)]
    points: i64,
    #[arg(long, default_value_t = 0)]
    stock: i64,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args, Debug)]
struct Reward {
    #[command(subcommand)]
    command: RewardCommand,
}

#[derive(Subcommand, Debug)]
enum RewardCommand {
    Add(RewardAddArgs),
    /// Set the units available.
    Restock {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        stock: i64,
    },
    /// Rewards that still have stock.
    List,
}

#[derive(Args, Debug)]
struct RewardAddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    points: i64,
    #[arg(long, default_value_t = 0)]
    stock: i64,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Register(UserRegisterArgs),
    TopUp {
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        amount: i64,
    },
    Show {
        #[arg(long, conflicts_with = "email", required_unless_present = "email")]
        id: Option<Uuid>,
        #[arg(long)]
        email: Option<String>,
    },
}

#[derive(Args, Debug)]
struct UserRegisterArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    name: String,
    /// Read the password from the environment instead of prompting.
    #[arg(long, env = "DONASI_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Args, Debug)]
struct DonateArgs {
    #[arg(long)]
    user: Uuid,
    #[arg(long)]
    food: Uuid,
    #[arg(long)]
    restaurant: Uuid,
    #[arg(long)]
    quantity: i64,
    #[arg(long)]
    note: Option<String>,
}

#[derive(Args, Debug)]
struct RedeemArgs {
    #[arg(long)]
    user: Uuid,
    #[arg(long)]
    reward: Uuid,
}

#[derive(Args, Debug)]
struct HistoryArgs {
    #[arg(long)]
    user: Uuid,
}

#[derive(Serialize)]
struct History {
    donations: Vec<engine::Donation>,
    exchanges: Vec<engine::Exchange>,
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn connect_db(url: &str) -> CliResult<DatabaseConnection> {
    let db = Database::connect(url).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

async fn run(engine: &Engine, command: Command) -> CliResult<()> {
    match command {
        Command::Restaurant(Restaurant { command }) => match command {
            RestaurantCommand::Add(args) => {
                let mut cmd = NewRestaurant::new(args.name, args.address);
                if let Some(phone) = args.phone {
                    cmd = cmd.phone_number(phone);
                }
                if let Some(description) = args.description {
                    cmd = cmd.description(description);
                }
                print_json(&engine.create_restaurant(cmd).await?)
            }
            RestaurantCommand::List => print_json(&engine.restaurants()),
        },
        Command::Food(Food { command }) => match command {
            FoodCommand::Add(args) => {
                let mut cmd =
                    NewFood::new(args.restaurant, args.name, args.price, args.points).stock(args.stock);
                if let Some(description) = args.description {
                    cmd = cmd.description(description);
                }
                print_json(&engine.create_food(cmd).await?)
            }
            FoodCommand::List { restaurant } => {
                engine.restaurant(restaurant)?;
                print_json(&engine.foods_by_restaurant(restaurant))
            }
        },
        Command::Reward(Reward { command }) => match command {
            RewardCommand::Add(args) => {
                let mut cmd = NewReward::new(args.name, args.points, args.stock);
                if let Some(description) = args.description {
                    cmd = cmd.description(description);
                }
                print_json(&engine.create_reward(cmd).await?)
            }
            RewardCommand::Restock { id, stock } => {
                print_json(&engine.restock_reward(id, stock).await?)
            }
            RewardCommand::List => print_json(&engine.active_rewards()),
        },
        Command::User(User { command }) => match command {
            UserCommand::Register(args) => {
                let password = match args.password {
                    Some(password) => password,
                    None => prompt::new_password()?,
                };
                print_json(&engine.register_user(&args.email, &password, &args.name).await?)
            }
            UserCommand::TopUp { id, amount } => print_json(&engine.top_up(id, amount).await?),
            UserCommand::Show { id, email } => {
                let user = match (id, email) {
                    (Some(id), _) => engine.user(id)?,
                    (None, Some(email)) => engine.user_by_email(&email)?,
                    (None, None) => return Err("either --id or --email is required".into()),
                };
                print_json(&user)
            }
        },
        Command::Donate(args) => {
            let mut cmd = DonationCmd::new(args.user, args.food, args.restaurant, args.quantity);
            if let Some(note) = args.note {
                cmd = cmd.note(note);
            }
            print_json(&engine.create_donation(cmd).await?)
        }
        Command::Redeem(args) => print_json(&engine.redeem_reward(args.user, args.reward).await?),
        Command::History(args) => {
            engine.user(args.user)?;
            print_json(&History {
                donations: engine.donation_history(args.user),
                exchanges: engine.exchange_history(args.user),
            })
        }
    }
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let mut settings = settings::Settings::new(cli.config.as_deref())?;
    if let Some(path) = cli.database {
        settings.database = settings::Database::Sqlite(path);
    }
    if let Some(level) = cli.level {
        settings.app.level = level;
    }

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "donasi_admin={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let db = connect_db(&settings.database.url()).await?;
    let engine = Engine::builder().database(db).build().await?;
    tracing::debug!(database = ?settings.database, "engine ready");

    match run(&engine, cli.command).await {
        Ok(()) => Ok(()),
        Err(err) => match err.downcast_ref::<EngineError>() {
            Some(engine_err) if engine_err.is_domain() => {
                eprintln!("{engine_err}");
                std::process::exit(1);
            }
            _ => Err(err),
        },
    }
}
