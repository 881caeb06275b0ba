pub use sea_orm_migration::prelude::*;

mod m20261019_000001_init;

/// SQLite file used when nothing else is configured.
pub const DEFAULT_DATABASE_PATH: &str = "./donasi.db";

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20261019_000001_init::Migration)]
    }
}

/// Connection URL for a SQLite file, created on first use.
pub fn sqlite_url(path: &str) -> String {
    format!("sqlite:{path}?mode=rwc")
}

/// Pick the database URL: a full `url` wins, then a SQLite `path`, then
/// [`DEFAULT_DATABASE_PATH`].
pub fn database_url(url: Option<String>, path: Option<String>) -> String {
    url.unwrap_or_else(|| sqlite_url(path.as_deref().unwrap_or(DEFAULT_DATABASE_PATH)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_resolution_order() {
        assert_eq!(database_url(None, None), "sqlite:./donasi.db?mode=rwc");
        assert_eq!(
            database_url(None, Some("/var/lib/donasi.db".to_string())),
            "sqlite:/var/lib/donasi.db?mode=rwc"
        );
        assert_eq!(
            database_url(
                Some("sqlite::memory:".to_string()),
                Some("/var/lib/donasi.db".to_string())
            ),
            "sqlite::memory:"
        );
    }
}
