use diesel::{
	prelude::*,
	r2d2::{self, ConnectionManager},
};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub fn get_db_pool(database_url: &str) -> Result<DbPool, r2d2::PoolError> {
	let manager = ConnectionManager::<PgConnection>::new(database_url);
	r2d2::Pool::builder().build(manager)
}

pub fn init(pool: &DbPool) -> anyhow::Result<()> {
	let mut conn = pool.get()?;
	let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| anyhow::anyhow!(e))?;
	for migration in applied {
		log::info!("Applied migration {}", migration);
	}
	Ok(())
}
