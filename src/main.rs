mod alerts;
mod app_state;
mod config;
mod constants;
mod db;
mod handler;
mod midware;
mod models;
mod money;
mod notification_routes;
mod pg_repo;
mod repo;
mod schema;
mod summary;
#[cfg(test)]
mod tests;
mod transaction_routes;
mod user_routes;
use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use clap::Parser;

use alerts::{LimitAlertQueue, LimitEvaluator};
use app_state::AppState;
use config::Config;
use dotenv::dotenv;
use env_logger::Env;
use midware::jwt::{Authentication, JWT};
use repo::Repos;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
	dotenv().ok();
	let config = Config::parse();
	env_logger::init_from_env(Env::default().default_filter_or(config.log_level.as_str()));

	let pool = db::get_db_pool(&config.database_url)?;
	db::init(&pool)?;

	let repos = Repos::postgres(pool);
	let evaluator = LimitEvaluator::new(repos.limits.clone(), repos.notifications.clone());
	let (alerts, _alert_worker) = LimitAlertQueue::start(evaluator, repos.transactions.clone());

	let jwt = JWT::new(&config.jwt_secret);
	let state = web::Data::new(AppState {
		repos,
		jwt: jwt.clone(),
		alerts,
		admin_emails: config.admin_emails.clone(),
		bcrypt_cost: config.bcrypt_cost,
	});
	log::info!("Listening on: {}..", config.socket_url);

	HttpServer::new(move || {
		App::new()
			.app_data(state.clone())
			.wrap(Authentication::new(jwt.clone()))
			.wrap(
				Cors::default()
					.allow_any_origin()
					.allow_any_method()
					.allow_any_header()
					.supports_credentials()
					.max_age(3600),
			)
			.wrap(actix_web::middleware::Logger::default())
			.configure(user_routes::init)
			.configure(transaction_routes::init)
			.configure(notification_routes::init)
	})
	.bind(&config.socket_url)?
	.run()
	.await?;

	Ok(())
}
