use clap::Parser;

/// Server settings, read from the command line or the environment (`.env` is loaded first).
#[derive(Debug, Clone, Parser)]
#[command(name = "expense-tracker", version, about = "Personal expense tracking API")]
pub struct Config {
	#[arg(long, env = "DATABASE_URL")]
	pub database_url: String,

	#[arg(long, env = "JWT_SECRET", hide_env_values = true)]
	pub jwt_secret: String,

	#[arg(long, env = "SOCKET_URL", default_value = "127.0.0.1:8080")]
	pub socket_url: String,

	/// Registrations with one of these emails are given the admin role.
	#[arg(long, env = "ADMIN_EMAILS", value_delimiter = ',')]
	pub admin_emails: Vec<String>,

	#[arg(long, env = "BCRYPT_COST", default_value_t = bcrypt::DEFAULT_COST)]
	pub bcrypt_cost: u32,

	#[arg(long, env = "LOG_LEVEL", default_value = "info")]
	pub log_level: String,
}
