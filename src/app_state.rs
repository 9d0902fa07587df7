use crate::{alerts::LimitAlertQueue, midware::jwt::JWT, repo::Repos};

/// Shared by every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
	pub repos: Repos,
	pub jwt: JWT,
	pub alerts: LimitAlertQueue,
	pub admin_emails: Vec<String>,
	pub bcrypt_cost: u32,
}

impl AppState {
	pub fn is_admin_email(&self, email: &str) -> bool {
		self.admin_emails.iter().any(|admin| admin.trim().eq_ignore_ascii_case(email.trim()))
	}
}
