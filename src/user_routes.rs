use crate::handler::{AdminHandler, UserHandler};
use actix_web::web;

pub fn init(cfg: &mut web::ServiceConfig) {
	cfg
		// user mgmt routes
		.route("/register", web::post().to(UserHandler::register_handler))
		.route("/login", web::post().to(UserHandler::login_handler))
		.route("/profile", web::put().to(UserHandler::update_profile_handler))
		// admin
		.route("/admin/users", web::get().to(AdminHandler::list_users_handler));
}
