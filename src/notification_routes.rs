use crate::handler::{AdminHandler, LimitHandler, NotificationHandler};
use actix_web::web;

pub fn init(cfg: &mut web::ServiceConfig) {
	cfg
		// spending limits
		.route("/limits", web::get().to(LimitHandler::get_limits_handler))
		.route("/limits", web::put().to(LimitHandler::upsert_limits_handler))
		.route("/limits", web::delete().to(LimitHandler::delete_limits_handler))
		// notifications
		.route("/notifications", web::get().to(NotificationHandler::list_own_handler))
		.route("/notifications", web::post().to(NotificationHandler::create_handler))
		.route("/notifications/{id}/read", web::put().to(NotificationHandler::set_read_handler))
		.route("/admin/notifications", web::get().to(AdminHandler::list_notifications_handler))
		.route("/admin/notifications/{id}/reply", web::post().to(AdminHandler::reply_handler));
}
