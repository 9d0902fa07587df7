use crate::handler::TransactionHandler;
use actix_web::web;

pub fn init(cfg: &mut web::ServiceConfig) {
	cfg
		.route("/transactions", web::post().to(TransactionHandler::create_transaction_handler))
		.route("/transactions", web::get().to(TransactionHandler::list_transactions_handler))
		.route("/transactions/{id}", web::get().to(TransactionHandler::get_transaction_handler))
		.route("/transactions/{id}", web::put().to(TransactionHandler::update_transaction_handler))
		.route(
			"/transactions/{id}",
			web::delete().to(TransactionHandler::delete_transaction_handler),
		)
		// Period totals
		.route("/summary", web::get().to(TransactionHandler::summary_handler))
		.route("/summary/yearly", web::get().to(TransactionHandler::yearly_summary_handler));
}
