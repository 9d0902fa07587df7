use crate::{
	alerts::ExpenseRecorded,
	app_state::AppState,
	midware::jwt::AuthUser,
	models::{
		ApiResponse, CreateTransactionRequest, LoginRequest, LoginResp, NewUser,
		NotificationRequest, ProfileChanges, ProfileUpdate, ReadFlagRequest, RegisterRequest,
		ReplyRequest, Role, SummaryQuery, Transaction, TransactionType, UpdateTransactionRequest,
		User, UserLimit,
	},
	money,
	repo::RepoError,
	summary::{self, Period},
};
use actix_web::{web, HttpResponse, Responder};
use bcrypt::{hash, verify};
use chrono::{Datelike, Local, NaiveDate, Utc};
use serde::Serialize;
use validator::Validate;

fn error_response(status: actix_web::http::StatusCode, message: &str) -> HttpResponse {
	HttpResponse::build(status).json(ApiResponse::<()>::error(message))
}

fn bad_request(message: &str) -> HttpResponse {
	error_response(actix_web::http::StatusCode::BAD_REQUEST, message)
}

fn not_found(message: &str) -> HttpResponse {
	error_response(actix_web::http::StatusCode::NOT_FOUND, message)
}

fn server_error(message: &str) -> HttpResponse {
	error_response(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR, message)
}

/// Maps a store failure to a response. `context` is logged and, for unexpected
/// failures, returned to the client.
fn repo_error(context: &str, e: RepoError) -> HttpResponse {
	match e {
		RepoError::NotFound => {
			log::info!("{}: not found", context);
			not_found("Not found")
		},
		RepoError::Conflict(detail) => {
			log::warn!("{}: conflict: {}", context, detail);
			error_response(actix_web::http::StatusCode::CONFLICT, "Conflict with existing data")
		},
		e => {
			log::error!("{}: {}", context, e);
			server_error(context)
		},
	}
}

fn ok<T: Serialize>(data: T) -> HttpResponse {
	HttpResponse::Ok().json(ApiResponse::success(data))
}

fn created<T: Serialize>(data: T) -> HttpResponse {
	HttpResponse::Created().json(ApiResponse::success(data))
}

fn parse_transaction_id(raw: &str) -> Result<uuid::Uuid, HttpResponse> {
	uuid::Uuid::parse_str(raw).map_err(|e| {
		log::error!("Invalid transaction ID format: {:?}", e);
		bad_request("Invalid transaction ID format")
	})
}

pub struct UserHandler {}

impl UserHandler {
	fn issue_token(state: &AppState, user: &User, status: actix_web::http::StatusCode) -> HttpResponse {
		match state.jwt.create_jwt(user.id, user.role()) {
			Ok(token) => HttpResponse::build(status)
				.json(ApiResponse::success(LoginResp { uid: user.id.to_string(), token })),
			Err(e) => {
				log::error!("JWT creation error: {:?}", e);
				server_error("Failed to create authentication token")
			},
		}
	}

	pub async fn register_handler(
		state: web::Data<AppState>,
		req: web::Json<RegisterRequest>,
	) -> impl Responder {
		log::info!("Registering user with email: {}", req.email);
		if let Err(e) = req.validate() {
			log::error!("Validation error: {:?}", e);
			return bad_request(&e.to_string());
		}
		let req = req.into_inner();

		let password = req.password;
		let cost = state.bcrypt_cost;
		let hashed_password = match web::block(move || hash(password.as_bytes(), cost)).await {
			Ok(Ok(hashed)) => hashed,
			Ok(Err(e)) => {
				log::error!("Password hashing failed for email {}: {}", req.email, e);
				return server_error("Failed to hash password");
			},
			Err(e) => {
				log::error!("Password hashing task failed: {:?}", e);
				return server_error("Failed to hash password");
			},
		};

		let role = if state.is_admin_email(&req.email) { Role::Admin } else { Role::User };
		let new_user = NewUser {
			email: req.email.trim().to_lowercase(),
			username: req.username,
			password: hashed_password,
			role: role.as_str().to_string(),
		};

		match state.repos.users.create_user(new_user).await {
			Ok(user) => {
				log::info!("Registered user {} with role {}", user.id, role.as_str());
				Self::issue_token(&state, &user, actix_web::http::StatusCode::CREATED)
			},
			Err(RepoError::Conflict(_)) => {
				log::warn!("Email already registered: {}", req.email);
				error_response(actix_web::http::StatusCode::CONFLICT, "Email already registered")
			},
			Err(e) => repo_error("Failed to register user", e),
		}
	}

	pub async fn login_handler(
		state: web::Data<AppState>,
		req: web::Json<LoginRequest>,
	) -> impl Responder {
		let invalid = || {
			error_response(actix_web::http::StatusCode::UNAUTHORIZED, "Invalid email or password")
		};
		let email = req.email.trim().to_lowercase();

		let user = match state.repos.users.find_user_by_email(email.clone()).await {
			Ok(Some(user)) => user,
			Ok(None) => {
				log::info!("Login attempt for unknown email: {}", email);
				return invalid();
			},
			Err(e) => return repo_error("Failed to look up user", e),
		};

		let password = req.into_inner().password;
		let stored_hash = user.password.clone();
		match web::block(move || verify(password.as_bytes(), &stored_hash)).await {
			Ok(Ok(true)) => {
				log::info!("Login successful for user ID: {}", user.id);
				Self::issue_token(&state, &user, actix_web::http::StatusCode::OK)
			},
			Ok(Ok(false)) => {
				log::info!("Wrong password for user ID: {}", user.id);
				invalid()
			},
			Ok(Err(e)) => {
				log::error!("Password verification failed for user {}: {}", user.id, e);
				invalid()
			},
			Err(e) => {
				log::error!("Password verification task failed: {:?}", e);
				server_error("Failed to verify password")
			},
		}
	}

	pub async fn update_profile_handler(
		state: web::Data<AppState>,
		user: AuthUser,
		req: web::Json<ProfileUpdate>,
	) -> impl Responder {
		if let Err(e) = req.validate() {
			log::error!("Validation error: {:?}", e);
			return bad_request(&e.to_string());
		}
		let req = req.into_inner();
		if req.username.is_none() && req.email.is_none() {
			return bad_request("Nothing to update");
		}

		let changes = ProfileChanges {
			username: req.username,
			email: req.email.map(|email| email.trim().to_lowercase()),
		};
		match state.repos.users.update_profile(user.id, changes).await {
			Ok(updated) => {
				log::info!("Profile updated successfully for user: {}", user.id);
				ok(updated)
			},
			Err(e) => repo_error("Failed to update profile", e),
		}
	}
}

pub struct TransactionHandler {}

impl TransactionHandler {
	pub async fn create_transaction_handler(
		state: web::Data<AppState>,
		user: AuthUser,
		req: web::Json<CreateTransactionRequest>,
	) -> impl Responder {
		if let Err(e) = req.validate() {
			log::error!("Validation error: {:?}", e);
			return bad_request(&e.to_string());
		}
		let req = req.into_inner();
		if let Err(e) = money::validate(&req.amount) {
			log::error!("Invalid transaction amount {}: {}", req.amount, e);
			return bad_request(&format!("Invalid transaction amount: {}", e));
		}

		let transaction = Transaction {
			id: uuid::Uuid::new_v4(),
			user_id: user.id,
			transaction_type: req.transaction_type.as_str().to_string(),
			amount: req.amount,
			description: req.description,
			occurred_on: req.occurred_on.unwrap_or_else(|| Local::now().date_naive()),
			created_at: Utc::now(),
		};
		log::info!("Generated transaction ID: {} for user: {}", transaction.id, user.id);

		let stored = match state.repos.transactions.insert_transaction(transaction).await {
			Ok(stored) => stored,
			Err(e) => return repo_error("Failed to create transaction", e),
		};

		if req.transaction_type == TransactionType::Expense {
			state.alerts.publish(ExpenseRecorded { user_id: user.id });
		}

		log::info!("Transaction {} created successfully for user: {}", stored.id, user.id);
		created(stored)
	}

	pub async fn get_transaction_handler(
		state: web::Data<AppState>,
		user: AuthUser,
		path: web::Path<String>,
	) -> impl Responder {
		let transaction_id = match parse_transaction_id(&path.into_inner()) {
			Ok(id) => id,
			Err(resp) => return resp,
		};

		match state.repos.transactions.find_transaction(transaction_id, user.id).await {
			Ok(Some(transaction)) => {
				log::info!("Transaction {} retrieved for user: {}", transaction_id, user.id);
				ok(transaction)
			},
			Ok(None) => not_found("Transaction not found"),
			Err(e) => repo_error("Failed to fetch transaction", e),
		}
	}

	pub async fn list_transactions_handler(
		state: web::Data<AppState>,
		user: AuthUser,
	) -> impl Responder {
		match state.repos.transactions.list_transactions(user.id).await {
			Ok(transactions) => {
				log::info!(
					"Successfully retrieved {} transactions for user: {}",
					transactions.len(),
					user.id
				);
				ok(transactions)
			},
			Err(e) => repo_error("Failed to list transactions", e),
		}
	}

	pub async fn update_transaction_handler(
		state: web::Data<AppState>,
		user: AuthUser,
		path: web::Path<String>,
		req: web::Json<UpdateTransactionRequest>,
	) -> impl Responder {
		let transaction_id = match parse_transaction_id(&path.into_inner()) {
			Ok(id) => id,
			Err(resp) => return resp,
		};
		if let Err(e) = req.validate() {
			log::error!("Validation error: {:?}", e);
			return bad_request(&e.to_string());
		}
		let req = req.into_inner();

		let mut transaction =
			match state.repos.transactions.find_transaction(transaction_id, user.id).await {
				Ok(Some(transaction)) => transaction,
				Ok(None) => return not_found("Transaction not found"),
				Err(e) => return repo_error("Failed to fetch transaction", e),
			};

		if !transaction.is_editable_at(Utc::now()) {
			log::warn!("Edit window expired for transaction {} of user {}", transaction_id, user.id);
			return error_response(
				actix_web::http::StatusCode::FORBIDDEN,
				"Transactions can only be edited within 3 hours of creation",
			);
		}

		if let Some(amount) = req.amount {
			if let Err(e) = money::validate(&amount) {
				return bad_request(&format!("Invalid transaction amount: {}", e));
			}
			transaction.amount = amount;
		}
		if let Some(kind) = req.transaction_type {
			transaction.transaction_type = kind.as_str().to_string();
		}
		if let Some(description) = req.description {
			transaction.description = description;
		}
		if let Some(occurred_on) = req.occurred_on {
			transaction.occurred_on = occurred_on;
		}

		match state.repos.transactions.update_transaction(transaction).await {
			Ok(updated) => {
				log::info!("Transaction {} updated for user: {}", transaction_id, user.id);
				ok(updated)
			},
			Err(e) => repo_error("Failed to update transaction", e),
		}
	}

	pub async fn delete_transaction_handler(
		state: web::Data<AppState>,
		user: AuthUser,
		path: web::Path<String>,
	) -> impl Responder {
		let transaction_id = match parse_transaction_id(&path.into_inner()) {
			Ok(id) => id,
			Err(resp) => return resp,
		};

		match state.repos.transactions.delete_transaction(transaction_id, user.id).await {
			Ok(true) => {
				log::info!("Transaction {} deleted for user: {}", transaction_id, user.id);
				ok("Transaction deleted")
			},
			Ok(false) => not_found("Transaction not found"),
			Err(e) => repo_error("Failed to delete transaction", e),
		}
	}

	pub async fn summary_handler(
		state: web::Data<AppState>,
		user: AuthUser,
		query: web::Query<SummaryQuery>,
	) -> impl Responder {
		let period = match summary_period(&query, Local::now().date_naive()) {
			Ok(period) => period,
			Err(resp) => return resp,
		};

		match state.repos.transactions.list_transactions(user.id).await {
			Ok(transactions) => ok(summary::summarize(&transactions, period)),
			Err(e) => repo_error("Failed to load transactions", e),
		}
	}

	pub async fn yearly_summary_handler(
		state: web::Data<AppState>,
		user: AuthUser,
		query: web::Query<SummaryQuery>,
	) -> impl Responder {
		let year = query.year.unwrap_or_else(|| Local::now().year());

		match state.repos.transactions.list_transactions(user.id).await {
			Ok(transactions) => ok(summary::yearly_breakdown(&transactions, year)),
			Err(e) => repo_error("Failed to load transactions", e),
		}
	}
}

/// `date` selects a single day; otherwise `year`/`month` select a month, each
/// defaulting to the current one.
fn summary_period(query: &SummaryQuery, today: NaiveDate) -> Result<Period, HttpResponse> {
	if let Some(date) = query.date {
		return Ok(Period::Day(date));
	}
	let year = query.year.unwrap_or(today.year());
	let month = query.month.unwrap_or(today.month());
	if !(1..=12).contains(&month) {
		return Err(bad_request("Month must be between 1 and 12"));
	}
	Ok(Period::Month { year, month })
}

pub struct LimitHandler {}

impl LimitHandler {
	pub async fn get_limits_handler(state: web::Data<AppState>, user: AuthUser) -> impl Responder {
		match state.repos.limits.get_limits(user.id).await {
			Ok(limits) => ok(limits),
			Err(e) => repo_error("Failed to fetch limits", e),
		}
	}

	pub async fn upsert_limits_handler(
		state: web::Data<AppState>,
		user: AuthUser,
		req: web::Json<UserLimit>,
	) -> impl Responder {
		let mut limits = req.into_inner();
		limits.user_id = user.id;

		let invalid = [&limits.daily_limit, &limits.monthly_limit]
			.into_iter()
			.flatten()
			.find_map(|limit| money::validate(limit).err());
		if let Some(e) = invalid {
			return bad_request(&format!("Invalid limit: {}", e));
		}

		match state.repos.limits.upsert_limits(limits).await {
			Ok(saved) => {
				log::info!("Limits saved for user: {}", user.id);
				ok(saved)
			},
			Err(e) => repo_error("Failed to save limits", e),
		}
	}

	pub async fn delete_limits_handler(state: web::Data<AppState>, user: AuthUser) -> impl Responder {
		match state.repos.limits.delete_limits(user.id).await {
			Ok(true) => ok("Limits removed"),
			Ok(false) => not_found("No limits configured"),
			Err(e) => repo_error("Failed to delete limits", e),
		}
	}
}

pub struct NotificationHandler {}

impl NotificationHandler {
	pub async fn list_own_handler(state: web::Data<AppState>, user: AuthUser) -> impl Responder {
		match state.repos.notifications.list_user_notifications(user.id).await {
			Ok(notifications) => ok(notifications),
			Err(e) => repo_error("Failed to list notifications", e),
		}
	}

	pub async fn create_handler(
		state: web::Data<AppState>,
		user: AuthUser,
		req: web::Json<NotificationRequest>,
	) -> impl Responder {
		if let Err(e) = req.validate() {
			return bad_request(&e.to_string());
		}

		match state.repos.notifications.create_notification(user.id, req.into_inner().message).await {
			Ok(notification) => {
				log::info!("Notification {} created by user: {}", notification.id, user.id);
				created(notification)
			},
			Err(e) => repo_error("Failed to create notification", e),
		}
	}

	pub async fn set_read_handler(
		state: web::Data<AppState>,
		user: AuthUser,
		path: web::Path<i32>,
		req: web::Json<ReadFlagRequest>,
	) -> impl Responder {
		let id = path.into_inner();
		match state.repos.notifications.set_read(id, user.id, req.is_read).await {
			Ok(notification) => ok(notification),
			Err(e) => repo_error("Failed to update notification", e),
		}
	}
}

pub struct AdminHandler {}

impl AdminHandler {
	pub async fn list_users_handler(state: web::Data<AppState>, user: AuthUser) -> impl Responder {
		if let Err(resp) = user.require_admin() {
			return resp;
		}
		match state.repos.users.list_users().await {
			Ok(users) => ok(users),
			Err(e) => repo_error("Failed to list users", e),
		}
	}

	pub async fn list_notifications_handler(
		state: web::Data<AppState>,
		user: AuthUser,
	) -> impl Responder {
		if let Err(resp) = user.require_admin() {
			return resp;
		}
		match state.repos.notifications.list_notifications().await {
			Ok(notifications) => ok(notifications),
			Err(e) => repo_error("Failed to list notifications", e),
		}
	}

	pub async fn reply_handler(
		state: web::Data<AppState>,
		user: AuthUser,
		path: web::Path<i32>,
		req: web::Json<ReplyRequest>,
	) -> impl Responder {
		if let Err(resp) = user.require_admin() {
			return resp;
		}
		if let Err(e) = req.validate() {
			return bad_request(&e.to_string());
		}

		let id = path.into_inner();
		match state.repos.notifications.reply_to_notification(id, req.into_inner().reply).await {
			Ok(notification) => {
				log::info!("Admin {} replied to notification {}", user.id, id);
				ok(notification)
			},
			Err(e) => repo_error("Failed to reply to notification", e),
		}
	}
}
