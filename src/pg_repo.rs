use crate::{
	db::DbPool,
	models::{NewNotification, NewUser, Notification, ProfileChanges, Transaction, User, UserLimit},
	repo::{LimitRepo, NotificationRepo, RepoError, RepoResult, TransactionRepo, UserRepo},
	schema::{notifications, transactions, user_limits, users},
};
use actix_web::web;
use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

/// Postgres-backed store. Diesel is synchronous, so every query runs on the blocking pool.
#[derive(Clone)]
pub struct PgRepo {
	pool: DbPool,
}

impl PgRepo {
	pub fn new(pool: DbPool) -> Self {
		Self { pool }
	}

	async fn run<T, F>(&self, query: F) -> RepoResult<T>
	where
		F: FnOnce(&mut PgConnection) -> RepoResult<T> + Send + 'static,
		T: Send + 'static,
	{
		let pool = self.pool.clone();
		web::block(move || {
			let mut conn = pool.get()?;
			query(&mut conn)
		})
		.await
		.map_err(|e| {
			log::error!("Blocking database task failed: {:?}", e);
			RepoError::Blocking
		})?
	}
}

#[async_trait]
impl UserRepo for PgRepo {
	async fn create_user(&self, user: NewUser) -> RepoResult<User> {
		self.run(move |conn| {
			diesel::insert_into(users::table)
				.values(&user)
				.returning(User::as_returning())
				.get_result(conn)
				.map_err(RepoError::from)
		})
		.await
	}

	async fn find_user_by_email(&self, email: String) -> RepoResult<Option<User>> {
		self.run(move |conn| {
			users::table
				.filter(users::email.eq(&email))
				.select(User::as_select())
				.first(conn)
				.optional()
				.map_err(RepoError::from)
		})
		.await
	}

	async fn update_profile(&self, user_id: i32, changes: ProfileChanges) -> RepoResult<User> {
		self.run(move |conn| {
			diesel::update(users::table.filter(users::id.eq(user_id)))
				.set(&changes)
				.returning(User::as_returning())
				.get_result(conn)
				.map_err(RepoError::from)
		})
		.await
	}

	async fn list_users(&self) -> RepoResult<Vec<User>> {
		self.run(|conn| {
			users::table
				.order(users::id.asc())
				.select(User::as_select())
				.load(conn)
				.map_err(RepoError::from)
		})
		.await
	}
}

#[async_trait]
impl TransactionRepo for PgRepo {
	async fn insert_transaction(&self, transaction: Transaction) -> RepoResult<Transaction> {
		self.run(move |conn| {
			diesel::insert_into(transactions::table)
				.values(&transaction)
				.returning(Transaction::as_returning())
				.get_result(conn)
				.map_err(RepoError::from)
		})
		.await
	}

	async fn list_transactions(&self, user_id: i32) -> RepoResult<Vec<Transaction>> {
		self.run(move |conn| {
			transactions::table
				.filter(transactions::user_id.eq(user_id))
				.order((transactions::occurred_on.desc(), transactions::created_at.desc()))
				.select(Transaction::as_select())
				.load(conn)
				.map_err(RepoError::from)
		})
		.await
	}

	async fn find_transaction(&self, id: Uuid, user_id: i32) -> RepoResult<Option<Transaction>> {
		self.run(move |conn| {
			transactions::table
				.filter(transactions::id.eq(id))
				.filter(transactions::user_id.eq(user_id))
				.select(Transaction::as_select())
				.first(conn)
				.optional()
				.map_err(RepoError::from)
		})
		.await
	}

	async fn update_transaction(&self, transaction: Transaction) -> RepoResult<Transaction> {
		self.run(move |conn| {
			diesel::update(
				transactions::table
					.filter(transactions::id.eq(transaction.id))
					.filter(transactions::user_id.eq(transaction.user_id)),
			)
			.set((
				transactions::transaction_type.eq(&transaction.transaction_type),
				transactions::amount.eq(&transaction.amount),
				transactions::description.eq(&transaction.description),
				transactions::occurred_on.eq(transaction.occurred_on),
			))
			.returning(Transaction::as_returning())
			.get_result(conn)
			.map_err(RepoError::from)
		})
		.await
	}

	async fn delete_transaction(&self, id: Uuid, user_id: i32) -> RepoResult<bool> {
		self.run(move |conn| {
			diesel::delete(
				transactions::table
					.filter(transactions::id.eq(id))
					.filter(transactions::user_id.eq(user_id)),
			)
			.execute(conn)
			.map(|deleted| deleted > 0)
			.map_err(RepoError::from)
		})
		.await
	}
}

#[async_trait]
impl LimitRepo for PgRepo {
	async fn get_limits(&self, user_id: i32) -> RepoResult<Option<UserLimit>> {
		self.run(move |conn| {
			user_limits::table
				.find(user_id)
				.select(UserLimit::as_select())
				.first(conn)
				.optional()
				.map_err(RepoError::from)
		})
		.await
	}

	async fn upsert_limits(&self, limits: UserLimit) -> RepoResult<UserLimit> {
		self.run(move |conn| {
			diesel::insert_into(user_limits::table)
				.values(&limits)
				.on_conflict(user_limits::user_id)
				.do_update()
				.set(&limits)
				.returning(UserLimit::as_returning())
				.get_result(conn)
				.map_err(RepoError::from)
		})
		.await
	}

	async fn delete_limits(&self, user_id: i32) -> RepoResult<bool> {
		self.run(move |conn| {
			diesel::delete(user_limits::table.find(user_id))
				.execute(conn)
				.map(|deleted| deleted > 0)
				.map_err(RepoError::from)
		})
		.await
	}
}

#[async_trait]
impl NotificationRepo for PgRepo {
	async fn create_notification(&self, user_id: i32, message: String) -> RepoResult<Notification> {
		self.run(move |conn| {
			diesel::insert_into(notifications::table)
				.values(&NewNotification { user_id, message: &message })
				.returning(Notification::as_returning())
				.get_result(conn)
				.map_err(RepoError::from)
		})
		.await
	}

	async fn list_notifications(&self) -> RepoResult<Vec<Notification>> {
		self.run(|conn| {
			notifications::table
				.order(notifications::created_at.desc())
				.select(Notification::as_select())
				.load(conn)
				.map_err(RepoError::from)
		})
		.await
	}

	async fn list_user_notifications(&self, user_id: i32) -> RepoResult<Vec<Notification>> {
		self.run(move |conn| {
			notifications::table
				.filter(notifications::user_id.eq(user_id))
				.order(notifications::created_at.desc())
				.select(Notification::as_select())
				.load(conn)
				.map_err(RepoError::from)
		})
		.await
	}

	async fn reply_to_notification(&self, id: i32, reply: String) -> RepoResult<Notification> {
		self.run(move |conn| {
			diesel::update(notifications::table.find(id))
				.set((
					notifications::reply.eq(Some(reply)),
					notifications::replied_at.eq(Some(chrono::Utc::now())),
				))
				.returning(Notification::as_returning())
				.get_result(conn)
				.map_err(RepoError::from)
		})
		.await
	}

	async fn set_read(&self, id: i32, user_id: i32, is_read: bool) -> RepoResult<Notification> {
		self.run(move |conn| {
			diesel::update(
				notifications::table
					.filter(notifications::id.eq(id))
					.filter(notifications::user_id.eq(user_id)),
			)
			.set(notifications::is_read.eq(is_read))
			.returning(Notification::as_returning())
			.get_result(conn)
			.map_err(RepoError::from)
		})
		.await
	}
}
