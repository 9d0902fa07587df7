use crate::{
	db::DbPool,
	models::{Notification, NewUser, ProfileChanges, Transaction, User, UserLimit},
	pg_repo::PgRepo,
};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
	#[error("the requested record could not be found")]
	NotFound,

	#[error("conflict with existing data: {0}")]
	Conflict(String),

	#[error("could not get a database connection: {0}")]
	Pool(String),

	#[error("database error: {0}")]
	Database(diesel::result::Error),

	#[error("blocking task was canceled")]
	Blocking,
}

impl From<diesel::result::Error> for RepoError {
	fn from(e: diesel::result::Error) -> RepoError {
		use diesel::result::{
			DatabaseErrorKind,
			Error::{DatabaseError, NotFound},
		};

		match e {
			NotFound => RepoError::NotFound,
			DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
				RepoError::Conflict(info.message().to_string())
			},
			_ => RepoError::Database(e),
		}
	}
}

impl From<diesel::r2d2::PoolError> for RepoError {
	fn from(e: diesel::r2d2::PoolError) -> RepoError {
		RepoError::Pool(e.to_string())
	}
}

pub type RepoResult<T> = Result<T, RepoError>;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
	async fn create_user(&self, user: NewUser) -> RepoResult<User>;
	async fn find_user_by_email(&self, email: String) -> RepoResult<Option<User>>;
	async fn update_profile(&self, user_id: i32, changes: ProfileChanges) -> RepoResult<User>;
	async fn list_users(&self) -> RepoResult<Vec<User>>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait TransactionRepo: Send + Sync {
	async fn insert_transaction(&self, transaction: Transaction) -> RepoResult<Transaction>;
	/// Newest occurrence first.
	async fn list_transactions(&self, user_id: i32) -> RepoResult<Vec<Transaction>>;
	async fn find_transaction(&self, id: Uuid, user_id: i32) -> RepoResult<Option<Transaction>>;
	async fn update_transaction(&self, transaction: Transaction) -> RepoResult<Transaction>;
	/// Returns whether a row was removed.
	async fn delete_transaction(&self, id: Uuid, user_id: i32) -> RepoResult<bool>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait LimitRepo: Send + Sync {
	async fn get_limits(&self, user_id: i32) -> RepoResult<Option<UserLimit>>;
	async fn upsert_limits(&self, limits: UserLimit) -> RepoResult<UserLimit>;
	async fn delete_limits(&self, user_id: i32) -> RepoResult<bool>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait NotificationRepo: Send + Sync {
	async fn create_notification(&self, user_id: i32, message: String) -> RepoResult<Notification>;
	async fn list_notifications(&self) -> RepoResult<Vec<Notification>>;
	async fn list_user_notifications(&self, user_id: i32) -> RepoResult<Vec<Notification>>;
	async fn reply_to_notification(&self, id: i32, reply: String) -> RepoResult<Notification>;
	async fn set_read(&self, id: i32, user_id: i32, is_read: bool) -> RepoResult<Notification>;
}

#[derive(Clone)]
pub struct Repos {
	pub users: Arc<dyn UserRepo>,
	pub transactions: Arc<dyn TransactionRepo>,
	pub limits: Arc<dyn LimitRepo>,
	pub notifications: Arc<dyn NotificationRepo>,
}

impl Repos {
	pub fn postgres(pool: DbPool) -> Self {
		Repos::shared(Arc::new(PgRepo::new(pool)))
	}

	/// Every store backed by one implementation, e.g. an in-memory fake.
	pub fn shared<R>(repo: Arc<R>) -> Self
	where
		R: UserRepo + TransactionRepo + LimitRepo + NotificationRepo + 'static,
	{
		Repos {
			users: repo.clone(),
			transactions: repo.clone(),
			limits: repo.clone(),
			notifications: repo,
		}
	}
}
