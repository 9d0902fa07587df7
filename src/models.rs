use crate::{constants::EDIT_WINDOW_HOURS, schema::*};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Local, NaiveDate, Utc};
use diesel::{pg::Pg, prelude::*};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	User,
	Admin,
}

impl Role {
	pub fn as_str(&self) -> &str {
		match self {
			Role::User => "user",
			Role::Admin => "admin",
		}
	}
}

impl FromStr for Role {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"user" => Ok(Role::User),
			"admin" => Ok(Role::Admin),
			other => Err(format!("unknown role: {}", other)),
		}
	}
}

#[derive(Queryable, Serialize, Deserialize, Debug, Clone, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(Pg))]
pub struct User {
	pub id: i32,
	pub email: String,
	pub username: Option<String>,
	#[serde(skip_serializing, default)]
	pub password: String,
	pub role: String,
	pub created_at: DateTime<Utc>,
}

impl User {
	/// Unrecognised role strings fall back to the least privileged role.
	pub fn role(&self) -> Role {
		self.role.parse().unwrap_or(Role::User)
	}
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = users)]
pub struct NewUser {
	pub email: String,
	pub username: Option<String>,
	pub password: String,
	pub role: String,
}

#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = users)]
pub struct ProfileChanges {
	pub username: Option<String>,
	pub email: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
	Income,
	Expense,
	Savings,
}

impl TransactionType {
	pub fn as_str(&self) -> &str {
		match self {
			TransactionType::Income => "income",
			TransactionType::Expense => "expense",
			TransactionType::Savings => "savings",
		}
	}
}

impl FromStr for TransactionType {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"income" => Ok(TransactionType::Income),
			"expense" => Ok(TransactionType::Expense),
			"savings" => Ok(TransactionType::Savings),
			other => Err(format!("unknown transaction type: {}", other)),
		}
	}
}

impl fmt::Display for TransactionType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Insertable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Transaction {
	pub id: uuid::Uuid,
	pub user_id: i32,
	pub transaction_type: String,
	#[serde(with = "crate::money::amount")]
	pub amount: BigDecimal,
	pub description: String,
	pub occurred_on: NaiveDate,
	pub created_at: DateTime<Utc>,
}

impl Transaction {
	pub fn kind(&self) -> Option<TransactionType> {
		self.transaction_type.parse().ok()
	}

	/// Calendar day of creation in the server's local time zone.
	pub fn created_on(&self) -> NaiveDate {
		self.created_at.with_timezone(&Local).date_naive()
	}

	pub fn is_editable_at(&self, now: DateTime<Utc>) -> bool {
		now.signed_duration_since(self.created_at) <= chrono::Duration::hours(EDIT_WINDOW_HOURS)
	}
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateTransactionRequest {
	pub transaction_type: TransactionType,
	#[serde(with = "crate::money::amount")]
	pub amount: BigDecimal,
	#[serde(default)]
	#[validate(length(max = 500))]
	pub description: String,
	pub occurred_on: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct UpdateTransactionRequest {
	pub transaction_type: Option<TransactionType>,
	#[serde(default, with = "crate::money::optional_amount")]
	pub amount: Option<BigDecimal>,
	#[validate(length(max = 500))]
	pub description: Option<String>,
	pub occurred_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Default, Queryable, Insertable, AsChangeset, Selectable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::user_limits)]
#[diesel(primary_key(user_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct UserLimit {
	#[serde(default)]
	pub user_id: i32,
	#[serde(default, with = "crate::money::optional_amount")]
	pub daily_limit: Option<BigDecimal>,
	#[serde(default, with = "crate::money::optional_amount")]
	pub monthly_limit: Option<BigDecimal>,
	#[serde(default)]
	pub daily_limit_enabled: bool,
	#[serde(default)]
	pub monthly_limit_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Notification {
	pub id: i32,
	pub user_id: i32,
	pub message: String,
	pub reply: Option<String>,
	pub created_at: DateTime<Utc>,
	pub replied_at: Option<DateTime<Utc>>,
	pub is_read: bool,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = notifications)]
pub struct NewNotification<'a> {
	pub user_id: i32,
	pub message: &'a str,
}

#[derive(Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
	#[validate(email)]
	pub email: String,
	#[validate(length(min = 8))]
	pub password: String,
	#[validate(length(min = 3, max = 50))]
	pub username: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct LoginRequest {
	pub email: String,
	pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResp {
	pub uid: String,
	pub token: String,
}

#[derive(Serialize, Deserialize, Validate)]
pub struct ProfileUpdate {
	#[validate(length(min = 3, max = 50))]
	pub username: Option<String>,
	#[validate(email)]
	pub email: Option<String>,
}

#[derive(Serialize, Deserialize, Validate)]
pub struct NotificationRequest {
	#[validate(length(min = 1, max = 1000))]
	pub message: String,
}

#[derive(Serialize, Deserialize, Validate)]
pub struct ReplyRequest {
	#[validate(length(min = 1, max = 1000))]
	pub reply: String,
}

#[derive(Serialize, Deserialize)]
pub struct ReadFlagRequest {
	pub is_read: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SummaryQuery {
	pub year: Option<i32>,
	pub month: Option<u32>,
	pub date: Option<NaiveDate>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiResponse<T> {
	pub status: String,
	pub data: Option<T>,
	pub error: Option<String>,
}

impl<T> ApiResponse<T> {
	pub fn success(data: T) -> Self {
		ApiResponse { status: "success".to_string(), data: Some(data), error: None }
	}

	pub fn error(message: impl Into<String>) -> Self {
		ApiResponse { status: "error".to_string(), data: None, error: Some(message.into()) }
	}
}
