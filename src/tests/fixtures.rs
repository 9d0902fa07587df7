use bigdecimal::BigDecimal;
use chrono::{DateTime, Local, Utc};
use std::str::FromStr;

use crate::models::{CreateTransactionRequest, RegisterRequest, Transaction, TransactionType};

pub struct TestFixtures;

impl TestFixtures {
	pub fn valid_user_registration() -> RegisterRequest {
		RegisterRequest {
			email: "test.user@gmail.com".to_string(),
			password: "SecurePassword123!".to_string(),
			username: Some("tester".to_string()),
		}
	}

	pub fn expense(amount: &str) -> CreateTransactionRequest {
		Self::transaction(TransactionType::Expense, amount)
	}

	pub fn income(amount: &str) -> CreateTransactionRequest {
		Self::transaction(TransactionType::Income, amount)
	}

	pub fn transaction(kind: TransactionType, amount: &str) -> CreateTransactionRequest {
		CreateTransactionRequest {
			transaction_type: kind,
			amount: BigDecimal::from_str(amount).unwrap(),
			description: format!("Test {} transaction", kind),
			occurred_on: Some(Local::now().date_naive()),
		}
	}

	pub fn stored_expense(user_id: i32, amount: &str, created_at: DateTime<Utc>) -> Transaction {
		Transaction {
			id: uuid::Uuid::new_v4(),
			user_id,
			transaction_type: "expense".to_string(),
			amount: BigDecimal::from_str(amount).unwrap(),
			description: "Seeded expense".to_string(),
			occurred_on: created_at.with_timezone(&Local).date_naive(),
			created_at,
		}
	}
}
