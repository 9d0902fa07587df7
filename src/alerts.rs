use crate::{
	models::{Notification, Transaction, UserLimit},
	money,
	repo::{LimitRepo, NotificationRepo, RepoResult, TransactionRepo},
	summary::{aggregate, LedgerEntry, Period},
};
use actix_web::rt::{self, task::JoinHandle};
use bigdecimal::BigDecimal;
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LimitWindow {
	Daily,
	Monthly,
}

impl LimitWindow {
	fn configured_limit<'a>(&self, limits: &'a UserLimit) -> Option<&'a BigDecimal> {
		let (enabled, limit) = match self {
			LimitWindow::Daily => (limits.daily_limit_enabled, limits.daily_limit.as_ref()),
			LimitWindow::Monthly => (limits.monthly_limit_enabled, limits.monthly_limit.as_ref()),
		};
		limit.filter(|_| enabled)
	}

	fn period(&self, today: NaiveDate) -> Period {
		match self {
			LimitWindow::Daily => Period::Day(today),
			LimitWindow::Monthly => Period::month_of(today),
		}
	}

	fn message(&self, spent: f64, limit: f64) -> String {
		match self {
			LimitWindow::Daily => format!(
				"Daily spending limit reached: you have spent {:.2} today, against a daily limit of {:.2}.",
				spent, limit
			),
			LimitWindow::Monthly => format!(
				"Monthly spending limit reached: you have spent {:.2} this month, against a monthly limit of {:.2}.",
				spent, limit
			),
		}
	}
}

fn round_cents(value: f64) -> f64 {
	(value * 100.0).round() / 100.0
}

#[derive(Clone)]
pub struct LimitEvaluator {
	limits: Arc<dyn LimitRepo>,
	notifications: Arc<dyn NotificationRepo>,
}

impl LimitEvaluator {
	pub fn new(limits: Arc<dyn LimitRepo>, notifications: Arc<dyn NotificationRepo>) -> Self {
		Self { limits, notifications }
	}

	pub async fn check_limits<T: LedgerEntry + Sync>(&self, user_id: i32, entries: &[T]) -> RepoResult<()> {
		self.check_limits_on(user_id, entries, Local::now().date_naive()).await
	}

	/// Runs the daily and monthly checks concurrently. Both always run to completion;
	/// the first error, if any, is returned afterwards.
	pub async fn check_limits_on<T: LedgerEntry + Sync>(
		&self,
		user_id: i32,
		entries: &[T],
		today: NaiveDate,
	) -> RepoResult<()> {
		let (daily, monthly) = futures::join!(
			self.check_daily_limit_on(user_id, entries, today),
			self.check_monthly_limit_on(user_id, entries, today),
		);
		daily?;
		monthly?;
		Ok(())
	}

	pub async fn check_daily_limit<T: LedgerEntry + Sync>(
		&self,
		user_id: i32,
		entries: &[T],
	) -> RepoResult<Option<Notification>> {
		self.check_daily_limit_on(user_id, entries, Local::now().date_naive()).await
	}

	pub async fn check_daily_limit_on<T: LedgerEntry + Sync>(
		&self,
		user_id: i32,
		entries: &[T],
		today: NaiveDate,
	) -> RepoResult<Option<Notification>> {
		self.check_window(LimitWindow::Daily, user_id, entries, today).await
	}

	pub async fn check_monthly_limit<T: LedgerEntry + Sync>(
		&self,
		user_id: i32,
		entries: &[T],
	) -> RepoResult<Option<Notification>> {
		self.check_monthly_limit_on(user_id, entries, Local::now().date_naive()).await
	}

	pub async fn check_monthly_limit_on<T: LedgerEntry + Sync>(
		&self,
		user_id: i32,
		entries: &[T],
		today: NaiveDate,
	) -> RepoResult<Option<Notification>> {
		self.check_window(LimitWindow::Monthly, user_id, entries, today).await
	}

	async fn check_window<T: LedgerEntry + Sync>(
		&self,
		window: LimitWindow,
		user_id: i32,
		entries: &[T],
		today: NaiveDate,
	) -> RepoResult<Option<Notification>> {
		let Some(limits) = self.limits.get_limits(user_id).await? else {
			return Ok(None);
		};
		let Some(limit) = window.configured_limit(&limits).map(money::to_f64) else {
			log::debug!("{:?} limit check disabled for user {}", window, user_id);
			return Ok(None);
		};

		// Limits follow when the expense was recorded, not when it happened.
		let period = window.period(today);
		let spent = aggregate(entries, |entry| period.contains(entry.created_on())).expenses;
		if round_cents(spent) < limit {
			return Ok(None);
		}

		log::info!("{:?} limit reached for user {}: spent {:.2} of {:.2}", window, user_id, spent, limit);
		let notification =
			self.notifications.create_notification(user_id, window.message(spent, limit)).await?;
		Ok(Some(notification))
	}
}

/// Published by the transaction handler after an expense has been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpenseRecorded {
	pub user_id: i32,
}

/// Hands expense events to one worker that evaluates them in arrival order.
#[derive(Clone)]
pub struct LimitAlertQueue {
	sender: mpsc::UnboundedSender<ExpenseRecorded>,
}

impl LimitAlertQueue {
	/// Spawns the worker on the current actix runtime. The worker exits once every
	/// queue handle has been dropped.
	pub fn start(
		evaluator: LimitEvaluator,
		transactions: Arc<dyn TransactionRepo>,
	) -> (Self, JoinHandle<()>) {
		let (sender, receiver) = mpsc::unbounded_channel();
		let worker = rt::spawn(run_worker(receiver, evaluator, transactions));
		(Self { sender }, worker)
	}

	pub fn publish(&self, event: ExpenseRecorded) {
		if let Err(e) = self.sender.send(event) {
			log::error!("Limit alert queue is closed, dropping event for user {}", e.0.user_id);
		}
	}
}

async fn run_worker(
	mut receiver: mpsc::UnboundedReceiver<ExpenseRecorded>,
	evaluator: LimitEvaluator,
	transactions: Arc<dyn TransactionRepo>,
) {
	while let Some(event) = receiver.recv().await {
		let result = match transactions.list_transactions(event.user_id).await {
			Ok(history) => evaluator.check_limits::<Transaction>(event.user_id, &history).await,
			Err(e) => Err(e),
		};
		if let Err(e) = result {
			log::error!("Limit check failed for user {}: {}", event.user_id, e);
		}
	}
	log::info!("Limit alert worker stopped");
}
