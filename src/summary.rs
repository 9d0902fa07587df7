use crate::{models::Transaction, models::TransactionType};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Anything that can be bucketed by the aggregator.
pub trait LedgerEntry {
	fn kind(&self) -> Option<TransactionType>;
	fn amount(&self) -> f64;
	/// Date the money moved.
	fn occurred_on(&self) -> NaiveDate;
	/// Local calendar day the entry was recorded.
	fn created_on(&self) -> NaiveDate;
}

impl LedgerEntry for Transaction {
	fn kind(&self) -> Option<TransactionType> {
		Transaction::kind(self)
	}

	fn amount(&self) -> f64 {
		crate::money::to_f64(&self.amount)
	}

	fn occurred_on(&self) -> NaiveDate {
		self.occurred_on
	}

	fn created_on(&self) -> NaiveDate {
		Transaction::created_on(self)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
	Day(NaiveDate),
	Month { year: i32, month: u32 },
}

impl Period {
	pub fn month_of(date: NaiveDate) -> Self {
		Period::Month { year: date.year(), month: date.month() }
	}

	pub fn contains(&self, date: NaiveDate) -> bool {
		match *self {
			Period::Day(day) => day == date,
			Period::Month { year, month } => date.year() == year && date.month() == month,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotals {
	pub income: f64,
	pub expenses: f64,
	pub savings: f64,
	pub balance: f64,
	pub savings_rate: f64,
}

impl PeriodTotals {
	pub fn from_buckets(income: f64, expenses: f64, savings: f64) -> Self {
		let savings_rate = if income == 0.0 { 0.0 } else { savings / income * 100.0 };
		PeriodTotals {
			income,
			expenses,
			savings,
			balance: income - expenses - savings,
			savings_rate,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthTotals {
	pub month: u32,
	pub totals: PeriodTotals,
}

/// Sums the entries accepted by `in_period` into per-type buckets.
pub fn aggregate<T, P>(entries: &[T], in_period: P) -> PeriodTotals
where
	T: LedgerEntry,
	P: Fn(&T) -> bool,
{
	let (mut income, mut expenses, mut savings) = (0.0, 0.0, 0.0);

	for entry in entries.iter().filter(|entry| in_period(*entry)) {
		let amount = entry.amount();
		if !amount.is_finite() {
			continue;
		}
		match entry.kind() {
			Some(TransactionType::Income) => income += amount,
			Some(TransactionType::Expense) => expenses += amount,
			Some(TransactionType::Savings) => savings += amount,
			None => {},
		}
	}

	PeriodTotals::from_buckets(income, expenses, savings)
}

/// Totals for a day or month, keyed on the occurrence date.
pub fn summarize<T: LedgerEntry>(entries: &[T], period: Period) -> PeriodTotals {
	aggregate(entries, |entry| period.contains(entry.occurred_on()))
}

/// One row per calendar month of `year`, January first.
pub fn yearly_breakdown<T: LedgerEntry>(entries: &[T], year: i32) -> Vec<MonthTotals> {
	(1..=12)
		.map(|month| MonthTotals { month, totals: summarize(entries, Period::Month { year, month }) })
		.collect()
}
