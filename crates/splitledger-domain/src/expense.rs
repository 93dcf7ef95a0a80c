//! Expense records and their temporal classification.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::YearMonth;
use crate::money::{Money, MoneyError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// A dated, categorized cost logged against a session.
///
/// Owned by its session's lifecycle; classification is derived from the
/// recurrence flag and the optional periodic window, never stored.
pub struct Expense {
    pub id: Uuid,
    pub session_id: Uuid,
    pub amount: Money,
    pub date: NaiveDate,
    pub category: ExpenseCategory,
    pub paid_by: Uuid,
    pub is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<PeriodWindow>,
}

impl Expense {
    /// Creates a one-time expense. Amounts must be non-negative.
    pub fn new(
        session_id: Uuid,
        amount: Money,
        date: NaiveDate,
        category: ExpenseCategory,
        paid_by: Uuid,
    ) -> Result<Self, ExpenseError> {
        let amount = amount.ensure_non_negative()?;
        Ok(Self {
            id: Uuid::new_v4(),
            session_id,
            amount,
            date,
            category,
            paid_by,
            is_recurring: false,
            period: None,
        })
    }

    pub fn with_recurring(mut self) -> Self {
        self.is_recurring = true;
        self
    }

    pub fn with_period(mut self, period: PeriodWindow) -> Self {
        self.period = Some(period);
        self
    }

    /// Derives the expense's temporal kind relative to `reference`.
    ///
    /// Recurring takes precedence when an expense is flagged both recurring
    /// and periodic; the surrounding system never normalizes that overlap at
    /// write time, so the read side resolves it here.
    pub fn classify(&self, reference: NaiveDate) -> ExpenseKind {
        if self.is_recurring {
            return ExpenseKind::Recurring;
        }
        match &self.period {
            Some(window) => ExpenseKind::Periodic {
                remaining: window.remaining_months(reference),
            },
            None => ExpenseKind::OneTime,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// The derived temporal kind of an expense.
pub enum ExpenseKind {
    OneTime,
    Recurring,
    Periodic { remaining: u32 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
/// Inclusive date window for periodic expenses; `start <= end` by
/// construction.
pub struct PeriodWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl PeriodWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ExpenseError> {
        if start > end {
            return Err(ExpenseError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whole months from `max(reference, start)` through `end`, inclusive.
    /// Zero once the reference has passed the window.
    pub fn remaining_months(&self, reference: NaiveDate) -> u32 {
        if reference > self.end {
            return 0;
        }
        let current = YearMonth::from_date(reference.max(self.start));
        let end = YearMonth::from_date(self.end);
        (end.index() - current.index() + 1).max(0) as u32
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
/// Spending categories carried through to ledger descriptions.
pub enum ExpenseCategory {
    Groceries,
    Transport,
    Leisure,
    Accommodation,
    #[default]
    Other,
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExpenseCategory::Groceries => "Groceries",
            ExpenseCategory::Transport => "Transport",
            ExpenseCategory::Leisure => "Leisure",
            ExpenseCategory::Accommodation => "Accommodation",
            ExpenseCategory::Other => "Other",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Errors raised when constructing expenses.
pub enum ExpenseError {
    Amount(MoneyError),
    InvalidPeriod { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for ExpenseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpenseError::Amount(inner) => write!(f, "invalid expense amount: {inner}"),
            ExpenseError::InvalidPeriod { start, end } => {
                write!(f, "period start {start} is after period end {end}")
            }
        }
    }
}

impl std::error::Error for ExpenseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExpenseError::Amount(inner) => Some(inner),
            ExpenseError::InvalidPeriod { .. } => None,
        }
    }
}

impl From<MoneyError> for ExpenseError {
    fn from(err: MoneyError) -> Self {
        ExpenseError::Amount(err)
    }
}
