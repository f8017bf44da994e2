use chrono::NaiveDate;
use tracing::debug;

use crate::config::EngineConfig;
use crate::dates;
use crate::errors::{EngineError, Result};
use crate::money::Money;
use crate::order::Installment;
use crate::types::InstallmentStatus;

/// inputs for (re)building an order's installment list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRequest {
    pub total: Money,
    pub count: u32,
    /// raw due dates as entered, one per installment; blank means missing
    pub due_dates: Option<Vec<String>>,
    /// everything already paid towards the order
    pub already_paid: Money,
}

impl ScheduleRequest {
    pub fn new(total: Money, count: u32) -> Self {
        Self {
            total,
            count,
            due_dates: None,
            already_paid: Money::ZERO,
        }
    }

    pub fn with_due_dates<S: Into<String>>(mut self, dates: impl IntoIterator<Item = S>) -> Self {
        self.due_dates = Some(dates.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_already_paid(mut self, paid: Money) -> Self {
        self.already_paid = paid;
        self
    }

    /// strict checks applied before a schedule is submitted to the store:
    /// the count must be offered and every explicit date must parse
    pub fn validate(&self, config: &EngineConfig) -> Result<()> {
        config.check_installment_count(self.count)?;
        self.check_total()?;
        self.check_date_count()?;

        if let Some(raw_dates) = &self.due_dates {
            for (i, raw) in raw_dates.iter().enumerate() {
                let installment = i as u32 + 1;
                if raw.trim().is_empty() {
                    return Err(EngineError::MissingDueDate { installment });
                }
                if dates::parse_calendar_date(raw).is_none() {
                    return Err(EngineError::InvalidDueDate {
                        installment,
                        value: raw.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    fn check_total(&self) -> Result<()> {
        if self.total.is_negative() {
            return Err(EngineError::NegativeTotal { total: self.total });
        }
        Ok(())
    }

    fn check_date_count(&self) -> Result<()> {
        match &self.due_dates {
            Some(raw_dates) if raw_dates.len() != self.count as usize => {
                Err(EngineError::DueDateCountMismatch {
                    expected: self.count,
                    provided: raw_dates.len(),
                })
            }
            _ => Ok(()),
        }
    }

    /// due date for each installment; missing or unparseable entries fall
    /// back to `today` plus the installment's zero-based index in months
    fn resolve_due_dates(&self, today: NaiveDate) -> Vec<NaiveDate> {
        (0..self.count)
            .map(|i| {
                self.due_dates
                    .as_ref()
                    .and_then(|raw| raw.get(i as usize))
                    .and_then(|raw| dates::parse_calendar_date(raw))
                    .unwrap_or_else(|| dates::add_months(today, i).unwrap_or(today))
            })
            .collect()
    }
}

/// generated installment schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallmentSchedule {
    pub total: Money,
    pub already_paid: Money,
    pub installments: Vec<Installment>,
}

impl InstallmentSchedule {
    /// split the total, assign due dates and mark as paid every installment
    /// the running `already_paid` budget still covers. Pure: the same request and day
    /// always give the same schedule.
    pub fn generate(request: &ScheduleRequest, today: NaiveDate) -> Result<Self> {
        if request.count == 0 {
            return Err(EngineError::InvalidInstallmentCount { count: 0 });
        }
        request.check_total()?;
        request.check_date_count()?;

        let due_dates = request.resolve_due_dates(today);
        let amounts = request.total.split_even(request.count);

        let mut installments: Vec<Installment> = amounts
            .into_iter()
            .zip(due_dates)
            .enumerate()
            .map(|(i, (amount, due_date))| Installment {
                number: i as u32 + 1,
                due_date: Some(due_date),
                amount,
                status: InstallmentStatus::Pending,
            })
            .collect();

        apply_paid_budget(&mut installments, request.already_paid);

        debug_assert_eq!(
            installments.iter().map(|i| i.amount).sum::<Money>(),
            request.total,
            "installment amounts must sum to the order total"
        );

        debug!(
            total = %request.total,
            count = request.count,
            already_paid = %request.already_paid,
            paid_installments = installments.iter().filter(|i| i.status.is_paid()).count(),
            "installment schedule generated"
        );

        Ok(Self {
            total: request.total,
            already_paid: request.already_paid,
            installments,
        })
    }

    pub fn paid_count(&self) -> usize {
        self.installments.iter().filter(|i| i.status.is_paid()).count()
    }

    /// part of the paid budget that did not cover a whole installment
    pub fn unapplied_credit(&self) -> Money {
        let covered: Money = self
            .installments
            .iter()
            .filter(|i| i.status.is_paid())
            .map(|i| i.amount)
            .sum();
        (self.already_paid.max(Money::ZERO) - covered).max(Money::ZERO)
    }

    pub fn into_installments(self) -> Vec<Installment> {
        self.installments
    }
}

/// walk installments in order, marking each one paid when the remaining
/// budget covers its full amount; an uncovered installment stays pending
/// and does not stop later, smaller ones from being covered
pub fn apply_paid_budget(installments: &mut [Installment], paid: Money) {
    let mut budget = paid.max(Money::ZERO);

    for installment in installments.iter_mut() {
        if budget >= installment.amount {
            installment.status = InstallmentStatus::Paid;
            budget -= installment.amount;
        } else {
            installment.status = InstallmentStatus::Pending;
        }
    }
}
