use chrono::NaiveDate;

use super::{DueCandidate, DueResolution};
use crate::order::Installment;

/// earliest unpaid installment with a readable due date
pub fn next_installment(installments: &[Installment]) -> Option<&Installment> {
    installments
        .iter()
        .filter(|i| !i.status.is_paid())
        .filter(|i| i.due_date.is_some())
        .min_by_key(|i| (i.due_date, i.number))
}

pub fn resolve(installments: &[Installment], today: NaiveDate) -> DueResolution {
    match next_installment(installments) {
        Some(Installment {
            number,
            due_date: Some(date),
            ..
        }) => DueResolution::Due(DueCandidate::measure(*date, today, Some(*number))),
        _ => DueResolution::NoCandidate,
    }
}
