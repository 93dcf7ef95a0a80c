//! Turns per-participant balances into a minimal list of net transfers.

use std::collections::HashMap;

use tracing::error;
use uuid::Uuid;

use splitledger_domain::{Balance, Currency, Distribution, Expense, Money, Transfer};

use crate::error::CoreError;

/// Greedy two-pointer settlement solver.
///
/// Matches the largest debtor against the largest creditor until every net
/// balance reaches exactly zero, producing at most `participants - 1`
/// transfers. Not provably minimal for every balance distribution; a
/// min-cost-flow formulation would be, if strict minimality is ever needed.
pub struct SettlementService;

impl SettlementService {
    /// Builds balance records from what each participant actually paid and
    /// what the allocation says they owe. One balance per distribution, in
    /// distribution (roster) order.
    pub fn balances(
        expenses: &[Expense],
        distributions: &[Distribution],
        currency: Currency,
    ) -> Result<Vec<Balance>, CoreError> {
        let mut paid_by: HashMap<Uuid, Money> = HashMap::new();
        for expense in expenses {
            let paid = paid_by
                .entry(expense.paid_by)
                .or_insert_with(|| Money::zero(currency));
            *paid = paid.checked_add(expense.amount)?;
        }

        Ok(distributions
            .iter()
            .map(|dist| Balance {
                participant_id: dist.participant_id,
                paid: paid_by
                    .get(&dist.participant_id)
                    .copied()
                    .unwrap_or_else(|| Money::zero(currency)),
                owed: dist.amount,
            })
            .collect())
    }

    /// Computes transfers that zero out all balances.
    ///
    /// Fails with `UnbalancedLedger` when the nets do not sum to zero; that
    /// indicates an upstream allocation bug, not a user error.
    pub fn settle(balances: &[Balance]) -> Result<Vec<Transfer>, CoreError> {
        let imbalance: i64 = balances.iter().map(Balance::net_minor_units).sum();
        if imbalance != 0 {
            error!(imbalance, "balances do not net to zero; refusing to settle");
            return Err(CoreError::UnbalancedLedger(imbalance));
        }
        let Some(currency) = balances.first().map(|b| b.paid.currency) else {
            return Ok(Vec::new());
        };

        // Zero-net participants take no part in settlement.
        let mut debtors: Vec<(Uuid, i64)> = balances
            .iter()
            .filter(|b| b.net_minor_units() < 0)
            .map(|b| (b.participant_id, b.net_minor_units()))
            .collect();
        let mut creditors: Vec<(Uuid, i64)> = balances
            .iter()
            .filter(|b| b.net_minor_units() > 0)
            .map(|b| (b.participant_id, b.net_minor_units()))
            .collect();
        debtors.sort_by_key(|(_, net)| *net);
        creditors.sort_by_key(|(_, net)| std::cmp::Reverse(*net));

        let mut transfers = Vec::new();
        let (mut d, mut c) = (0, 0);
        while d < debtors.len() && c < creditors.len() {
            let amount = (-debtors[d].1).min(creditors[c].1);
            transfers.push(Transfer {
                from: debtors[d].0,
                to: creditors[c].0,
                amount: Money::new(amount, currency),
            });
            debtors[d].1 += amount;
            creditors[c].1 -= amount;
            if debtors[d].1 == 0 {
                d += 1;
            }
            if creditors[c].1 == 0 {
                c += 1;
            }
        }

        debug_assert!(debtors.iter().all(|(_, net)| *net == 0));
        debug_assert!(creditors.iter().all(|(_, net)| *net == 0));
        Ok(transfers)
    }
}
