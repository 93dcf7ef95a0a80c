//! Mirrors a session's monthly shares into each participant's personal
//! ledger.

use tracing::{debug, warn};

use splitledger_domain::{
    Distribution, Expense, LedgerEntry, LedgerEntryKey, Money, Session, YearMonth,
};

use crate::allocation_service::AllocationService;
use crate::error::CoreError;
use crate::storage::{LedgerStore, LedgerTransaction, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Outcome counts for one synchronization run.
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Reconciles computed monthly shares against the external ledger store,
/// guaranteeing at most one entry per `(participant, session, month)` key.
///
/// The whole run executes inside a single store transaction: a failure
/// partway leaves no entries committed.
pub struct LedgerSyncService;

impl LedgerSyncService {
    /// Sum of the session's expenses dated within the target month.
    pub fn monthly_total(
        session: &Session,
        expenses: &[Expense],
        month: YearMonth,
    ) -> Result<Money, CoreError> {
        let mut total = Money::zero(session.currency);
        for expense in expenses {
            if expense.session_id == session.id && month.contains(expense.date) {
                total = total.checked_add(expense.amount)?;
            }
        }
        Ok(total)
    }

    /// Synchronizes one session-month: allocates the monthly total per the
    /// session's plan, then upserts one ledger entry per participant.
    /// Re-running with unchanged expenses is a no-op on amounts (idempotent
    /// overwrite); zero shares never create entries.
    pub fn sync_month<S: LedgerStore>(
        store: &S,
        session: &Session,
        expenses: &[Expense],
        month: YearMonth,
    ) -> Result<SyncReport, CoreError> {
        let total = Self::monthly_total(session, expenses, month)?;
        let distributions = AllocationService::distribute(session, total)?;
        debug!(
            session = %session.id,
            %month,
            total = %total,
            participants = distributions.len(),
            "synchronizing session month"
        );

        store.with_transaction(|tx| {
            let mut report = SyncReport::default();
            for dist in &distributions {
                Self::upsert_share(tx, session, month, dist, &mut report)?;
            }
            Ok(report)
        })
    }

    fn upsert_share<Tx: LedgerTransaction>(
        tx: &mut Tx,
        session: &Session,
        month: YearMonth,
        dist: &Distribution,
        report: &mut SyncReport,
    ) -> Result<(), CoreError> {
        let key = LedgerEntryKey {
            participant_id: dist.participant_id,
            session_id: session.id,
            month,
        };
        let description = Self::entry_description(session, month);

        match tx.find_entry(&key)? {
            Some(mut entry) => {
                entry.amount = dist.amount;
                entry.description = description;
                tx.update_entry(entry)?;
                report.updated += 1;
            }
            None if dist.amount.is_zero() => {
                report.skipped += 1;
            }
            None => {
                let entry = LedgerEntry::new(
                    key.participant_id,
                    key.session_id,
                    month,
                    dist.amount,
                    description.clone(),
                );
                match tx.create_entry(entry) {
                    Ok(_) => report.created += 1,
                    // Lost a same-key race despite the absence check: fall
                    // back to updating the winner's entry, once.
                    Err(StoreError::Conflict(_)) => {
                        warn!(%key, "create conflicted after absence check; retrying as update");
                        let mut existing = tx
                            .find_entry(&key)?
                            .ok_or_else(|| CoreError::SyncConflict(format!(
                                "entry for {key} conflicted on create but cannot be fetched"
                            )))?;
                        existing.amount = dist.amount;
                        existing.description = description;
                        tx.update_entry(existing)?;
                        report.updated += 1;
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        }
        Ok(())
    }

    fn entry_description(session: &Session, month: YearMonth) -> String {
        format!("{} · {} shared expenses", session.name, month)
    }
}
