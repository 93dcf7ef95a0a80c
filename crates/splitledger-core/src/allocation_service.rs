//! Splits an expense pool across a session's participants.

use uuid::Uuid;

use splitledger_domain::{
    Distribution, Money, Percentage, Session, FULL_SHARE_BASIS_POINTS,
};

use crate::error::CoreError;

/// Weight sums may drift from 100% by at most one basis point
/// (one minor percentage point).
const WEIGHT_SUM_TOLERANCE_BASIS_POINTS: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A session's allocation policy, resolved once at computation entry.
pub enum AllocationPlan {
    /// Equal split across the roster, remainder to the earliest participants.
    Equal { participants: Vec<Uuid> },
    /// Percentage-weighted split in roster order.
    Weighted { shares: Vec<(Uuid, Percentage)> },
}

/// Computes per-participant distributions for a pool of expenses.
///
/// Pure: no I/O, no shared state. Callers persist results as needed.
pub struct AllocationService;

impl AllocationService {
    /// Resolves the session's optional weight set into a concrete plan.
    ///
    /// Absent weights default to an equal split across the full roster
    /// (creator included). Present weights must cover every roster
    /// participant exactly once and sum to 100% within tolerance.
    pub fn resolve_plan(session: &Session) -> Result<AllocationPlan, CoreError> {
        let roster: Vec<Uuid> = session.roster().iter().map(|p| p.id).collect();
        if roster.is_empty() {
            return Err(CoreError::NoParticipants);
        }

        let Some(weights) = session.weights.as_ref() else {
            return Ok(AllocationPlan::Equal {
                participants: roster,
            });
        };

        let mut shares = Vec::with_capacity(roster.len());
        for id in &roster {
            let mut matching = weights.iter().filter(|w| w.participant_id == *id);
            let weight = matching
                .next()
                .ok_or_else(|| CoreError::InvalidWeights(format!("no weight for participant {id}")))?;
            if matching.next().is_some() {
                return Err(CoreError::InvalidWeights(format!(
                    "duplicate weight for participant {id}"
                )));
            }
            shares.push((*id, weight.percentage));
        }
        if weights.len() != roster.len() {
            return Err(CoreError::InvalidWeights(
                "weight set references participants outside the roster".into(),
            ));
        }

        let sum: u32 = shares.iter().map(|(_, pct)| pct.basis_points()).sum();
        if sum.abs_diff(FULL_SHARE_BASIS_POINTS) > WEIGHT_SUM_TOLERANCE_BASIS_POINTS {
            return Err(CoreError::InvalidWeights(format!(
                "weights sum to {sum} basis points, expected {FULL_SHARE_BASIS_POINTS}"
            )));
        }

        Ok(AllocationPlan::Weighted { shares })
    }

    /// Distributes `total` according to the session's resolved plan.
    pub fn distribute(session: &Session, total: Money) -> Result<Vec<Distribution>, CoreError> {
        match Self::resolve_plan(session)? {
            AllocationPlan::Equal { participants } => Self::equal_split(total, &participants),
            AllocationPlan::Weighted { shares } => Self::weighted_split(total, &shares),
        }
    }

    /// Equal split: integer division in minor units, remainder distributed
    /// one unit at a time to the earliest participants in roster order so
    /// the shares sum to `total` exactly.
    pub fn equal_split(total: Money, participants: &[Uuid]) -> Result<Vec<Distribution>, CoreError> {
        if participants.is_empty() {
            return Err(CoreError::NoParticipants);
        }
        let total = total.ensure_non_negative()?;

        let count = participants.len() as i64;
        let base = total.minor_units / count;
        let remainder = (total.minor_units % count) as usize;
        let percentage =
            Percentage::from_basis_points(FULL_SHARE_BASIS_POINTS / participants.len() as u32);

        Ok(participants
            .iter()
            .enumerate()
            .map(|(index, id)| {
                let extra = if index < remainder { 1 } else { 0 };
                Distribution {
                    participant_id: *id,
                    amount: Money::new(base + extra, total.currency),
                    percentage,
                }
            })
            .collect())
    }

    /// Weighted split with largest-remainder residual correction: each share
    /// starts as the truncated weighted amount, then leftover minor units go
    /// to the shares with the largest fractional truncation (roster order on
    /// ties), at most one unit per share. Any residual beyond that comes from
    /// the tolerated weight-sum drift and is absorbed by the largest share,
    /// so the shares sum to `total` exactly and no share goes negative.
    pub fn weighted_split(
        total: Money,
        shares: &[(Uuid, Percentage)],
    ) -> Result<Vec<Distribution>, CoreError> {
        if shares.is_empty() {
            return Err(CoreError::NoParticipants);
        }
        let total = total.ensure_non_negative()?;

        let divisor = FULL_SHARE_BASIS_POINTS as i128;
        let mut amounts = Vec::with_capacity(shares.len());
        let mut fractions = Vec::with_capacity(shares.len());
        for (_, pct) in shares {
            let numerator = total.minor_units as i128 * pct.basis_points() as i128;
            amounts.push(numerator.div_euclid(divisor) as i64);
            fractions.push(numerator.rem_euclid(divisor));
        }

        let assigned: i64 = amounts.iter().sum();
        let mut residual = total.minor_units - assigned;

        let mut order: Vec<usize> = (0..shares.len()).collect();
        order.sort_by(|&a, &b| fractions[b].cmp(&fractions[a]));
        // Stable sort keeps roster order for equal fractions. Weights summing
        // to exactly 100% leave a residual below the share count, so this
        // pass alone settles them.
        for &index in &order {
            if residual <= 0 {
                break;
            }
            amounts[index] += 1;
            residual -= 1;
        }
        // Whatever remains (either sign) is drift from a weight sum within
        // tolerance of 100%. The largest share absorbs it; a one-basis-point
        // drift is orders of magnitude smaller than that share.
        if residual != 0 {
            let mut largest = 0;
            for (index, amount) in amounts.iter().enumerate() {
                if *amount > amounts[largest] {
                    largest = index;
                }
            }
            amounts[largest] += residual;
        }

        Ok(shares
            .iter()
            .zip(amounts)
            .map(|((id, pct), minor_units)| Distribution {
                participant_id: *id,
                amount: Money::new(minor_units, total.currency),
                percentage: *pct,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitledger_domain::{AllocationWeight, Currency, SessionKind};

    fn eur() -> Currency {
        Currency::from_code("EUR").unwrap()
    }

    fn ids(count: usize) -> Vec<Uuid> {
        (0..count).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn equal_split_distributes_remainder_in_roster_order() {
        let participants = ids(3);
        let shares =
            AllocationService::equal_split(Money::new(100, eur()), &participants).unwrap();

        let amounts: Vec<i64> = shares.iter().map(|d| d.amount.minor_units).collect();
        assert_eq!(amounts, [34, 33, 33]);
        assert_eq!(amounts.iter().sum::<i64>(), 100);
        assert_eq!(shares[0].percentage, Percentage::from_basis_points(3333));
    }

    #[test]
    fn equal_split_requires_participants() {
        let err = AllocationService::equal_split(Money::new(100, eur()), &[]).unwrap_err();
        assert!(matches!(err, CoreError::NoParticipants));
    }

    #[test]
    fn equal_split_rejects_negative_totals() {
        let err = AllocationService::equal_split(Money::new(-100, eur()), &ids(2)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidAmount(_)));
    }

    #[test]
    fn weighted_split_with_exact_percentages() {
        let participants = ids(3);
        let shares = vec![
            (participants[0], Percentage::from_percent(50)),
            (participants[1], Percentage::from_percent(30)),
            (participants[2], Percentage::from_percent(20)),
        ];
        let result = AllocationService::weighted_split(Money::new(1000, eur()), &shares).unwrap();

        let amounts: Vec<i64> = result.iter().map(|d| d.amount.minor_units).collect();
        assert_eq!(amounts, [500, 300, 200]);
    }

    #[test]
    fn weighted_split_gives_residual_units_to_largest_fractions() {
        let participants = ids(3);
        let shares = vec![
            (participants[0], Percentage::from_basis_points(3333)),
            (participants[1], Percentage::from_basis_points(3333)),
            (participants[2], Percentage::from_basis_points(3334)),
        ];
        let result = AllocationService::weighted_split(Money::new(100, eur()), &shares).unwrap();

        let amounts: Vec<i64> = result.iter().map(|d| d.amount.minor_units).collect();
        assert_eq!(amounts, [33, 33, 34]);
        assert_eq!(amounts.iter().sum::<i64>(), 100);
    }

    #[test]
    fn weighted_split_with_overshooting_weight_sum_stays_non_negative() {
        // Sum is 10_001 basis points, inside tolerance. Over a large total
        // the truncated shares overshoot; the excess must come out of the
        // largest share only, never push a small share below zero.
        let participants = ids(3);
        let shares = vec![
            (participants[0], Percentage::from_basis_points(0)),
            (participants[1], Percentage::from_basis_points(1)),
            (participants[2], Percentage::from_basis_points(10_000)),
        ];
        let result =
            AllocationService::weighted_split(Money::new(100_000_000, eur()), &shares).unwrap();

        let amounts: Vec<i64> = result.iter().map(|d| d.amount.minor_units).collect();
        assert_eq!(amounts.iter().sum::<i64>(), 100_000_000);
        assert!(amounts.iter().all(|a| *a >= 0), "amounts = {amounts:?}");
        assert_eq!(amounts[0], 0);
        assert_eq!(amounts[1], 10_000);
        assert_eq!(amounts[2], 99_990_000);
    }

    #[test]
    fn weighted_split_with_undershooting_weight_sum_conserves_total() {
        // Sum is 9_999 basis points. The shortfall beyond one unit per share
        // lands on the largest share; the others get at most one extra unit.
        let participants = ids(3);
        let shares = vec![
            (participants[0], Percentage::from_basis_points(3_333)),
            (participants[1], Percentage::from_basis_points(3_333)),
            (participants[2], Percentage::from_basis_points(3_333)),
        ];
        let result =
            AllocationService::weighted_split(Money::new(100_000_000, eur()), &shares).unwrap();

        let amounts: Vec<i64> = result.iter().map(|d| d.amount.minor_units).collect();
        assert_eq!(amounts.iter().sum::<i64>(), 100_000_000);
        assert_eq!(amounts[1], 33_330_001);
        assert_eq!(amounts[2], 33_330_001);
        assert_eq!(amounts[0], 33_339_998);
    }

    #[test]
    fn resolve_plan_defaults_to_equal_split_over_full_roster() {
        let session = Session::new("Trip", SessionKind::OneOff, eur(), "Ana")
            .with_member("Bruno")
            .with_member("Carla");
        match AllocationService::resolve_plan(&session).unwrap() {
            AllocationPlan::Equal { participants } => assert_eq!(participants.len(), 3),
            other => panic!("expected equal plan, got {other:?}"),
        }
    }

    #[test]
    fn resolve_plan_rejects_missing_and_non_summing_weights() {
        let session = Session::new("Trip", SessionKind::OneOff, eur(), "Ana").with_member("Bruno");
        let creator_id = session.creator.id;

        let missing = session.clone().with_weights(vec![AllocationWeight {
            participant_id: creator_id,
            percentage: Percentage::from_percent(100),
        }]);
        assert!(matches!(
            AllocationService::resolve_plan(&missing),
            Err(CoreError::InvalidWeights(_))
        ));

        let member_id = session.members[0].id;
        let lopsided = session.with_weights(vec![
            AllocationWeight {
                participant_id: creator_id,
                percentage: Percentage::from_percent(80),
            },
            AllocationWeight {
                participant_id: member_id,
                percentage: Percentage::from_percent(30),
            },
        ]);
        assert!(matches!(
            AllocationService::resolve_plan(&lopsided),
            Err(CoreError::InvalidWeights(_))
        ));
    }

    #[test]
    fn distribute_uses_configured_weights() {
        let session = Session::new("Trip", SessionKind::OneOff, eur(), "Ana").with_member("Bruno");
        let creator_id = session.creator.id;
        let member_id = session.members[0].id;
        let session = session.with_weights(vec![
            AllocationWeight {
                participant_id: creator_id,
                percentage: Percentage::from_percent(75),
            },
            AllocationWeight {
                participant_id: member_id,
                percentage: Percentage::from_percent(25),
            },
        ]);

        let shares = AllocationService::distribute(&session, Money::new(400, eur())).unwrap();
        assert_eq!(shares[0].amount.minor_units, 300);
        assert_eq!(shares[1].amount.minor_units, 100);
    }
}
