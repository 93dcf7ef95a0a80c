//! Property tests for the allocation and settlement invariants.

use proptest::prelude::*;
use uuid::Uuid;

use splitledger_core::{AllocationService, SettlementService};
use splitledger_domain::{
    Balance, Currency, Money, Percentage, FULL_SHARE_BASIS_POINTS,
};

fn eur() -> Currency {
    Currency::from_code("EUR").unwrap()
}

fn participant_ids(count: usize) -> Vec<Uuid> {
    (0..count).map(|_| Uuid::new_v4()).collect()
}

/// Scales raw weights to basis points summing to exactly 100%.
fn weights_from_raw(ids: &[Uuid], raw: &[u32]) -> Vec<(Uuid, Percentage)> {
    let sum: u64 = raw.iter().map(|w| *w as u64).sum();
    let mut assigned = 0u32;
    ids.iter()
        .zip(raw)
        .enumerate()
        .map(|(index, (id, weight))| {
            let bp = if index == raw.len() - 1 {
                FULL_SHARE_BASIS_POINTS - assigned
            } else {
                (*weight as u64 * FULL_SHARE_BASIS_POINTS as u64 / sum) as u32
            };
            assigned += bp;
            (*id, Percentage::from_basis_points(bp))
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    /// Conservation: equal split shares always sum to the input total, and
    /// no two shares differ by more than one minor unit.
    #[test]
    fn equal_split_conserves_total(
        total in 0i64..1_000_000_000,
        count in 1usize..12,
    ) {
        let ids = participant_ids(count);
        let shares = AllocationService::equal_split(Money::new(total, eur()), &ids).unwrap();

        let sum: i64 = shares.iter().map(|d| d.amount.minor_units).sum();
        prop_assert_eq!(sum, total);

        let min = shares.iter().map(|d| d.amount.minor_units).min().unwrap();
        let max = shares.iter().map(|d| d.amount.minor_units).max().unwrap();
        prop_assert!(max - min <= 1);
    }

    /// Conservation: weighted split shares sum to the input total exactly
    /// for any weight vector summing to 100%.
    #[test]
    fn weighted_split_conserves_total(
        total in 0i64..1_000_000_000,
        raw in prop::collection::vec(1u32..10_000, 1..12),
    ) {
        let ids = participant_ids(raw.len());
        let weights = weights_from_raw(&ids, &raw);
        let shares =
            AllocationService::weighted_split(Money::new(total, eur()), &weights).unwrap();

        let sum: i64 = shares.iter().map(|d| d.amount.minor_units).sum();
        prop_assert_eq!(sum, total);
    }

    /// Settlement: applying the transfers to the initial balances zeroes
    /// every participant's net, with at most `participants - 1` transfers.
    #[test]
    fn settlement_zeroes_all_balances_within_transfer_bound(
        total in 1i64..1_000_000,
        count in 2usize..10,
        payer_seed in 0usize..10,
    ) {
        let ids = participant_ids(count);
        let shares = AllocationService::equal_split(Money::new(total, eur()), &ids).unwrap();

        // One participant fronted the whole pool.
        let payer = ids[payer_seed % count];
        let balances: Vec<Balance> = shares
            .iter()
            .map(|dist| Balance {
                participant_id: dist.participant_id,
                paid: if dist.participant_id == payer {
                    Money::new(total, eur())
                } else {
                    Money::zero(eur())
                },
                owed: dist.amount,
            })
            .collect();

        let transfers = SettlementService::settle(&balances).unwrap();
        prop_assert!(transfers.len() <= count - 1);

        let mut nets: std::collections::HashMap<Uuid, i64> = balances
            .iter()
            .map(|b| (b.participant_id, b.net_minor_units()))
            .collect();
        for transfer in &transfers {
            prop_assert!(transfer.amount.minor_units > 0);
            *nets.get_mut(&transfer.from).unwrap() += transfer.amount.minor_units;
            *nets.get_mut(&transfer.to).unwrap() -= transfer.amount.minor_units;
        }
        for net in nets.values() {
            prop_assert_eq!(*net, 0);
        }
    }
}
