use std::collections::HashMap;

use credits::{regenerate, BalanceOracle, CreditLedger};
use proptest::prelude::*;
use rc_storage::{MemoryStore, ObjectSpace, ObjectStore, WriteBatch};

const REGEN_MS: u64 = 432_000_000;

struct Balances(HashMap<String, u64>);

impl BalanceOracle for Balances {
    fn balance_of(&self, account: &str) -> u64 {
        self.0.get(account).copied().unwrap_or(0)
    }
}

#[test]
fn test_spend_wait_spend() {
    let mut store = MemoryStore::new();
    let balances = Balances(HashMap::from([("carol".to_string(), 1_000)]));
    let space = ObjectSpace::system("resources", 2);

    let mut batch = WriteBatch::new();
    CreditLedger::new(&store, &balances, &space, REGEN_MS)
        .consume(&mut batch, "carol", 1_000, 0)
        .unwrap();
    store.commit(batch).unwrap();

    // A tenth of the window restores a tenth of the balance
    let ledger = CreditLedger::new(&store, &balances, &space, REGEN_MS);
    assert_eq!(ledger.get_rc("carol", REGEN_MS / 10).unwrap(), 100);

    let mut batch = WriteBatch::new();
    assert!(ledger.consume(&mut batch, "carol", 101, REGEN_MS / 10).is_err());
    let credit = ledger.consume(&mut batch, "carol", 100, REGEN_MS / 10).unwrap();
    assert_eq!(credit.mana, 0);
    assert_eq!(batch.len(), 1);
}

proptest! {
    #[test]
    fn property_mana_bounded_by_balance(
        balance in any::<u64>(),
        spent in any::<u64>(),
        elapsed in 0u64..(REGEN_MS * 4),
    ) {
        let mana = balance - spent.min(balance);
        let regenerated = regenerate(balance, mana, 0, elapsed, REGEN_MS).unwrap();
        prop_assert!(regenerated <= balance);
        prop_assert!(regenerated >= mana);
    }

    #[test]
    fn property_regeneration_is_monotonic_in_time(
        balance in 1u64..u64::MAX,
        mana_fraction in 0u64..=100,
        t1 in 0u64..REGEN_MS,
        t2 in 0u64..REGEN_MS,
    ) {
        let mana = (u128::from(balance) * u128::from(mana_fraction) / 100) as u64;
        let (early, late) = (t1.min(t2), t1.max(t2));
        let a = regenerate(balance, mana, 0, early, REGEN_MS).unwrap();
        let b = regenerate(balance, mana, 0, late, REGEN_MS).unwrap();
        prop_assert!(a <= b);
    }

    #[test]
    fn property_full_window_refills(balance in any::<u64>(), mana_fraction in 0u64..=100) {
        let mana = (u128::from(balance) * u128::from(mana_fraction) / 100) as u64;
        prop_assert_eq!(regenerate(balance, mana, 0, REGEN_MS, REGEN_MS).unwrap(), balance);
    }

    #[test]
    fn property_get_rc_does_not_write(balance in any::<u64>(), now in any::<u64>()) {
        let store = MemoryStore::new();
        let balances = Balances(HashMap::from([("dave".to_string(), balance)]));
        let space = ObjectSpace::system("resources", 2);
        let ledger = CreditLedger::new(&store, &balances, &space, REGEN_MS);

        prop_assert_eq!(ledger.get_rc("dave", now).unwrap(), balance);
        prop_assert_eq!(ledger.get_rc("dave", now).unwrap(), balance);
        prop_assert!(store.is_empty());
    }
}
