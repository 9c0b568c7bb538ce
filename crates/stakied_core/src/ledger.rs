//! Fungible balance ledger
//!
//! Mapping-based balance store shared by SY, PT, YT and LP shares.
//! Invariant: the balances sum to `total_supply`. Zero balances are pruned,
//! so a holder with nothing simply has no entry.

use crate::error::{StakiedError, StakiedResult};
use crate::math::add;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(deserialize = "K: Ord + Deserialize<'de>"))]
pub struct BalanceLedger<K> {
    balances: BTreeMap<K, u64>,
    total_supply: u64,
}

impl<K> Default for BalanceLedger<K> {
    fn default() -> Self {
        Self {
            balances: BTreeMap::new(),
            total_supply: 0,
        }
    }
}

impl<K: Ord + Clone> BalanceLedger<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, owner: &K) -> u64 {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    /// Number of holders with a non-zero balance
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    /// Sum of all balances, computed independently of the supply counter
    pub fn sum_of_balances(&self) -> u128 {
        self.balances.values().map(|v| u128::from(*v)).sum()
    }

    /// Credit `amount` new units to `to`
    pub fn mint(&mut self, to: &K, amount: u64) -> StakiedResult<()> {
        if amount == 0 {
            return Err(StakiedError::InvalidAmount);
        }
        let supply = add(self.total_supply, amount)?;
        let balance = add(self.balance_of(to), amount)?;

        self.total_supply = supply;
        self.balances.insert(to.clone(), balance);
        Ok(())
    }

    /// Destroy `amount` units held by `from`
    pub fn burn(&mut self, from: &K, amount: u64) -> StakiedResult<()> {
        if amount == 0 {
            return Err(StakiedError::InvalidAmount);
        }
        let balance = self.balance_of(from);
        if balance < amount {
            return Err(StakiedError::InsufficientBalance);
        }

        // supply >= balance >= amount
        self.total_supply -= amount;
        self.set_balance(from, balance - amount);
        Ok(())
    }

    /// Move `amount` units between holders; supply is unchanged
    pub fn transfer(&mut self, from: &K, to: &K, amount: u64) -> StakiedResult<()> {
        if amount == 0 {
            return Err(StakiedError::InvalidAmount);
        }
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(StakiedError::InsufficientBalance);
        }
        if from == to {
            return Ok(());
        }
        let to_balance = add(self.balance_of(to), amount)?;

        self.set_balance(from, from_balance - amount);
        self.balances.insert(to.clone(), to_balance);
        Ok(())
    }

    fn set_balance(&mut self, owner: &K, balance: u64) {
        if balance == 0 {
            self.balances.remove(owner);
        } else {
            self.balances.insert(owner.clone(), balance);
        }
    }
}
