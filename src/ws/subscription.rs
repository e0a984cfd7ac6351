//! Per-connection subscription manager.
//!
//! Tracks which pools a WebSocket client is subscribed to and provides
//! server-side event filtering.

use std::collections::HashSet;

use crate::domain::{LedgerEvent, PoolName};

/// Wildcard pool name.
pub const WILDCARD: &str = "*";

/// Manages the set of pool subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed pool names. Ignored while `subscribe_all` is set.
    pools: HashSet<PoolName>,
    /// Whether the client subscribes to everything (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds pools to the subscription set, enabling the wildcard if asked.
    pub fn subscribe(&mut self, pools: &[PoolName], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        self.pools.extend(pools.iter().cloned());
    }

    /// Removes pools from the subscription set, dropping the wildcard if asked.
    pub fn unsubscribe(&mut self, pools: &[PoolName], wildcard: bool) {
        if wildcard {
            self.subscribe_all = false;
        }
        for pool in pools {
            self.pools.remove(pool);
        }
    }

    /// Returns `true` if the event passes the subscription filter.
    ///
    /// Events without a pool are only delivered to wildcard subscribers.
    #[must_use]
    pub fn matches(&self, event: &LedgerEvent) -> bool {
        if self.subscribe_all {
            return true;
        }
        event.pool().is_some_and(|pool| self.pools.contains(pool))
    }

    /// Returns the number of explicitly subscribed pools.
    #[must_use]
    pub fn count(&self) -> usize {
        self.pools.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::Address;

    fn name(s: &str) -> PoolName {
        let Ok(n) = PoolName::new(s) else {
            panic!("valid name");
        };
        n
    }

    fn addr(s: &str) -> Address {
        let Ok(a) = Address::parse(s) else {
            panic!("valid address");
        };
        a
    }

    fn created(pool: &str) -> LedgerEvent {
        LedgerEvent::PoolCreated {
            pool: name(pool),
            asset: addr("0xt"),
            owner: addr("0xa"),
            price_per_unit: "100".to_string(),
            timestamp: Utc::now(),
        }
    }

    fn withdrawn() -> LedgerEvent {
        LedgerEvent::Withdrawn {
            account: addr("0xa"),
            amount: "1".to_string(),
            remaining: "0".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn empty_matches_nothing() {
        let mgr = SubscriptionManager::new();
        assert!(!mgr.matches(&created("tokenPool")));
        assert!(!mgr.matches(&withdrawn()));
    }

    #[test]
    fn subscribe_specific_pool() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[name("tokenPool")], false);
        assert!(mgr.matches(&created("tokenPool")));
        assert!(!mgr.matches(&created("other")));
    }

    #[test]
    fn withdrawals_need_wildcard() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[name("tokenPool")], false);
        assert!(!mgr.matches(&withdrawn()));

        mgr.subscribe(&[], true);
        assert!(mgr.matches(&withdrawn()));
        assert!(mgr.matches(&created("anything")));
    }

    #[test]
    fn unsubscribe_removes_pool_and_wildcard() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[name("tokenPool")], true);
        mgr.unsubscribe(&[name("tokenPool")], true);
        assert!(!mgr.is_subscribed_all());
        assert_eq!(mgr.count(), 0);
        assert!(!mgr.matches(&created("tokenPool")));
    }
}
