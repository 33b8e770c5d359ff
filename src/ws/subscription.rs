//! Per-connection subscription manager.
//!
//! Tracks which token symbols a WebSocket client wants and provides
//! server-side event filtering. New connections start with the wildcard
//! active, so clients receive the full stream until they narrow it.

use std::collections::HashSet;

/// Manages the token subscriptions for a single WebSocket connection.
#[derive(Debug)]
pub struct SubscriptionManager {
    /// Subscribed token symbols, uppercase. Ignored while the wildcard
    /// is active.
    tokens: HashSet<String>,
    /// Whether the client receives events for all tokens.
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a manager with the wildcard active.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tokens: HashSet::new(),
            subscribe_all: true,
        }
    }

    /// Adds token symbols to the subscription set. `"*"` re-enables the
    /// wildcard; any explicit token disables it.
    pub fn subscribe(&mut self, tokens: &[String], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
            return;
        }
        if !tokens.is_empty() {
            self.subscribe_all = false;
        }
        for token in tokens {
            self.tokens.insert(token.to_uppercase());
        }
    }

    /// Removes token symbols from the subscription set. Removing `"*"`
    /// clears the wildcard.
    pub fn unsubscribe(&mut self, tokens: &[String], wildcard: bool) {
        if wildcard {
            self.subscribe_all = false;
        }
        for token in tokens {
            self.tokens.remove(&token.to_uppercase());
        }
    }

    /// Returns `true` if events for `token` match the filter.
    #[must_use]
    pub fn matches(&self, token: &str) -> bool {
        self.subscribe_all || self.tokens.contains(&token.to_uppercase())
    }

    /// Returns the number of explicitly subscribed tokens.
    #[must_use]
    pub fn count(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_connections_receive_everything() {
        let mgr = SubscriptionManager::new();
        assert!(mgr.is_subscribed_all());
        assert!(mgr.matches("QUBIC"));
        assert!(mgr.matches("CFB"));
    }

    #[test]
    fn explicit_subscription_narrows_the_stream() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&["cfb".to_string()], false);
        assert!(!mgr.is_subscribed_all());
        assert!(mgr.matches("CFB"));
        assert!(mgr.matches("cfb"));
        assert!(!mgr.matches("QUBIC"));
    }

    #[test]
    fn wildcard_subscription_restores_everything() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&["CFB".to_string()], false);
        mgr.subscribe(&[], true);
        assert!(mgr.matches("QMINE"));
    }

    #[test]
    fn unsubscribe_removes_tokens() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&["CFB".to_string(), "QMINE".to_string()], false);
        assert_eq!(mgr.count(), 2);
        mgr.unsubscribe(&["cfb".to_string()], false);
        assert!(!mgr.matches("CFB"));
        assert!(mgr.matches("QMINE"));
    }

    #[test]
    fn unsubscribing_the_wildcard_silences_the_stream() {
        let mut mgr = SubscriptionManager::new();
        mgr.unsubscribe(&[], true);
        assert!(!mgr.matches("QUBIC"));
        assert_eq!(mgr.count(), 0);
    }
}
