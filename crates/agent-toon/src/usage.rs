//! Token usage accounting for the layer that issues model calls.
//!
//! A [`UsageTracker`] is constructed explicitly and shared by reference (or in
//! an `Arc`) with whatever makes requests; there is no process-wide instance.

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Token counts reported for a single completion, as found under a provider's
/// `token_usage` metadata. Absent counts are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Price per 1,000 tokens, in dollars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostRates {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

impl Default for CostRates {
    fn default() -> Self {
        Self {
            input_per_1k: 0.0005,
            output_per_1k: 0.0015,
        }
    }
}

/// Running totals since construction or the last [`UsageTracker::reset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct UsageStats {
    pub total_tokens: u64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub requests: u64,
    pub cost_estimate: f64,
}

/// Thread-safe accumulator of token usage and estimated cost.
#[derive(Debug, Default)]
pub struct UsageTracker {
    rates: CostRates,
    totals: Mutex<UsageStats>,
}

impl UsageTracker {
    pub fn new(rates: CostRates) -> Self {
        Self {
            rates,
            totals: Mutex::new(UsageStats::default()),
        }
    }

    pub fn rates(&self) -> CostRates {
        self.rates
    }

    /// Record one request's usage.
    pub fn track(&self, usage: &TokenUsage) {
        let cost = usage.prompt_tokens as f64 / 1000.0 * self.rates.input_per_1k
            + usage.completion_tokens as f64 / 1000.0 * self.rates.output_per_1k;

        let mut totals = self.lock();
        totals.prompt_tokens = totals.prompt_tokens.saturating_add(usage.prompt_tokens);
        totals.completion_tokens = totals
            .completion_tokens
            .saturating_add(usage.completion_tokens);
        totals.total_tokens = totals.total_tokens.saturating_add(usage.total_tokens);
        totals.requests = totals.requests.saturating_add(1);
        totals.cost_estimate += cost;
    }

    /// Snapshot of the totals, with the cost rounded to six decimals.
    pub fn stats(&self) -> UsageStats {
        let mut stats = *self.lock();
        stats.cost_estimate = (stats.cost_estimate * 1e6).round() / 1e6;
        stats
    }

    pub fn reset(&self) {
        *self.lock() = UsageStats::default();
    }

    // A poisoned lock still guards valid counters.
    fn lock(&self) -> MutexGuard<'_, UsageStats> {
        self.totals.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
