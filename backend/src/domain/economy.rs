//! Economy rules and the lazy accrual function.
//!
//! Income is never generated by a timer. Each authenticated access computes
//! how many whole ticks have elapsed since the stored accrual timestamp and
//! credits them, advancing the timestamp by exactly those ticks so the
//! sub-tick remainder carries forward.

use chrono::{DateTime, TimeDelta, Utc};

/// Fixed parameters of the in-game economy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EconomyRules {
    /// Length of one accrual tick.
    pub tick: TimeDelta,
    /// Currency granted per elapsed tick.
    pub income_per_tick: i64,
    /// Price of one pull.
    pub pull_cost: i64,
    /// Currency credited when one copy of a card is sold.
    pub sale_price: i64,
    /// Balance granted to newly created accounts.
    pub starting_balance: i64,
    /// Number of pull records returned by history listings.
    pub history_limit: usize,
}

impl Default for EconomyRules {
    fn default() -> Self {
        Self {
            tick: TimeDelta::minutes(5),
            income_per_tick: 10,
            pull_cost: 5,
            sale_price: 1,
            starting_balance: 20,
            history_limit: 80,
        }
    }
}

/// Outcome of settling a player's pending income.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accrual {
    pub ticks: i64,
    pub balance: i64,
    pub last_accrual_at: DateTime<Utc>,
}

impl Accrual {
    /// Whether the settlement changes stored state.
    pub fn is_noop(&self) -> bool {
        self.ticks == 0
    }
}

/// Settle income for the interval `last_accrual_at..now`.
///
/// Clock skew (a `now` earlier than `last_accrual_at`) yields zero ticks.
/// Balance arithmetic saturates rather than wrapping.
pub fn accrue(
    rules: &EconomyRules,
    balance: i64,
    last_accrual_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Accrual {
    let tick_ms = rules.tick.num_milliseconds();
    let elapsed_ms = (now - last_accrual_at).num_milliseconds();
    if tick_ms <= 0 || elapsed_ms < tick_ms {
        return Accrual {
            ticks: 0,
            balance,
            last_accrual_at,
        };
    }

    let ticks = elapsed_ms / tick_ms;
    let credited = ticks.saturating_mul(rules.income_per_tick);
    // ticks * tick_ms <= elapsed_ms, so the result never passes `now`.
    let advanced = last_accrual_at + TimeDelta::milliseconds(ticks * tick_ms);

    Accrual {
        ticks,
        balance: balance.saturating_add(credited),
        last_accrual_at: advanced,
    }
}
