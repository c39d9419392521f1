use std::collections::HashMap;

/// Balance granted the first time a user is seen.
pub const STARTING_CREDITS: u64 = 1000;

/// Per-user credit balances, keyed by identity subject id.
#[derive(Debug, Clone)]
pub struct CreditsLedger {
    balances: HashMap<String, u64>,
    starting_credits: u64,
}

impl CreditsLedger {
    pub fn new() -> Self {
        Self::with_starting_credits(STARTING_CREDITS)
    }

    pub fn with_starting_credits(starting_credits: u64) -> Self {
        Self {
            balances: HashMap::new(),
            starting_credits,
        }
    }

    /// Rebuild from persisted balances.
    pub fn from_snapshot(balances: HashMap<String, u64>, starting_credits: u64) -> Self {
        Self { balances, starting_credits }
    }

    /// Grant the starting balance to an unseen user. Returns true if a balance was created.
    pub fn initialize(&mut self, user_id: &str) -> bool {
        if self.balances.contains_key(user_id) {
            return false;
        }
        self.balances.insert(user_id.to_string(), self.starting_credits);
        true
    }

    /// Unconditional top-up.
    pub fn credit(&mut self, user_id: &str, amount: u64) {
        let balance = self.balances.entry(user_id.to_string()).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    /// Subtract `amount` if the balance covers it. Check and subtract happen
    /// under the same `&mut` borrow, so no other mutation can interleave.
    pub fn debit(&mut self, user_id: &str, amount: u64) -> bool {
        match self.balances.get_mut(user_id) {
            Some(balance) if *balance >= amount => {
                *balance -= amount;
                true
            }
            // unseen users have an implicit balance of 0
            None if amount == 0 => true,
            _ => false,
        }
    }

    /// Current balance; 0 for unseen users.
    pub fn balance_of(&self, user_id: &str) -> u64 {
        self.balances.get(user_id).copied().unwrap_or(0)
    }

    pub fn snapshot(&self) -> &HashMap<String, u64> {
        &self.balances
    }
}

impl Default for CreditsLedger {
    fn default() -> Self {
        Self::new()
    }
}
