//! Coin balance and home hit points.

/// Non-negative coin balance.
///
/// The ledger never rejects a debit; callers check affordability first and a
/// debit that exceeds the balance leaves it at zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Ledger {
    balance: f64,
}

impl Ledger {
    pub(crate) const fn new(balance: f64) -> Self {
        Self { balance }
    }

    pub(crate) const fn balance(&self) -> f64 {
        self.balance
    }

    pub(crate) fn credit(&mut self, amount: f64) {
        if amount.is_finite() {
            self.balance = (self.balance + amount).max(0.0);
        }
    }

    pub(crate) fn debit(&mut self, amount: f64) {
        if amount.is_finite() {
            self.balance = (self.balance - amount).max(0.0);
        }
    }
}

/// Hit points of the tile enemies are trying to reach.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Home {
    hp: f32,
}

impl Home {
    pub(crate) const fn new(hp: f32) -> Self {
        Self { hp }
    }

    pub(crate) const fn hp(&self) -> f32 {
        self.hp
    }

    pub(crate) fn take_damage(&mut self, amount: f32) {
        self.hp = (self.hp - amount).max(0.0);
    }

    pub(crate) fn is_destroyed(&self) -> bool {
        self.hp <= 0.0
    }
}
