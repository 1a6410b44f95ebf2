use std::collections::HashMap;
use std::sync::Arc;

use merkle_tree::Address;
use parking_lot::Mutex;
use primitive_types::U256;

/// External fungible-token ledger the distributor signals on a successful
/// claim. Returns `false` when the transfer cannot be performed; the
/// distributor treats that as a failed claim and rolls the mark back.
pub trait TokenTransfer {
    fn transfer(&self, to: Address, amount: U256) -> bool;
}

impl<T: TokenTransfer + ?Sized> TokenTransfer for Arc<T> {
    fn transfer(&self, to: Address, amount: U256) -> bool {
        (**self).transfer(to, amount)
    }
}

#[derive(Debug)]
struct TokenBook {
    treasury: U256,
    balances: HashMap<Address, U256>,
}

/// Reference in-memory ledger for tests and simulation. Transfers draw
/// from a single treasury balance funded at construction.
#[derive(Debug)]
pub struct InMemoryToken {
    book: Mutex<TokenBook>,
}

impl InMemoryToken {
    pub fn new(treasury: U256) -> Self {
        Self {
            book: Mutex::new(TokenBook {
                treasury,
                balances: HashMap::new(),
            }),
        }
    }

    pub fn balance_of(&self, account: &Address) -> U256 {
        self.book
            .lock()
            .balances
            .get(account)
            .copied()
            .unwrap_or_default()
    }

    pub fn treasury(&self) -> U256 {
        self.book.lock().treasury
    }
}

impl TokenTransfer for InMemoryToken {
    fn transfer(&self, to: Address, amount: U256) -> bool {
        let mut book = self.book.lock();
        let Some(remaining) = book.treasury.checked_sub(amount) else {
            return false;
        };
        let balance = book.balances.get(&to).copied().unwrap_or_default();
        let Some(credited) = balance.checked_add(amount) else {
            return false;
        };
        book.treasury = remaining;
        book.balances.insert(to, credited);
        true
    }
}
