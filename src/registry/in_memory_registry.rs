use std::{collections::HashMap, ops::RangeInclusive};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    account::{Account, AccountCategory, AccountId},
    command::{AccountCommand, Amount, InvalidInput, Passcode},
};

use super::{AccountRegistry, Credentials, LedgerError, RegistryError};

const ACCOUNT_ID_RANGE: RangeInclusive<u32> = 10_000..=99_999;
const MAX_ID_ATTEMPTS: u32 = 64;

pub struct InMemoryRegistry<R = StdRng> {
    rng: R,
    accounts: HashMap<AccountId, Account>,
}

impl Default for InMemoryRegistry<StdRng> {
    fn default() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl<R: Rng> InMemoryRegistry<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            accounts: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn generate_id(&mut self) -> Result<AccountId, RegistryError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.rng.gen_range(ACCOUNT_ID_RANGE).to_string();
            if !self.accounts.contains_key(&id) {
                return Ok(id);
            }
        }
        Err(RegistryError::IdSpaceExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }
}

impl<R: Rng> AccountRegistry for InMemoryRegistry<R> {
    fn create_account(&mut self, category: AccountCategory) -> Result<Credentials, RegistryError> {
        let id = self.generate_id()?;
        let passcode = Passcode::random(&mut self.rng);
        self.accounts.insert(
            id.clone(),
            Account::new(id.clone(), passcode.clone(), category),
        );
        tracing::info!(account_id = %id, %category, "account created");
        Ok(Credentials { id, passcode })
    }

    fn insert(&mut self, account: Account) -> Result<(), RegistryError> {
        if self.accounts.contains_key(account.id()) {
            return Err(RegistryError::DuplicateId(account.id().to_owned()));
        }
        self.accounts.insert(account.id().to_owned(), account);
        Ok(())
    }

    fn authenticate(&self, id: &str, passcode: &str) -> Result<&Account, RegistryError> {
        match self.accounts.get(id) {
            Some(account) if account.passcode_matches(passcode) => Ok(account),
            _ => {
                tracing::warn!("authentication failed");
                Err(RegistryError::AuthenticationFailed)
            }
        }
    }

    fn get(&self, id: &str) -> Result<&Account, RegistryError> {
        self.accounts
            .get(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_owned()))
    }

    fn resolve(&mut self, id: &str) -> Result<&mut Account, RegistryError> {
        self.accounts
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_owned()))
    }

    fn transfer(&mut self, from: &str, to: &str, amount: Amount) -> Result<(), LedgerError> {
        let sender = self.get(from)?;
        let recipient = self
            .accounts
            .get(to)
            .ok_or(InvalidInput::UnknownRecipient)?;

        let debit = sender.handle(AccountCommand::withdraw(amount)?)?;
        let credit = recipient.handle(AccountCommand::deposit(amount)?)?;

        // both events are valid, only now touch the balances
        self.resolve(from)?.apply(&debit);
        self.resolve(to)?.apply(&credit);
        tracing::info!(from, to, %amount, "transfer completed");
        Ok(())
    }
}
