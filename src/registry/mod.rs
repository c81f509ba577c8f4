use thiserror::Error;

use crate::{
    account::{Account, AccountCategory, AccountError, AccountId},
    command::{Amount, InvalidInput, Passcode},
};

pub mod in_memory_registry;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Invalid credentials")]
    AuthenticationFailed,
    #[error("Account `{0}` not found")]
    NotFound(AccountId),
    #[error("Account `{0}` already exists")]
    DuplicateId(AccountId),
    #[error("No free account id found after {attempts} attempts")]
    IdSpaceExhausted { attempts: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error(transparent)]
    AccountErr(#[from] AccountError),
    #[error(transparent)]
    RegistryErr(#[from] RegistryError),
}

impl From<InvalidInput> for LedgerError {
    fn from(err: InvalidInput) -> Self {
        Self::AccountErr(err.into())
    }
}

/// What a freshly opened account is handed back with. The passcode is shown
/// to the user once and never again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub id: AccountId,
    pub passcode: Passcode,
}

pub trait AccountRegistry {
    /// Opens an empty account under a freshly generated id and passcode.
    fn create_account(&mut self, category: AccountCategory) -> Result<Credentials, RegistryError>;

    /// Adds an already built account, e.g. one seeded with funds.
    fn insert(&mut self, account: Account) -> Result<(), RegistryError>;

    /// Unknown ids and wrong passcodes are reported identically.
    fn authenticate(&self, id: &str, passcode: &str) -> Result<&Account, RegistryError>;

    fn get(&self, id: &str) -> Result<&Account, RegistryError>;

    fn resolve(&mut self, id: &str) -> Result<&mut Account, RegistryError>;

    /// Moves funds between two registered accounts. A missing recipient is
    /// an input error and leaves both balances untouched.
    fn transfer(&mut self, from: &str, to: &str, amount: Amount) -> Result<(), LedgerError>;
}
