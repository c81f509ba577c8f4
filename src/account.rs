use std::fmt;

use rust_decimal::{Decimal, prelude::Zero};
use thiserror::Error;

use crate::command::{AccountCommand, Amount, InvalidInput, Passcode, PhoneNumber};

pub type AccountId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountCategory {
    Personal,
    Business,
}

impl fmt::Display for AccountCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountCategory::Personal => f.write_str("Personal"),
            AccountCategory::Business => f.write_str("Business"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountEvent {
    Deposited { amount: Amount },
    Withdrawn { amount: Amount },
    MobileToppedUp { amount: Amount, phone: PhoneNumber },
    PasscodeChanged { passcode: Passcode },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    #[error("Insufficient funds")]
    InsufficientFunds,
    #[error("Balance limit exceeded")]
    BalanceOverflow,
}

#[derive(Debug)]
pub struct Account {
    id: AccountId,
    passcode: Passcode,
    category: AccountCategory,
    balance: Amount,
}

impl Account {
    pub fn new(id: AccountId, passcode: Passcode, category: AccountCategory) -> Self {
        Self::with_balance(id, passcode, category, Decimal::zero())
    }

    /// Opens an account with funds already on it. A negative seed is clamped to zero.
    pub fn with_balance(
        id: AccountId,
        passcode: Passcode,
        category: AccountCategory,
        balance: Amount,
    ) -> Self {
        Self {
            id,
            passcode,
            category,
            balance: balance.max(Decimal::zero()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category(&self) -> AccountCategory {
        self.category
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn passcode_matches(&self, candidate: &str) -> bool {
        self.passcode.matches(candidate)
    }

    /// Validates `command` against the current state without touching it.
    pub fn handle(&self, command: AccountCommand) -> Result<AccountEvent, AccountError> {
        match command {
            AccountCommand::Deposit { amount } => {
                self.balance
                    .checked_add(amount)
                    .ok_or(AccountError::BalanceOverflow)?;
                Ok(AccountEvent::Deposited { amount })
            }
            AccountCommand::Withdraw { amount } => {
                self.ensure_funds(amount)?;
                Ok(AccountEvent::Withdrawn { amount })
            }
            AccountCommand::MobileTopUp { amount, phone } => {
                self.ensure_funds(amount)?;
                Ok(AccountEvent::MobileToppedUp { amount, phone })
            }
            AccountCommand::ChangePasscode { passcode } => {
                Ok(AccountEvent::PasscodeChanged { passcode })
            }
        }
    }

    /// Events are produced by [`Account::handle`], so no validation happens here.
    pub fn apply(&mut self, event: &AccountEvent) {
        match event {
            AccountEvent::Deposited { amount } => {
                self.balance += *amount;
            }
            AccountEvent::Withdrawn { amount } | AccountEvent::MobileToppedUp { amount, .. } => {
                self.balance -= *amount;
            }
            AccountEvent::PasscodeChanged { passcode } => {
                self.passcode = passcode.clone();
            }
        }
        tracing::debug!(account_id = %self.id, ?event, balance = %self.balance, "applied");
    }

    pub fn execute(&mut self, command: AccountCommand) -> Result<AccountEvent, AccountError> {
        let event = self.handle(command)?;
        self.apply(&event);
        Ok(event)
    }

    pub fn deposit(&mut self, amount: Amount) -> Result<(), AccountError> {
        self.execute(AccountCommand::deposit(amount)?)?;
        Ok(())
    }

    pub fn withdraw(&mut self, amount: Amount) -> Result<(), AccountError> {
        self.execute(AccountCommand::withdraw(amount)?)?;
        Ok(())
    }

    /// Moves `amount` to `recipient`. Both sides are validated before either is applied.
    pub fn transfer(
        &mut self,
        amount: Amount,
        recipient: &mut Account,
    ) -> Result<(), AccountError> {
        let debit = self.handle(AccountCommand::withdraw(amount)?)?;
        let credit = recipient.handle(AccountCommand::deposit(amount)?)?;
        self.apply(&debit);
        recipient.apply(&credit);
        Ok(())
    }

    /// Debits the account for a carrier top-up. The carrier side is not modelled.
    pub fn mobile_topup(
        &mut self,
        amount: Amount,
        phone_number: &str,
    ) -> Result<(), AccountError> {
        self.execute(AccountCommand::mobile_topup(amount, phone_number)?)?;
        Ok(())
    }

    pub fn change_passcode(&mut self, new_passcode: &str) -> Result<(), AccountError> {
        self.execute(AccountCommand::change_passcode(new_passcode)?)?;
        Ok(())
    }

    fn ensure_funds(&self, amount: Amount) -> Result<(), AccountError> {
        if amount <= self.balance {
            Ok(())
        } else {
            Err(AccountError::InsufficientFunds)
        }
    }
}
