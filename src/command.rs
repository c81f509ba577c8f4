use std::fmt;

use rand::Rng;
use rust_decimal::{Decimal, prelude::Zero};
use thiserror::Error;

pub type Amount = Decimal;

const PASSCODE_LEN: usize = 4;
const GENERATED_PASSCODE_MIN: u32 = 1_000;
const GENERATED_PASSCODE_MAX: u32 = 9_999;
const PHONE_NUMBER_LEN: usize = 8;
const PHONE_NUMBER_PREFIXES: [&str; 2] = ["17", "77"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,
    #[error("Passcode must be 4 digits")]
    MalformedPasscode,
    #[error("Invalid mobile number")]
    MalformedPhoneNumber,
    #[error("Passcodes don't match")]
    PasscodeMismatch,
    #[error("Recipient account not found")]
    UnknownRecipient,
}

/// Four ASCII digits. `Debug` is redacted so the value never ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Passcode(String);

impl Passcode {
    pub fn parse(input: &str) -> Result<Self, InvalidInput> {
        if input.len() == PASSCODE_LEN && all_digits(input) {
            Ok(Self(input.to_owned()))
        } else {
            Err(InvalidInput::MalformedPasscode)
        }
    }

    /// Draws a passcode without a leading zero.
    pub(crate) fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(
            rng.gen_range(GENERATED_PASSCODE_MIN..=GENERATED_PASSCODE_MAX)
                .to_string(),
        )
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Passcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passcode(****)")
    }
}

/// Local mobile number: eight digits starting with a known carrier prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(input: &str) -> Result<Self, InvalidInput> {
        let valid = input.len() == PHONE_NUMBER_LEN
            && all_digits(input)
            && PHONE_NUMBER_PREFIXES
                .iter()
                .any(|prefix| input.starts_with(prefix));
        if valid {
            Ok(Self(input.to_owned()))
        } else {
            Err(InvalidInput::MalformedPhoneNumber)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A request against a single account whose arguments are already well-formed.
/// Whether it can be carried out is decided by [`crate::account::Account::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountCommand {
    Deposit { amount: Amount },
    Withdraw { amount: Amount },
    MobileTopUp { amount: Amount, phone: PhoneNumber },
    ChangePasscode { passcode: Passcode },
}

impl AccountCommand {
    pub fn deposit(amount: Amount) -> Result<Self, InvalidInput> {
        Ok(Self::Deposit {
            amount: positive(amount)?,
        })
    }

    pub fn withdraw(amount: Amount) -> Result<Self, InvalidInput> {
        Ok(Self::Withdraw {
            amount: positive(amount)?,
        })
    }

    /// The number is checked before the amount.
    pub fn mobile_topup(amount: Amount, phone_number: &str) -> Result<Self, InvalidInput> {
        let phone = PhoneNumber::parse(phone_number)?;
        Ok(Self::MobileTopUp {
            amount: positive(amount)?,
            phone,
        })
    }

    pub fn change_passcode(new_passcode: &str) -> Result<Self, InvalidInput> {
        Ok(Self::ChangePasscode {
            passcode: Passcode::parse(new_passcode)?,
        })
    }
}

fn positive(amount: Amount) -> Result<Amount, InvalidInput> {
    if amount > Decimal::zero() {
        Ok(amount)
    } else {
        Err(InvalidInput::NonPositiveAmount)
    }
}

fn all_digits(input: &str) -> bool {
    input.bytes().all(|b| b.is_ascii_digit())
}
