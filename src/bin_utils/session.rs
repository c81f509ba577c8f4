use std::str::FromStr;

use thiserror::Error;

use crate::{
    account::{Account, AccountCategory, AccountId},
    command::{Amount, InvalidInput},
    registry::{AccountRegistry, Credentials, LedgerError},
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Enter a valid number")]
    InvalidNumber(String),
    #[error("No account is logged in")]
    NotLoggedIn,
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl From<InvalidInput> for SessionError {
    fn from(err: InvalidInput) -> Self {
        Self::Ledger(err.into())
    }
}

/// Who is logged in. Every operation receives the registry explicitly, so the
/// session itself holds nothing but the current account id.
#[derive(Debug, Default)]
pub struct Session {
    current: Option<AccountId>,
}

impl Session {
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn create_account<G: AccountRegistry>(
        &mut self,
        registry: &mut G,
        category: AccountCategory,
    ) -> Result<Credentials, SessionError> {
        self.current = None;
        Ok(registry.create_account(category).map_err(LedgerError::from)?)
    }

    pub fn login<G: AccountRegistry>(
        &mut self,
        registry: &G,
        id: &str,
        passcode: &str,
    ) -> Result<(), SessionError> {
        self.current = None;
        let account = registry
            .authenticate(id, passcode)
            .map_err(LedgerError::from)?;
        self.current = Some(account.id().to_owned());
        Ok(())
    }

    pub fn logout(&mut self) {
        self.current = None;
    }

    pub fn balance<G: AccountRegistry>(&self, registry: &G) -> Result<Amount, SessionError> {
        let id = self.logged_in()?;
        Ok(registry.get(id).map_err(LedgerError::from)?.balance())
    }

    pub fn deposit<G: AccountRegistry>(
        &self,
        registry: &mut G,
        amount: &str,
    ) -> Result<Amount, SessionError> {
        let id = self.logged_in()?;
        let amount = parse_amount(amount)?;
        resolve(registry, id)?
            .deposit(amount)
            .map_err(LedgerError::from)?;
        Ok(amount)
    }

    pub fn withdraw<G: AccountRegistry>(
        &self,
        registry: &mut G,
        amount: &str,
    ) -> Result<Amount, SessionError> {
        let id = self.logged_in()?;
        let amount = parse_amount(amount)?;
        resolve(registry, id)?
            .withdraw(amount)
            .map_err(LedgerError::from)?;
        Ok(amount)
    }

    pub fn transfer<G: AccountRegistry>(
        &self,
        registry: &mut G,
        recipient: &str,
        amount: &str,
    ) -> Result<Amount, SessionError> {
        let id = self.logged_in()?;
        let amount = parse_amount(amount)?;
        registry.transfer(id, recipient, amount)?;
        Ok(amount)
    }

    pub fn mobile_topup<G: AccountRegistry>(
        &self,
        registry: &mut G,
        phone_number: &str,
        amount: &str,
    ) -> Result<Amount, SessionError> {
        let id = self.logged_in()?;
        let amount = parse_amount(amount)?;
        resolve(registry, id)?
            .mobile_topup(amount, phone_number)
            .map_err(LedgerError::from)?;
        Ok(amount)
    }

    /// `confirmation` has to repeat `new_passcode` exactly.
    pub fn change_passcode<G: AccountRegistry>(
        &self,
        registry: &mut G,
        new_passcode: &str,
        confirmation: &str,
    ) -> Result<(), SessionError> {
        let id = self.logged_in()?;
        if new_passcode != confirmation {
            return Err(InvalidInput::PasscodeMismatch.into());
        }
        resolve(registry, id)?
            .change_passcode(new_passcode)
            .map_err(LedgerError::from)?;
        Ok(())
    }

    fn logged_in(&self) -> Result<&str, SessionError> {
        self.current.as_deref().ok_or(SessionError::NotLoggedIn)
    }
}

fn resolve<'r, G: AccountRegistry>(
    registry: &'r mut G,
    id: &str,
) -> Result<&'r mut Account, SessionError> {
    Ok(registry.resolve(id).map_err(LedgerError::from)?)
}

fn parse_amount(input: &str) -> Result<Amount, SessionError> {
    let input = input.trim();
    Amount::from_str(input).map_err(|_| SessionError::InvalidNumber(input.to_owned()))
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use rust_decimal::{Decimal, prelude::FromPrimitive};

    use crate::{
        account::AccountError,
        command::Passcode,
        registry::{RegistryError, in_memory_registry::InMemoryRegistry},
    };

    use super::*;

    fn amount(value: u32) -> Amount {
        Decimal::from_u32(value).unwrap()
    }

    fn registry() -> InMemoryRegistry<StdRng> {
        let mut registry = InMemoryRegistry::with_rng(StdRng::seed_from_u64(3));
        for (id, passcode, category, balance) in [
            ("11111", "1234", AccountCategory::Personal, 1000),
            ("22222", "5678", AccountCategory::Business, 500),
        ] {
            registry
                .insert(Account::with_balance(
                    id.to_owned(),
                    Passcode::parse(passcode).unwrap(),
                    category,
                    amount(balance),
                ))
                .unwrap();
        }
        registry
    }

    fn logged_in(registry: &InMemoryRegistry<StdRng>) -> Session {
        let mut session = Session::default();
        session.login(registry, "11111", "1234").unwrap();
        session
    }

    #[test]
    fn login_and_logout() {
        let registry = registry();
        let mut session = Session::default();
        assert!(session.current().is_none());

        session.login(&registry, "11111", "1234").unwrap();
        assert_eq!(session.current(), Some("11111"));

        // a failed attempt drops the previous login
        let err = session.login(&registry, "22222", "1234").unwrap_err();
        assert!(matches!(
            err,
            SessionError::Ledger(LedgerError::RegistryErr(RegistryError::AuthenticationFailed))
        ));
        assert!(session.current().is_none());

        session.login(&registry, "22222", "5678").unwrap();
        session.logout();
        assert!(session.current().is_none());
    }

    #[test]
    fn operations_require_login() {
        let mut registry = registry();
        let session = Session::default();
        assert!(matches!(
            session.deposit(&mut registry, "10"),
            Err(SessionError::NotLoggedIn)
        ));
        assert!(matches!(
            session.balance(&registry),
            Err(SessionError::NotLoggedIn)
        ));
    }

    #[test]
    fn create_account_returns_credentials() {
        let mut registry = registry();
        let mut session = Session::default();
        let credentials = session
            .create_account(&mut registry, AccountCategory::Personal)
            .unwrap();
        session
            .login(&registry, &credentials.id, credentials.passcode.as_str())
            .unwrap();
        assert_eq!(session.balance(&registry).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn deposit_processing() {
        let mut registry = registry();
        let session = logged_in(&registry);

        assert_eq!(session.deposit(&mut registry, "500").unwrap(), amount(500));
        assert_eq!(session.balance(&registry).unwrap(), amount(1500));

        let err = session.deposit(&mut registry, "-100").unwrap_err();
        assert!(matches!(
            err,
            SessionError::Ledger(LedgerError::AccountErr(AccountError::InvalidInput(
                InvalidInput::NonPositiveAmount
            )))
        ));

        let err = session.deposit(&mut registry, "abc").unwrap_err();
        assert!(matches!(err, SessionError::InvalidNumber(ref text) if text == "abc"));
        assert_eq!(session.balance(&registry).unwrap(), amount(1500));
    }

    #[test]
    fn withdraw_processing() {
        let mut registry = registry();
        let session = logged_in(&registry);

        session.withdraw(&mut registry, " 500 ").unwrap();
        assert_eq!(session.balance(&registry).unwrap(), amount(500));

        let err = session.withdraw(&mut registry, "1500").unwrap_err();
        assert!(matches!(
            err,
            SessionError::Ledger(LedgerError::AccountErr(AccountError::InsufficientFunds))
        ));
        assert!(session.withdraw(&mut registry, "-100").is_err());
        assert_eq!(session.balance(&registry).unwrap(), amount(500));
    }

    #[test]
    fn transfer_processing() {
        let mut registry = registry();
        let session = logged_in(&registry);

        session.transfer(&mut registry, "22222", "300").unwrap();
        assert_eq!(registry.get("11111").unwrap().balance(), amount(700));
        assert_eq!(registry.get("22222").unwrap().balance(), amount(800));

        let err = session.transfer(&mut registry, "99999", "100").unwrap_err();
        assert_eq!(err.to_string(), "Recipient account not found");
        assert_eq!(registry.get("11111").unwrap().balance(), amount(700));
        assert_eq!(registry.get("22222").unwrap().balance(), amount(800));
    }

    #[test]
    fn mobile_topup_processing() {
        let mut registry = registry();
        let session = logged_in(&registry);

        session
            .mobile_topup(&mut registry, "77123456", "100")
            .unwrap();
        assert_eq!(session.balance(&registry).unwrap(), amount(900));

        let err = session
            .mobile_topup(&mut registry, "12345678", "100")
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid mobile number");
        assert_eq!(session.balance(&registry).unwrap(), amount(900));
    }

    #[test]
    fn passcode_change_processing() {
        let mut registry = registry();
        let mut session = logged_in(&registry);

        session
            .change_passcode(&mut registry, "4321", "4321")
            .unwrap();

        let err = session
            .change_passcode(&mut registry, "4321", "1234")
            .unwrap_err();
        assert_eq!(err.to_string(), "Passcodes don't match");

        let err = session
            .change_passcode(&mut registry, "12", "12")
            .unwrap_err();
        assert_eq!(err.to_string(), "Passcode must be 4 digits");

        session.logout();
        assert!(session.login(&registry, "11111", "1234").is_err());
        session.login(&registry, "11111", "4321").unwrap();
    }
}
