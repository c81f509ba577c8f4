//! Line-oriented console front end for [`tiny_bank`](crate). It only collects input,
//! forwards it to a [`Session`] and prints the outcome; no ledger rules live here.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use session::{Session, SessionError};

use crate::{account::AccountCategory, registry::AccountRegistry};

pub mod session;

enum Flow {
    Continue,
    Exit,
}

pub struct Service<'w, G, R, W: 'w> {
    pub registry: &'w mut G,
    pub input: R,
    pub output: &'w mut W,
}

impl<'w, G, R, W> Service<'w, G, R, W>
where
    G: AccountRegistry,
    R: BufRead,
    W: Write + 'w,
{
    /// Runs menus until the user exits or input is exhausted.
    pub fn run(mut self) -> Result<()> {
        let mut session = Session::default();
        loop {
            let flow = if session.current().is_some() {
                self.account_menu(&mut session)?
            } else {
                self.main_menu(&mut session)?
            };
            if let Flow::Exit = flow {
                break;
            }
        }
        tracing::debug!("console session finished");
        self.output.flush().context("Failed to flush output")
    }

    fn main_menu(&mut self, session: &mut Session) -> Result<Flow> {
        writeln!(self.output)?;
        writeln!(self.output, "== Banking App ==")?;
        writeln!(self.output, "1) Create Account")?;
        writeln!(self.output, "2) Login")?;
        writeln!(self.output, "3) Exit")?;
        let Some(choice) = self.prompt("Choose")? else {
            return Ok(Flow::Exit);
        };
        match choice.trim() {
            "1" => self.create_account(session),
            "2" => self.login(session),
            "3" => Ok(Flow::Exit),
            other => {
                writeln!(self.output, "Error: Unknown option `{other}`")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn create_account(&mut self, session: &mut Session) -> Result<Flow> {
        writeln!(self.output, "1) Personal")?;
        writeln!(self.output, "2) Business")?;
        let Some(choice) = self.prompt("Account type")? else {
            return Ok(Flow::Exit);
        };
        let category = match choice.trim() {
            "1" => AccountCategory::Personal,
            "2" => AccountCategory::Business,
            other => {
                writeln!(self.output, "Error: Unknown account type `{other}`")?;
                return Ok(Flow::Continue);
            }
        };
        match session.create_account(&mut *self.registry, category) {
            Ok(credentials) => {
                writeln!(self.output, "Success: Account Created!")?;
                writeln!(self.output, "ID: {}", credentials.id)?;
                writeln!(self.output, "Passcode: {}", credentials.passcode.as_str())?;
            }
            Err(err) => writeln!(self.output, "Error: {err}")?,
        }
        Ok(Flow::Continue)
    }

    fn login(&mut self, session: &mut Session) -> Result<Flow> {
        let Some(id) = self.prompt("Account ID")? else {
            return Ok(Flow::Exit);
        };
        let Some(passcode) = self.prompt("Passcode")? else {
            return Ok(Flow::Exit);
        };
        let result = session.login(&*self.registry, &id, &passcode);
        self.report(result, |()| "Logged in".to_owned())?;
        Ok(Flow::Continue)
    }

    fn account_menu(&mut self, session: &mut Session) -> Result<Flow> {
        writeln!(self.output)?;
        writeln!(self.output, "Welcome {}", session.current().unwrap_or_default())?;
        for (key, label) in [
            ("1", "Check Balance"),
            ("2", "Deposit"),
            ("3", "Withdraw"),
            ("4", "Transfer"),
            ("5", "Mobile Top-Up"),
            ("6", "Change Passcode"),
            ("7", "Logout"),
        ] {
            writeln!(self.output, "{key}) {label}")?;
        }
        let Some(choice) = self.prompt("Choose")? else {
            return Ok(Flow::Exit);
        };

        match choice.trim() {
            "1" => {
                let result = session.balance(&*self.registry);
                self.report(result, |balance| format!("Current Balance: ${balance:.2}"))?;
            }
            "2" => {
                let Some(amount) = self.prompt("Deposit Amount")? else {
                    return Ok(Flow::Exit);
                };
                let result = session.deposit(&mut *self.registry, &amount);
                self.report(result, |_| "Deposit completed".to_owned())?;
            }
            "3" => {
                let Some(amount) = self.prompt("Withdraw Amount")? else {
                    return Ok(Flow::Exit);
                };
                let result = session.withdraw(&mut *self.registry, &amount);
                self.report(result, |_| "Withdrawal completed".to_owned())?;
            }
            "4" => {
                let Some(recipient) = self.prompt("Recipient Account ID")? else {
                    return Ok(Flow::Exit);
                };
                let Some(amount) = self.prompt("Amount")? else {
                    return Ok(Flow::Exit);
                };
                let result = session.transfer(&mut *self.registry, &recipient, &amount);
                self.report(result, |_| "Transfer completed".to_owned())?;
            }
            "5" => {
                let Some(number) = self.prompt("Mobile Number")? else {
                    return Ok(Flow::Exit);
                };
                let Some(amount) = self.prompt("Amount")? else {
                    return Ok(Flow::Exit);
                };
                let result = session.mobile_topup(&mut *self.registry, &number, &amount);
                self.report(result, |amount| format!("${amount} credited to {number}"))?;
            }
            "6" => {
                let Some(new_passcode) = self.prompt("New 4-digit Passcode")? else {
                    return Ok(Flow::Exit);
                };
                let Some(confirmation) = self.prompt("Confirm Passcode")? else {
                    return Ok(Flow::Exit);
                };
                let result =
                    session.change_passcode(&mut *self.registry, &new_passcode, &confirmation);
                self.report(result, |()| "Passcode changed successfully".to_owned())?;
            }
            "7" => {
                session.logout();
                writeln!(self.output, "Logged out")?;
            }
            other => writeln!(self.output, "Error: Unknown option `{other}`")?,
        }
        Ok(Flow::Continue)
    }

    /// Returns the entered line without its terminator, or `None` at end of input.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}: ")?;
        self.output.flush().context("Failed to flush output")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_owned()))
    }

    fn report<T>(
        &mut self,
        result: Result<T, SessionError>,
        on_success: impl FnOnce(T) -> String,
    ) -> Result<()> {
        match result {
            Ok(value) => writeln!(self.output, "Success: {}", on_success(value))?,
            Err(err) => writeln!(self.output, "Error: {err}")?,
        }
        Ok(())
    }
}
