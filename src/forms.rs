//! Local checks run before any request leaves the client
//!
//! Each form holds the raw text the user typed and validates into a value
//! type. The flows only accept those validated values, so an invalid form
//! cannot reach the network.

use crate::config::{ADMIN_PASSWORD, ADMIN_USERNAME, MIN_PASSWORD_LEN};
use crate::error::ClientError;

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Positive, finite number typed in an amount field.
fn parse_amount(raw: &str) -> Option<f64> {
    let amount = raw.trim().parse::<f64>().ok()?;
    (amount.is_finite() && amount > 0.0).then_some(amount)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// The reserved pair; goes straight to the admin dashboard.
    Admin,
    Credentials { username: String, password: String },
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginOutcome, ClientError> {
        if blank(&self.username) || self.password.is_empty() {
            return Err(ClientError::validation(
                "Username and password are required.",
            ));
        }
        if self.username.trim() == ADMIN_USERNAME && self.password == ADMIN_PASSWORD {
            return Ok(LoginOutcome::Admin);
        }
        Ok(LoginOutcome::Credentials {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub display_name: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub display_name: String,
    pub username: String,
    pub password: String,
    pub phone_number: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<NewAccount, ClientError> {
        if blank(&self.username) || self.password.is_empty() || blank(&self.phone_number) {
            return Err(ClientError::validation(
                "Username, password, and phone number are required.",
            ));
        }
        if self.password != self.confirm_password {
            return Err(ClientError::validation("Passwords do not match."));
        }
        Ok(NewAccount {
            display_name: self.display_name.trim().to_string(),
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            phone_number: self.phone_number.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferForm {
    /// Username or phone number of the recipient
    pub recipient: String,
    pub amount: String,
}

/// A transfer that passed local checks and may be shown for confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferOrder {
    recipient: String,
    amount: f64,
}

impl TransferOrder {
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }
}

impl TransferForm {
    pub fn validate(&self) -> Result<TransferOrder, ClientError> {
        let recipient = self.recipient.trim();
        if recipient.is_empty() {
            return Err(ClientError::validation(
                "Enter a recipient username or phone number.",
            ));
        }
        let amount = parse_amount(&self.amount)
            .ok_or_else(|| ClientError::validation("Enter a positive amount."))?;
        Ok(TransferOrder {
            recipient: recipient.to_string(),
            amount,
        })
    }

    /// Fills the recipient from a scanned QR payload; blank payloads are ignored.
    #[cfg_attr(not(feature = "web"), allow(dead_code))]
    pub fn apply_scan(&mut self, payload: &str) -> bool {
        let payload = payload.trim();
        if payload.is_empty() {
            return false;
        }
        self.recipient = payload.to_string();
        true
    }
}

/// A validated value shown for confirmation; [`send`](Confirmation::send)
/// hands it out once until the request settles.
#[cfg_attr(not(feature = "web"), allow(dead_code))]
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation<T> {
    staged: Option<T>,
    sending: bool,
}

impl<T> Default for Confirmation<T> {
    fn default() -> Self {
        Confirmation {
            staged: None,
            sending: false,
        }
    }
}

#[cfg_attr(not(feature = "web"), allow(dead_code))]
impl<T: Clone> Confirmation<T> {
    pub fn stage(&mut self, value: T) {
        if !self.sending {
            self.staged = Some(value);
        }
    }

    pub fn staged(&self) -> Option<&T> {
        self.staged.as_ref()
    }

    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Ignored while a request is in flight.
    pub fn cancel(&mut self) {
        if !self.sending {
            self.staged = None;
        }
    }

    /// `None` when nothing is staged or the value was already sent.
    pub fn send(&mut self) -> Option<T> {
        if self.sending {
            return None;
        }
        let value = self.staged.clone()?;
        self.sending = true;
        Some(value)
    }

    pub fn settle(&mut self) {
        self.sending = false;
        self.staged = None;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PasswordChangeForm {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PasswordChange {
    pub current: String,
    pub new: String,
}

impl PasswordChangeForm {
    pub fn validate(&self) -> Result<PasswordChange, ClientError> {
        if self.current.is_empty() || self.new.is_empty() || self.confirm.is_empty() {
            return Err(ClientError::validation("All fields are required."));
        }
        if self.new.chars().count() < MIN_PASSWORD_LEN {
            return Err(ClientError::validation(format!(
                "New password must be at least {} characters long.",
                MIN_PASSWORD_LEN
            )));
        }
        if self.new != self.confirm {
            return Err(ClientError::validation("New passwords do not match."));
        }
        Ok(PasswordChange {
            current: self.current.clone(),
            new: self.new.clone(),
        })
    }
}

/// Fields shared by every admin action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminTargetForm {
    pub master_key: String,
    pub username: String,
    pub phone_number: String,
}

/// Account an admin action applies to: a master key plus a username or phone number.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminTarget {
    pub master_key: String,
    pub username: String,
    pub phone_number: String,
}

const ALL_FIELDS_REQUIRED: &str = "All fields are required.";

impl AdminTargetForm {
    fn has_account(&self) -> bool {
        !blank(&self.username) || !blank(&self.phone_number)
    }

    fn target(&self) -> AdminTarget {
        AdminTarget {
            master_key: self.master_key.trim().to_string(),
            username: self.username.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<AdminTarget, ClientError> {
        if blank(&self.master_key) || !self.has_account() {
            return Err(ClientError::validation(
                "Master key and username/phone number are required.",
            ));
        }
        Ok(self.target())
    }

    pub fn validate_balance_update(&self, amount: &str) -> Result<(AdminTarget, f64), ClientError> {
        if blank(&self.master_key) || !self.has_account() {
            return Err(ClientError::validation(ALL_FIELDS_REQUIRED));
        }
        if blank(amount) {
            return Err(ClientError::validation(ALL_FIELDS_REQUIRED));
        }
        // zero and negative values go through; the action picks the direction
        let amount = amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|a| a.is_finite())
            .ok_or_else(|| ClientError::validation("Amount must be a number."))?;
        Ok((self.target(), amount))
    }

    pub fn validate_grade_update(&self, grade: &str) -> Result<(AdminTarget, String), ClientError> {
        if blank(&self.master_key) || !self.has_account() || blank(grade) {
            return Err(ClientError::validation(ALL_FIELDS_REQUIRED));
        }
        Ok((self.target(), grade.trim().to_string()))
    }

    /// Forced password resets are addressed by username only.
    pub fn validate_password_reset(
        &self,
        new_password: &str,
    ) -> Result<(AdminTarget, String), ClientError> {
        if blank(&self.master_key) || blank(&self.username) || new_password.is_empty() {
            return Err(ClientError::validation(ALL_FIELDS_REQUIRED));
        }
        Ok((self.target(), new_password.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(err: ClientError) -> String {
        err.user_message("")
    }

    #[test]
    fn test_admin_pair_is_recognised() {
        let form = LoginForm {
            username: "admin".to_string(),
            password: "admin".to_string(),
        };
        assert_eq!(form.validate().unwrap(), LoginOutcome::Admin);

        let form = LoginForm {
            username: "admin".to_string(),
            password: "Admin".to_string(),
        };
        assert!(matches!(
            form.validate().unwrap(),
            LoginOutcome::Credentials { .. }
        ));
    }

    #[test]
    fn test_login_requires_both_fields() {
        let form = LoginForm {
            username: "alice".to_string(),
            password: String::new(),
        };
        assert!(matches!(form.validate(), Err(ClientError::Validation(_))));
    }

    #[test]
    fn test_register_checks() {
        let mut form = RegisterForm {
            display_name: String::new(),
            username: "alice".to_string(),
            password: "pw".to_string(),
            confirm_password: "pw".to_string(),
            phone_number: String::new(),
        };
        assert_eq!(
            msg(form.validate().unwrap_err()),
            "Username, password, and phone number are required."
        );

        form.phone_number = "0600000000".to_string();
        form.confirm_password = "other".to_string();
        assert_eq!(msg(form.validate().unwrap_err()), "Passwords do not match.");

        form.confirm_password = "pw".to_string();
        let account = form.validate().unwrap();
        assert_eq!(account.display_name, "");
        assert_eq!(account.phone_number, "0600000000");
    }

    #[test]
    fn test_transfer_rejects_empty_recipient() {
        let form = TransferForm {
            recipient: "   ".to_string(),
            amount: "10".to_string(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_transfer_rejects_non_numeric_amount() {
        for amount in ["", "ten", "NaN", "inf", "-5", "0"] {
            let form = TransferForm {
                recipient: "bob".to_string(),
                amount: amount.to_string(),
            };
            assert!(form.validate().is_err(), "accepted amount {:?}", amount);
        }
    }

    #[test]
    fn test_transfer_order() {
        let form = TransferForm {
            recipient: " bob ".to_string(),
            amount: "12.5".to_string(),
        };
        let order = form.validate().unwrap();
        assert_eq!(order.recipient(), "bob");
        assert_eq!(order.amount(), 12.5);
    }

    #[test]
    fn test_scan_populates_recipient() {
        let mut form = TransferForm::default();
        assert!(!form.apply_scan("  "));
        assert_eq!(form.recipient, "");
        assert!(form.apply_scan("carol\n"));
        assert_eq!(form.recipient, "carol");
    }

    #[test]
    fn test_password_change_rules() {
        let mut form = PasswordChangeForm {
            current: "old-password".to_string(),
            new: "short".to_string(),
            confirm: "short".to_string(),
        };
        assert_eq!(
            msg(form.validate().unwrap_err()),
            "New password must be at least 8 characters long."
        );

        form.new = "long-enough".to_string();
        form.confirm = "long-enougH".to_string();
        assert_eq!(msg(form.validate().unwrap_err()), "New passwords do not match.");

        form.confirm = "long-enough".to_string();
        assert_eq!(form.validate().unwrap().new, "long-enough");
    }

    #[test]
    fn test_password_length_counts_characters() {
        let form = PasswordChangeForm {
            current: "x".to_string(),
            new: "éééééé".to_string(),
            confirm: "éééééé".to_string(),
        };
        // twelve bytes, six characters
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_admin_target_needs_key_and_account() {
        let mut form = AdminTargetForm {
            master_key: "mk".to_string(),
            ..Default::default()
        };
        assert_eq!(
            msg(form.validate().unwrap_err()),
            "Master key and username/phone number are required."
        );
        form.phone_number = "0600000000".to_string();
        assert_eq!(form.validate().unwrap().username, "");
    }

    #[test]
    fn test_admin_balance_update_needs_amount() {
        let form = AdminTargetForm {
            master_key: "mk".to_string(),
            username: "bob".to_string(),
            phone_number: String::new(),
        };
        assert_eq!(
            msg(form.validate_balance_update("  ").unwrap_err()),
            "All fields are required."
        );
        assert_eq!(
            msg(form.validate_balance_update("abc").unwrap_err()),
            "Amount must be a number."
        );
        let (_, amount) = form.validate_balance_update("5").unwrap();
        assert_eq!(amount, 5.0);
    }

    #[test]
    fn test_admin_balance_update_accepts_zero_and_negative() {
        let form = AdminTargetForm {
            master_key: "mk".to_string(),
            username: "bob".to_string(),
            phone_number: String::new(),
        };
        assert_eq!(form.validate_balance_update("0").unwrap().1, 0.0);
        assert_eq!(form.validate_balance_update("-5").unwrap().1, -5.0);
        assert!(form.validate_balance_update("inf").is_err());
    }

    #[test]
    fn test_admin_grade_update_needs_grade() {
        let form = AdminTargetForm {
            master_key: "mk".to_string(),
            username: "bob".to_string(),
            phone_number: String::new(),
        };
        assert_eq!(
            msg(form.validate_grade_update("").unwrap_err()),
            "All fields are required."
        );
        assert_eq!(form.validate_grade_update(" Gold ").unwrap().1, "Gold");
    }

    #[test]
    fn test_admin_pair_with_padding_opens_dashboard() {
        let form = LoginForm {
            username: "admin ".to_string(),
            password: "admin".to_string(),
        };
        assert_eq!(form.validate().unwrap(), LoginOutcome::Admin);
    }

    #[test]
    fn test_admin_password_reset_needs_username() {
        let form = AdminTargetForm {
            master_key: "mk".to_string(),
            username: String::new(),
            phone_number: "0600000000".to_string(),
        };
        assert!(form.validate_password_reset("new-password").is_err());
        assert!(form.validate_grade_update("Gold").is_ok());
    }

    #[test]
    fn test_confirmation_sends_once() {
        let order = TransferForm {
            recipient: "bob".to_string(),
            amount: "5".to_string(),
        }
        .validate()
        .unwrap();
        let mut confirmation = Confirmation::default();
        assert_eq!(confirmation.send(), None);

        confirmation.stage(order.clone());
        assert_eq!(confirmation.send(), Some(order.clone()));
        // a second click before the reply arrives
        assert_eq!(confirmation.send(), None);
        confirmation.cancel();
        assert_eq!(confirmation.staged(), Some(&order));
        assert!(confirmation.is_sending());

        confirmation.settle();
        assert_eq!(confirmation.staged(), None);
        assert_eq!(confirmation.send(), None);
    }
}
