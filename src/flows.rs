//! One function per user action
//!
//! The web views and the terminal commands are thin shells around these:
//! they collect input, call a flow, and render what comes back. Every flow
//! issues at most the requests listed in its doc and nothing when the local
//! checks fail.

use crate::api::{BonusApi, Transport};
use crate::error::ClientError;
use crate::forms::{AdminTarget, LoginForm, LoginOutcome, NewAccount, PasswordChange, TransferOrder};
use crate::payload::*;
use crate::session::{SessionKey, SessionStore};

/// Where the client goes after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Login,
    Balance,
    Admin,
}

/// Balance view state, always as fetched from the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub balance: f64,
    pub grade: Option<String>,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransferReceipt {
    pub recipient: String,
    pub amount: f64,
    /// Result of the re-fetch that follows a settled transfer
    pub refreshed: Result<Dashboard, ClientError>,
}

impl TransferReceipt {
    pub fn summary(&self) -> String {
        format!(
            "Successfully transferred {} bonus points to {}.",
            self.amount, self.recipient
        )
    }
}

fn current_session(store: &impl SessionStore) -> Result<SessionKey, ClientError> {
    store.load().ok_or(ClientError::NoSession)
}

/// The backend refusing the token means it is no longer worth keeping.
fn forget_if_unauthorized(store: &impl SessionStore, err: ClientError) -> ClientError {
    if err.is_unauthorized() {
        log::warn!("Session rejected by backend, clearing it");
        store.clear();
    }
    err
}

/// Validates `form`; the reserved admin pair goes to the dashboard without a
/// request, anything else is sent to `/login` and the returned key is stored.
pub async fn login<T: Transport>(
    api: &BonusApi<T>,
    store: &impl SessionStore,
    form: &LoginForm,
) -> Result<Destination, ClientError> {
    let (username, password) = match form.validate()? {
        LoginOutcome::Admin => {
            log::info!("Admin credentials entered, opening dashboard");
            return Ok(Destination::Admin);
        }
        LoginOutcome::Credentials { username, password } => (username, password),
    };

    let response = api
        .login(&LoginRequest {
            username: username.clone(),
            password,
        })
        .await?;
    let key = SessionKey::new(response.key)
        .ok_or_else(|| ClientError::Decode("login returned an empty key".to_string()))?;
    store.save(&key)?;
    log::info!("Logged in as {}", username);
    Ok(Destination::Balance)
}

/// Checks a stored token with `/validate-session`; a refused token is cleared.
/// Without a stored token nothing is sent.
pub async fn resume_session<T: Transport>(
    api: &BonusApi<T>,
    store: &impl SessionStore,
) -> Result<Option<Destination>, ClientError> {
    let Some(key) = store.load() else {
        return Ok(None);
    };
    let response = api
        .validate_session(&ValidateSessionRequest {
            key: key.as_str().to_string(),
        })
        .await?;
    if response.is_valid {
        Ok(Some(Destination::Balance))
    } else {
        log::info!("Stored session is no longer valid");
        store.clear();
        Ok(None)
    }
}

pub async fn register<T: Transport>(
    api: &BonusApi<T>,
    account: &NewAccount,
) -> Result<(), ClientError> {
    api.register(&RegisterRequest {
        display_name: account.display_name.clone(),
        username: account.username.clone(),
        password: account.password.clone(),
        phone_number: account.phone_number.clone(),
    })
    .await?;
    log::info!("Registered {}", account.username);
    Ok(())
}

/// `/users/balance` then `/users/messages`.
pub async fn load_dashboard<T: Transport>(
    api: &BonusApi<T>,
    store: &impl SessionStore,
) -> Result<Dashboard, ClientError> {
    let key = current_session(store)?;
    let request = SessionRequest {
        key: key.as_str().to_string(),
    };
    let balance = api
        .balance(&request)
        .await
        .map_err(|e| forget_if_unauthorized(store, e))?;
    let messages = api
        .messages(&request)
        .await
        .map_err(|e| forget_if_unauthorized(store, e))?;
    Ok(Dashboard {
        balance: balance.account_balance,
        grade: balance.grade,
        messages: messages.messages,
    })
}

/// Settles `order` and re-fetches the dashboard. The receipt never carries a
/// balance computed on the client.
pub async fn send_transfer<T: Transport>(
    api: &BonusApi<T>,
    store: &impl SessionStore,
    order: &TransferOrder,
) -> Result<TransferReceipt, ClientError> {
    let key = current_session(store)?;
    api.transfer_balance(&TransferRequest {
        sender_key: key.as_str().to_string(),
        recipient_username: order.recipient().to_string(),
        amount: order.amount(),
    })
    .await
    .map_err(|e| forget_if_unauthorized(store, e))?;
    log::info!("Transferred {} to {}", order.amount(), order.recipient());

    let refreshed = load_dashboard(api, store).await;
    if let Err(e) = &refreshed {
        log::error!("Balance refresh after transfer failed: {}", e);
    }
    Ok(TransferReceipt {
        recipient: order.recipient().to_string(),
        amount: order.amount(),
        refreshed,
    })
}

pub async fn load_profile<T: Transport>(
    api: &BonusApi<T>,
    store: &impl SessionStore,
) -> Result<Profile, ClientError> {
    let key = current_session(store)?;
    api.user_data(&UserDataRequest {
        session_key: key.as_str().to_string(),
    })
    .await
    .map_err(|e| forget_if_unauthorized(store, e))
}

/// Returns the backend's confirmation text.
pub async fn change_password<T: Transport>(
    api: &BonusApi<T>,
    username: &str,
    change: &PasswordChange,
) -> Result<String, ClientError> {
    let notice = api
        .update_password(&UpdatePasswordRequest {
            username: username.to_string(),
            current_password: change.current.clone(),
            new_password: change.new.clone(),
        })
        .await?;
    Ok(notice
        .message
        .unwrap_or_else(|| "Password updated successfully.".to_string()))
}

pub fn logout(store: &impl SessionStore) -> Destination {
    store.clear();
    log::info!("Logged out");
    Destination::Login
}

pub async fn admin_view_balance<T: Transport>(
    api: &BonusApi<T>,
    target: &AdminTarget,
) -> Result<BalanceResponse, ClientError> {
    api.admin_view_balance(&AdminViewBalanceRequest {
        master_key: target.master_key.clone(),
        username: target.username.clone(),
        phone_number: target.phone_number.clone(),
    })
    .await
}

/// Returns the account's balance after the adjustment.
pub async fn admin_update_balance<T: Transport>(
    api: &BonusApi<T>,
    target: &AdminTarget,
    amount: f64,
    action: BalanceAction,
) -> Result<f64, ClientError> {
    let response = api
        .admin_update_balance(&AdminUpdateBalanceRequest {
            master_key: target.master_key.clone(),
            username: target.username.clone(),
            phone_number: target.phone_number.clone(),
            amount,
            action,
        })
        .await?;
    log::info!("Balance {} by {}", action.as_str(), amount);
    Ok(response.account_balance)
}

/// Returns the grade the backend recorded.
pub async fn admin_update_grade<T: Transport>(
    api: &BonusApi<T>,
    target: &AdminTarget,
    grade: &str,
) -> Result<String, ClientError> {
    let response = api
        .admin_update_grade(&AdminUpdateGradeRequest {
            master_key: target.master_key.clone(),
            username: target.username.clone(),
            phone_number: target.phone_number.clone(),
            grade: grade.to_string(),
        })
        .await?;
    Ok(response.account.grade)
}

pub async fn admin_force_password<T: Transport>(
    api: &BonusApi<T>,
    target: &AdminTarget,
    new_password: &str,
) -> Result<String, ClientError> {
    let notice = api
        .admin_update_password(&AdminUpdatePasswordRequest {
            master_key: target.master_key.clone(),
            username: target.username.clone(),
            new_password: new_password.to_string(),
        })
        .await?;
    Ok(notice
        .message
        .unwrap_or_else(|| "Password updated successfully.".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::{AdminTargetForm, PasswordChangeForm, TransferForm};
    use crate::session::MemoryStore;
    use crate::testing::FakeTransport;
    use serde_json::json;

    fn rejected(status: u16, message: &str) -> ClientError {
        ClientError::Rejected {
            status,
            message: Some(message.to_string()),
        }
    }

    #[tokio::test]
    async fn test_admin_pair_never_touches_network() {
        let api = BonusApi::new(FakeTransport::new());
        let store = MemoryStore::new();
        let form = LoginForm {
            username: "admin".to_string(),
            password: "admin".to_string(),
        };
        assert_eq!(login(&api, &store, &form).await, Ok(Destination::Admin));
        assert!(api.transport().calls().is_empty());
        assert_eq!(store.load(), None);
    }

    #[tokio::test]
    async fn test_login_stores_key() {
        let api = BonusApi::new(FakeTransport::new().reply("/login", json!({"key": "abc"})));
        let store = MemoryStore::new();
        let form = LoginForm {
            username: "alice".to_string(),
            password: "pw".to_string(),
        };
        assert_eq!(login(&api, &store, &form).await, Ok(Destination::Balance));
        assert_eq!(store.load().unwrap().as_str(), "abc");
    }

    #[tokio::test]
    async fn test_login_failure_surfaces_server_text() {
        let api = BonusApi::new(
            FakeTransport::new().fail("/login", rejected(401, "Invalid username or password")),
        );
        let store = MemoryStore::new();
        let form = LoginForm {
            username: "alice".to_string(),
            password: "wrong".to_string(),
        };
        let err = login(&api, &store, &form).await.unwrap_err();
        assert_eq!(
            err.user_message("Login failed. Please try again."),
            "Invalid username or password"
        );
        assert_eq!(store.load(), None);
    }

    #[tokio::test]
    async fn test_resume_without_token_sends_nothing() {
        let api = BonusApi::new(FakeTransport::new());
        let store = MemoryStore::new();
        assert_eq!(resume_session(&api, &store).await, Ok(None));
        assert!(api.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn test_resume_clears_invalid_token() {
        let api = BonusApi::new(
            FakeTransport::new().reply("/validate-session", json!({"isValid": false})),
        );
        let store = MemoryStore::with_key("stale");
        assert_eq!(resume_session(&api, &store).await, Ok(None));
        assert_eq!(store.load(), None);
        assert_eq!(
            api.transport().calls()[0].1,
            json!({"key": "stale"})
        );
    }

    #[tokio::test]
    async fn test_resume_valid_token() {
        let api = BonusApi::new(
            FakeTransport::new().reply("/validate-session", json!({"isValid": true})),
        );
        let store = MemoryStore::with_key("fresh");
        assert_eq!(
            resume_session(&api, &store).await,
            Ok(Some(Destination::Balance))
        );
        assert!(store.load().is_some());
    }

    #[tokio::test]
    async fn test_dashboard_without_session_sends_nothing() {
        let api = BonusApi::new(FakeTransport::new());
        let store = MemoryStore::new();
        assert_eq!(
            load_dashboard(&api, &store).await,
            Err(ClientError::NoSession)
        );
        assert!(api.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn test_profile_without_session_sends_nothing() {
        let api = BonusApi::new(FakeTransport::new());
        let store = MemoryStore::new();
        assert_eq!(load_profile(&api, &store).await, Err(ClientError::NoSession));
        assert!(api.transport().calls().is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_fetches_balance_then_messages() {
        let api = BonusApi::new(
            FakeTransport::new()
                .reply("/users/balance", json!({"accountBalance": 120, "grade": "Silver"}))
                .reply(
                    "/users/messages",
                    json!({"messages": [{"_id": "m1", "content": "Welcome", "date": "2024-01-01T10:00:00Z"}]}),
                ),
        );
        let store = MemoryStore::with_key("k");
        let dashboard = load_dashboard(&api, &store).await.unwrap();
        assert_eq!(dashboard.balance, 120.0);
        assert_eq!(dashboard.grade.as_deref(), Some("Silver"));
        assert_eq!(dashboard.messages.len(), 1);
        assert_eq!(
            api.transport().calls(),
            vec![
                ("/users/balance".to_string(), json!({"key": "k"})),
                ("/users/messages".to_string(), json!({"key": "k"})),
            ]
        );
    }

    #[tokio::test]
    async fn test_unauthorized_dashboard_clears_session() {
        let api = BonusApi::new(
            FakeTransport::new().fail("/users/balance", rejected(401, "Invalid session")),
        );
        let store = MemoryStore::with_key("expired");
        assert!(load_dashboard(&api, &store).await.is_err());
        assert_eq!(store.load(), None);
    }

    #[tokio::test]
    async fn test_transfer_balance_comes_from_fresh_fetch() {
        let api = BonusApi::new(
            FakeTransport::new()
                .reply("/users/transfer-balance", json!({"accountBalance": 999}))
                .reply("/users/balance", json!({"accountBalance": 75, "grade": "Gold"}))
                .reply("/users/messages", json!({"messages": []})),
        );
        let store = MemoryStore::with_key("sender");
        let order = TransferForm {
            recipient: "bob".to_string(),
            amount: "25".to_string(),
        }
        .validate()
        .unwrap();

        let receipt = send_transfer(&api, &store, &order).await.unwrap();
        assert_eq!(receipt.refreshed.as_ref().unwrap().balance, 75.0);
        assert_eq!(
            receipt.summary(),
            "Successfully transferred 25 bonus points to bob."
        );
        assert_eq!(
            api.transport().paths(),
            vec!["/users/transfer-balance", "/users/balance", "/users/messages"]
        );
        assert_eq!(
            api.transport().calls()[0].1,
            json!({"senderKey": "sender", "recipientUsername": "bob", "amount": 25.0})
        );
    }

    #[tokio::test]
    async fn test_failed_transfer_does_not_refresh() {
        let api = BonusApi::new(
            FakeTransport::new().fail("/users/transfer-balance", rejected(400, "Insufficient balance")),
        );
        let store = MemoryStore::with_key("sender");
        let order = TransferForm {
            recipient: "bob".to_string(),
            amount: "1000".to_string(),
        }
        .validate()
        .unwrap();
        let err = send_transfer(&api, &store, &order).await.unwrap_err();
        assert_eq!(err.user_message("Transfer failed."), "Insufficient balance");
        assert_eq!(api.transport().paths(), vec!["/users/transfer-balance"]);
        // a 400 is not an auth failure
        assert!(store.load().is_some());
    }

    #[test]
    fn test_logout_always_clears() {
        let store = MemoryStore::with_key("k");
        assert_eq!(logout(&store), Destination::Login);
        assert_eq!(store.load(), None);
        // already logged out
        assert_eq!(logout(&store), Destination::Login);
    }

    #[tokio::test]
    async fn test_change_password_uses_profile_username() {
        let api = BonusApi::new(
            FakeTransport::new().reply("/users/update-password", json!({"message": "Password changed"})),
        );
        let change = PasswordChangeForm {
            current: "old-password".to_string(),
            new: "new-password".to_string(),
            confirm: "new-password".to_string(),
        }
        .validate()
        .unwrap();
        let message = change_password(&api, "alice", &change).await.unwrap();
        assert_eq!(message, "Password changed");
        assert_eq!(
            api.transport().calls()[0].1,
            json!({"username": "alice", "currentPassword": "old-password", "newPassword": "new-password"})
        );
    }

    #[tokio::test]
    async fn test_register_posts_account() {
        let api = BonusApi::new(FakeTransport::new().reply("/users", json!({"message": "created"})));
        let account = NewAccount {
            display_name: "Alice".to_string(),
            username: "alice".to_string(),
            password: "pw".to_string(),
            phone_number: "0600000000".to_string(),
        };
        register(&api, &account).await.unwrap();
        assert_eq!(
            api.transport().calls()[0].1,
            json!({"displayName": "Alice", "username": "alice", "password": "pw", "phoneNumber": "0600000000"})
        );
    }

    #[tokio::test]
    async fn test_admin_actions() {
        let api = BonusApi::new(
            FakeTransport::new()
                .reply("/users/view-balance", json!({"accountBalance": 10, "grade": "Bronze"}))
                .reply("/users/update-balance", json!({"accountBalance": 15}))
                .reply("/users/update-grade", json!({"account": {"grade": "Gold"}}))
                .reply("/users/admin/update-password", json!({"message": "done"})),
        );
        let target = AdminTargetForm {
            master_key: "mk".to_string(),
            username: "bob".to_string(),
            phone_number: String::new(),
        }
        .validate()
        .unwrap();

        let standing = admin_view_balance(&api, &target).await.unwrap();
        assert_eq!(standing.account_balance, 10.0);
        let balance = admin_update_balance(&api, &target, 5.0, BalanceAction::Add)
            .await
            .unwrap();
        assert_eq!(balance, 15.0);
        let grade = admin_update_grade(&api, &target, "Gold").await.unwrap();
        assert_eq!(grade, "Gold");
        let message = admin_force_password(&api, &target, "password1").await.unwrap();
        assert_eq!(message, "done");

        assert_eq!(
            api.transport().calls()[1].1,
            json!({"masterKey": "mk", "username": "bob", "phoneNumber": "", "amount": 5.0, "action": "add"})
        );
    }
}
