//! Request and response bodies exchanged with the bonus points backend.
//!
//! Field names follow the backend's camelCase JSON. Responses ignore fields
//! the client does not read.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LoginResponse {
    pub key: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ValidateSessionRequest {
    pub key: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidateSessionResponse {
    #[serde(default)]
    pub is_valid: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub display_name: String,
    pub username: String,
    pub password: String,
    pub phone_number: String,
}

/// Body of every call that is scoped by the caller's session.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SessionRequest {
    pub key: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub account_balance: f64,
    #[serde(default)]
    pub grade: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct MessagesResponse {
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Notification issued by the backend, displayed read-only.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub content: String,
    /// Kept as the backend sent it; numbers and other JSON values are stringified.
    #[serde(default, deserialize_with = "lenient_date")]
    pub date: String,
}

fn lenient_date<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(date) => date,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

impl Message {
    /// Date and time in the viewer's local zone, e.g. "Oct 5, 2023 at 3:04 PM".
    pub fn when(&self) -> String {
        self.when_in(&chrono::Local)
    }

    pub fn when_in<Tz: chrono::TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        let parsed = chrono::DateTime::parse_from_rfc3339(&self.date)
            .map(|date| date.with_timezone(tz))
            .ok()
            .or_else(|| {
                // epoch milliseconds
                let millis = self.date.parse::<i64>().ok()?;
                Some(chrono::DateTime::from_timestamp_millis(millis)?.with_timezone(tz))
            });
        match parsed {
            Some(date) => date.format("%b %-d, %Y at %-I:%M %p").to_string(),
            None => self.date.clone(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub sender_key: String,
    pub recipient_username: String,
    pub amount: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserDataRequest {
    pub session_key: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub display_name: String,
    pub username: String,
    #[serde(default)]
    pub phone_number: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub username: String,
    pub current_password: String,
    pub new_password: String,
}

/// Human-readable confirmation returned by the password endpoints.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Notice {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminViewBalanceRequest {
    pub master_key: String,
    pub username: String,
    pub phone_number: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BalanceAction {
    #[default]
    Add,
    Subtract,
}

impl BalanceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceAction::Add => "add",
            BalanceAction::Subtract => "subtract",
        }
    }
}

impl std::str::FromStr for BalanceAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" | "+" => Ok(BalanceAction::Add),
            "subtract" | "-" => Ok(BalanceAction::Subtract),
            other => Err(format!("unknown balance action '{}'", other)),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateBalanceRequest {
    pub master_key: String,
    pub username: String,
    pub phone_number: String,
    pub amount: f64,
    pub action: BalanceAction,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateBalanceResponse {
    pub account_balance: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateGradeRequest {
    pub master_key: String,
    pub username: String,
    pub phone_number: String,
    pub grade: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AdminUpdateGradeResponse {
    pub account: GradedAccount,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct GradedAccount {
    pub grade: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdatePasswordRequest {
    pub master_key: String,
    pub username: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transfer_request_uses_backend_field_names() {
        let body = serde_json::to_value(TransferRequest {
            sender_key: "k1".to_string(),
            recipient_username: "bob".to_string(),
            amount: 12.5,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"senderKey": "k1", "recipientUsername": "bob", "amount": 12.5})
        );
    }

    #[test]
    fn test_balance_action_serializes_lowercase() {
        let body = serde_json::to_value(AdminUpdateBalanceRequest {
            master_key: "m".to_string(),
            username: "alice".to_string(),
            phone_number: String::new(),
            amount: 3.0,
            action: BalanceAction::Subtract,
        })
        .unwrap();
        assert_eq!(body["action"], "subtract");
        assert_eq!(body["masterKey"], "m");
        assert_eq!(body["phoneNumber"], "");
    }

    #[test]
    fn test_balance_action_parsing() {
        assert_eq!("Add".parse::<BalanceAction>(), Ok(BalanceAction::Add));
        assert_eq!("-".parse::<BalanceAction>(), Ok(BalanceAction::Subtract));
        assert!("double".parse::<BalanceAction>().is_err());
    }

    #[test]
    fn test_balance_response_without_grade() {
        let resp: BalanceResponse =
            serde_json::from_value(json!({"accountBalance": 40, "extra": true})).unwrap();
        assert_eq!(resp.account_balance, 40.0);
        assert_eq!(resp.grade, None);
    }

    #[test]
    fn test_messages_default_to_empty() {
        let resp: MessagesResponse = serde_json::from_value(json!({})).unwrap();
        assert!(resp.messages.is_empty());
    }

    #[test]
    fn test_message_date_formatting() {
        let message = Message {
            id: None,
            content: "You received 10 points".to_string(),
            date: "2023-10-05T15:04:00.000Z".to_string(),
        };
        assert_eq!(message.when_in(&chrono::Utc), "Oct 5, 2023 at 3:04 PM");
    }

    #[test]
    fn test_unparseable_date_is_shown_as_is() {
        let message = Message {
            id: None,
            content: "hi".to_string(),
            date: "yesterday".to_string(),
        };
        assert_eq!(message.when_in(&chrono::Utc), "yesterday");
    }

    #[test]
    fn test_numeric_message_date_still_decodes() {
        let resp: MessagesResponse = serde_json::from_value(json!({
            "messages": [
                {"_id": "m1", "content": "Bonus", "date": 1700000000000i64},
                {"content": "No date", "date": null}
            ]
        }))
        .unwrap();
        assert_eq!(resp.messages.len(), 2);
        assert_eq!(resp.messages[0].date, "1700000000000");
        assert_eq!(
            resp.messages[0].when_in(&chrono::Utc),
            "Nov 14, 2023 at 10:13 PM"
        );
        assert_eq!(resp.messages[1].when_in(&chrono::Utc), "");
    }
}
