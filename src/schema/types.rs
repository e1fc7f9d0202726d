//! Setting keys, descriptors and registrar errors

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;
use crate::template::DEFAULT_MESSAGE_TEMPLATE;

/// Registrar-specific error type
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Unknown setting: {0}")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for registrar operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Configuration keys recognized by the SMS routing plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    /// `EnableSendSMS`: "1" enables interception for a survey
    EnableSendSms,
    /// `MessageBody`: SMS template
    MessageBody,
}

impl SettingKey {
    pub const ALL: [SettingKey; 2] = [SettingKey::EnableSendSms, SettingKey::MessageBody];

    /// Storage name of the key
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::EnableSendSms => "EnableSendSMS",
            SettingKey::MessageBody => "MessageBody",
        }
    }

    /// Compiled-in default, the last tier of resolution
    pub fn default_value(&self) -> &'static str {
        match self {
            SettingKey::EnableSendSms => "0",
            SettingKey::MessageBody => DEFAULT_MESSAGE_TEMPLATE,
        }
    }

    /// Validate a raw submitted value for this key
    pub fn validate(&self, value: &str) -> SchemaResult<()> {
        match self {
            SettingKey::EnableSendSms if value != "0" && value != "1" => {
                Err(SchemaError::InvalidValue {
                    key: self.as_str().to_string(),
                    reason: format!("expected \"0\" or \"1\", got {:?}", value),
                })
            }
            _ => Ok(()),
        }
    }

    /// Field metadata shown by the administration surface
    pub fn descriptor(&self, current: String) -> SettingDescriptor {
        match self {
            SettingKey::EnableSendSms => SettingDescriptor {
                name: self.as_str().to_string(),
                kind: SettingKind::Select {
                    options: vec![
                        SelectOption::new("0", "No"),
                        SelectOption::new("1", "Yes"),
                    ],
                },
                label: "Enable sending SMS invites to mobiles?".to_string(),
                help: Some("Overwritable in each Survey setting".to_string()),
                default: self.default_value().to_string(),
                current,
            },
            SettingKey::MessageBody => SettingDescriptor {
                name: self.as_str().to_string(),
                kind: SettingKind::Text,
                label: "Enter the message body to be sent to survey participant's mobile:"
                    .to_string(),
                help: Some(
                    "You may use the placeholders {FIRSTNAME}, {LASTNAME} and {SURVEYURL}."
                        .to_string(),
                ),
                default: self.default_value().to_string(),
                current,
            },
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownKey(s.to_string()))
    }
}

/// Interpret a raw flag value
pub fn parse_flag(value: &str) -> bool {
    value.trim() == "1"
}

/// Input widget type of a setting
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SettingKind {
    Select { options: Vec<SelectOption> },
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// One editable setting with its effective value
#[derive(Debug, Clone, Serialize)]
pub struct SettingDescriptor {
    pub name: String,
    #[serde(flatten)]
    pub kind: SettingKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    pub default: String,
    pub current: String,
}

/// Settings a plugin contributes to a settings page
#[derive(Debug, Clone, Serialize)]
pub struct SettingsSection {
    pub name: String,
    pub settings: Vec<SettingDescriptor>,
}

/// Settings submitted from an administration form.
///
/// A `null` value marks a missing input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsSubmission {
    pub settings: std::collections::BTreeMap<String, Option<String>>,
}

/// Values written by a submission
#[derive(Debug, Clone, Serialize)]
pub struct SubmitReport {
    pub scope: String,
    pub written: Vec<WrittenSetting>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WrittenSetting {
    pub name: String,
    pub value: String,
    /// True when the input was missing and the inherited value was written
    pub prefilled: bool,
}
