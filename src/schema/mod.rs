//! Settings schema for the administration surface.
//!
//! Declares the two recognized keys (`EnableSendSMS`, `MessageBody`), their
//! widget metadata and compiled defaults, and provides the read (describe)
//! and write (submit) paths used by the settings hooks.

mod registrar;
mod types;

pub use registrar::{SettingsRegistrar, PLUGIN_NAME};
pub use types::{
    parse_flag, SchemaError, SchemaResult, SelectOption, SettingDescriptor, SettingKey,
    SettingKind, SettingsSection, SettingsSubmission, SubmitReport, WrittenSetting,
};
