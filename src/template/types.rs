//! Placeholder and binding types for message templates

use std::collections::HashMap;
use std::fmt;

/// Built-in message template, used when the configured template is empty.
pub const DEFAULT_MESSAGE_TEMPLATE: &str =
    "Dear {FIRSTNAME} {LASTNAME},\nWe invite you to participate in the survey: \n {SURVEYURL} \nThank You,\nSurvey Team";

/// A placeholder recognized by the template engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// `{FIRSTNAME}`
    FirstName,
    /// `{LASTNAME}`
    LastName,
    /// `{SURVEYURL}`
    SurveyUrl,
}

impl Placeholder {
    pub const ALL: [Placeholder; 3] = [
        Placeholder::FirstName,
        Placeholder::LastName,
        Placeholder::SurveyUrl,
    ];

    /// Literal token as it appears in a template, braces included
    pub fn token(&self) -> &'static str {
        match self {
            Placeholder::FirstName => "{FIRSTNAME}",
            Placeholder::LastName => "{LASTNAME}",
            Placeholder::SurveyUrl => "{SURVEYURL}",
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Values bound to placeholders for one rendering
#[derive(Debug, Clone, Default)]
pub struct TemplateBindings {
    values: HashMap<Placeholder, String>,
}

impl TemplateBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings for a survey recipient
    pub fn for_recipient(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        survey_url: impl Into<String>,
    ) -> Self {
        Self::new()
            .bind(Placeholder::FirstName, first_name)
            .bind(Placeholder::LastName, last_name)
            .bind(Placeholder::SurveyUrl, survey_url)
    }

    /// Bind a value, replacing any previous binding for the placeholder
    pub fn bind(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.values.insert(placeholder, value.into());
        self
    }

    pub fn get(&self, placeholder: Placeholder) -> Option<&str> {
        self.values.get(&placeholder).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        assert_eq!(Placeholder::FirstName.token(), "{FIRSTNAME}");
        assert_eq!(Placeholder::LastName.to_string(), "{LASTNAME}");
        assert_eq!(Placeholder::SurveyUrl.token(), "{SURVEYURL}");
    }

    #[test]
    fn test_default_template_uses_every_placeholder() {
        for placeholder in Placeholder::ALL {
            assert!(DEFAULT_MESSAGE_TEMPLATE.contains(placeholder.token()));
        }
    }

    #[test]
    fn test_default_template_text() {
        let body = crate::template::render(
            DEFAULT_MESSAGE_TEMPLATE,
            &TemplateBindings::for_recipient("Ana", "Silva", "http://x/s"),
        );
        assert_eq!(
            body,
            "Dear Ana Silva,\nWe invite you to participate in the survey: \n http://x/s \nThank You,\nSurvey Team"
        );
    }

    #[test]
    fn test_rebind_replaces() {
        let bindings = TemplateBindings::new()
            .bind(Placeholder::FirstName, "Ana")
            .bind(Placeholder::FirstName, "Bea");
        assert_eq!(bindings.get(Placeholder::FirstName), Some("Bea"));
        assert_eq!(bindings.get(Placeholder::LastName), None);
    }
}
