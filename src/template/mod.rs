//! Message template rendering.
//!
//! Templates are plain text with `{FIRSTNAME}`, `{LASTNAME}` and `{SURVEYURL}`
//! placeholders.
//!
//! # Example
//!
//! ```
//! use survey_sms_router::template::{render, TemplateBindings};
//!
//! let bindings = TemplateBindings::for_recipient("Ana", "Silva", "http://x/y");
//! let body = render("Hi {FIRSTNAME}, visit {SURVEYURL}", &bindings);
//! assert_eq!(body, "Hi Ana, visit http://x/y");
//! ```

mod substitution;
mod types;

pub use substitution::render;
pub use types::{Placeholder, TemplateBindings, DEFAULT_MESSAGE_TEMPLATE};
