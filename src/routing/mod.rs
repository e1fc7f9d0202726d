//! Notification routing core.
//!
//! For every outbound invitation, reminder or confirmation the host is about
//! to email, [`NotificationRouter`] decides whether to leave the email alone
//! or suppress it and send a rendered text message instead.

mod error;
mod router;
mod types;

pub use error::{BatchHalted, RoutingError};
pub use router::NotificationRouter;
pub use types::{
    NotificationEvent, NotificationType, RecipientRecord, RecipientRoute, RenderedMessage,
    RoutingDecision, SkipReason, EMAIL_SENTINEL,
};
