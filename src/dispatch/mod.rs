//! Message dispatch to the text-message provider.
//!
//! The provider itself is an injected [`MessageSender`]. Implementations:
//!
//! - `LogSender`: dry run, logs and reports success (default)
//! - `HttpSender`: JSON POST to a configured endpoint
//!
//! [`DispatchAdapter`] selects the sending account, applies the address
//! prefix and turns transport errors into failed [`DeliveryOutcome`]s.

mod adapter;
mod factory;
pub mod http_sender;
pub mod log_sender;
mod types;

pub use adapter::{AccountSelector, DispatchAdapter};
pub use factory::create_dispatch_adapter;
pub use http_sender::HttpSender;
pub use log_sender::LogSender;
pub use types::{
    DeliveryOutcome, MessageSender, ProviderAccount, ProviderCredentials, SendError, SendRequest,
};
