//! # apns-client
//!
//! Token-based delivery to the Apple Push Notification service.
//!
//! - **Tokens**: ES256 provider tokens signed with the team's `.p8` key,
//!   generated fresh for every send
//! - **Dispatch**: one HTTP/2 `POST /3/device/{token}` per notification
//! - **Results**: [`ApnsService::send`] never fails; every outcome is a
//!   [`SendResult`]
//!
//! ```rust,ignore
//! let settings = apns_settings::load_settings_from_path(path)?;
//! let service = ApnsService::new(&settings)?;
//! let result = service
//!     .send(&NotificationRequest::new("deadbeef").title("Hi").body("There"))
//!     .await;
//! ```

#![deny(unsafe_code)]

pub mod clock;
pub mod errors;
pub mod service;
pub mod token;
pub mod transport;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{ApnsError, Result};
pub use service::ApnsService;
pub use token::{ApnsClaims, TokenHeader, sign_token};
pub use transport::{PushRequest, ReqwestTransport, Transport, TransportResponse};
pub use types::{ApnsPayload, NotificationRequest, SendResult};
