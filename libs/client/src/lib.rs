//! Client library for the Menú del Día services
//!
//! This is the non-visual half of the mobile app: an HTTP client for the
//! auth and resource services that keeps the session token in a local
//! credential file, the home feed's client-side filtering and the distance
//! shown next to each restaurant.

pub mod api;
pub mod config;
pub mod credentials;
pub mod error;
pub mod feed;
pub mod geo;

pub use api::{MenuApiClient, PhotoFile, PhotoGallery, ReviewSubmission};
pub use config::ClientConfig;
pub use credentials::{CredentialStore, Credentials, FileCredentialStore, StoredUser};
pub use error::{ClientError, ClientResult};
pub use feed::FeedFilter;
