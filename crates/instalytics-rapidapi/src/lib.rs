//! Client for the Instagram Statistics API served through `RapidAPI`.

pub mod client;
pub mod error;
pub(crate) mod retry;
pub mod types;

pub use client::RapidApiClient;
pub use error::RapidApiError;
pub use types::{CommunityEnvelope, CommunityProfile, MemberCity};
