pub mod connection;
pub mod desk;
pub mod fixtures;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, connect_with_settings, DbPool};
pub use desk::{DeskError, ReservationDesk, SubmissionReceipt};
pub use fixtures::{DefaultRateSeed, RateSeedInfo, SeedResult, VerificationResult};
