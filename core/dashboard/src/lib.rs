//! FILENAME: core/dashboard/src/lib.rs
//! Notification dashboard composition.
//!
//! Wires a data source to the table view, the trend series and the workbook
//! bridge. Network access and authentication are collaborators behind
//! `NotificationSource` and `Authenticator`.
//!
//! Layers:
//! - `fetch`: Envelope, response checks, timeout, batched loading
//! - `cache`: TTL snapshot cache
//! - `auth`: Authentication collaborator and privilege gate adapter
//! - `session`: The per-source session

pub mod auth;
pub mod cache;
pub mod error;
pub mod fetch;
pub mod session;

pub use auth::{login, AuthGate, Authenticator, Credentials};
pub use cache::SnapshotCache;
pub use error::{AuthFailure, FetchError, SessionError};
pub use fetch::{batch_offsets, fetch_all, interpret_response, with_timeout, FetchEnvelope, NotificationSource};
pub use session::{DashboardSession, ImportOutcome, LoadState};
