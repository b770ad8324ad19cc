//! Request-log masking and filtered log queries for an API gateway.
//!
//! [`masking::MaskingEngine`] redacts sensitive values in logged payloads and
//! caps their length. [`filter::build`] turns optional query criteria into a
//! [`filter::LogPredicate`] for a [`storage::RequestLogStore`].
//! [`query::LogQueryService`] combines the two.

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod masking;
pub mod query;
pub mod record;
pub mod storage;
