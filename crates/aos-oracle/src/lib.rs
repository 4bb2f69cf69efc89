//! # aos-oracle
//!
//! The analysis gateway: turns one session's feedback into a validated
//! [`AnalysisResult`](aos_core::entities::AnalysisResult).
//!
//! - [`AnalysisGateway`] is the seam the orchestrator depends on.
//! - [`ChatOracle`] implements it over any OpenAI-compatible
//!   `/chat/completions` endpoint.
//! - [`prompt`] and [`parse`] are pure and shared by any implementation.

mod chat;
mod error;
mod gateway;
mod http;
pub mod parse;
pub mod prompt;

pub use chat::{ChatOracle, ChatOracleConfig};
pub use error::OracleError;
pub use gateway::{AnalysisContext, AnalysisGateway};
