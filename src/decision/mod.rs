//! Boundary to the remote decision service that drives human actors

pub mod client;
pub mod protocol;

pub use client::{gather_decisions, DecisionService, HttpDecisionClient};
pub use protocol::{Decision, DecisionRequest, RemoteDecisions};
