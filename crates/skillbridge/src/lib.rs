//! SkillBridge core: SDP registration wizard, payment confirmation, and the
//! SME directory search engine, plus the trait seams over the managed
//! identity provider, document store, and payment provider.

pub mod accounts;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
