//! # Citizen Agent Testkit
//!
//! Testing utilities for the Citizen Agent.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: an agent wired to a manual clock, plus the demo dataset
//! - **Generators**: Proptest strategies for record inputs
//!
//! ## Sample Data
//!
//! Load the demo dataset into any agent:
//!
//! ```rust
//! use citizen_agent::{Agent, AgentConfig};
//! use citizen_agent_testkit::fixtures::seed_sample_data;
//!
//! let agent = Agent::new(AgentConfig::default()).unwrap();
//! let ids = seed_sample_data(&agent).unwrap();
//! assert_eq!(agent.consents().len().unwrap(), ids.consents.len());
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use citizen_agent_testkit::{generators::new_consent, TestFixture};
//!
//! proptest! {
//!     #[test]
//!     fn created_consents_round_trip(input in new_consent()) {
//!         let fixture = TestFixture::new();
//!         let grant = fixture.agent.create_consent(input).unwrap();
//!         let id = grant.consent_id.to_string();
//!         prop_assert_eq!(fixture.agent.get_consent(&id).unwrap(), grant);
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{seed_sample_data, ManualClock, SampleIds, TestFixture};
