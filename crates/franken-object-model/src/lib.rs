#![forbid(unsafe_code)]

//! Object model and conformance checker for the `Object` static operations.
//!
//! A [`realm::Realm`] carries the operations under test on its `Object`
//! namespace. [`object_conformance::run_object_conformance`] probes a host's
//! capabilities, registers the behavioral suite and runs each case in a
//! fresh realm, producing structured log events and a CI-gateable summary.

pub mod conformance_harness;
pub mod host_capabilities;
pub mod object_builtins;
pub mod object_conformance;
pub mod object_model;
pub mod realm;

pub use conformance_harness::{
    ConformanceEvidenceCollector, ConformanceRunResult, ConformanceRunnerConfig,
};
pub use host_capabilities::HostCapabilities;
pub use object_conformance::run_object_conformance;
pub use realm::{HostEnvironment, Realm, RealmConfig};
