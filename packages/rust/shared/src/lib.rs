//! Shared types, error model, and configuration for DashPrep.
//!
//! This crate is the foundation depended on by all other DashPrep crates.
//! It provides:
//! - [`DashPrepError`] — the unified error type
//! - Domain types ([`Researcher`], [`Position`], [`Platform`], [`PlatformSet`],
//!   [`Project`], the dashboard views, [`DatasetManifest`], [`RunId`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, InputsConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from,
};
pub use error::{DashPrepError, Result};
pub use types::{
    ArtifactMeta, AvgStatsView, CURRENT_SCHEMA_VERSION, DashboardData, DatasetManifest,
    DemographicsView, InputProvenance, MatchedProject, PerformanceEntry, Platform,
    PlatformPotential, PlatformSet, PlatformView, Position, PositionSeries, Project,
    RecruitmentView, Researcher, ResearcherProfile, RunId, identity_key,
};
