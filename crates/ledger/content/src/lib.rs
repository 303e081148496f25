//! Data-driven item catalogs and rules configuration.
//!
//! This crate provides loaders for the data files a table is set up from:
//! - Scene cue catalogs (RON)
//! - Club upgrade catalogs (RON)
//! - Archetype and flaw catalogs (RON, optional)
//! - Rules configuration (TOML)
//!
//! Definitions are validated against the rules configuration while loading and
//! come out as ready-to-use `ledger-core` values with empty ledgers.

pub mod loaders;

pub use loaders::{
    ArchetypeLoader, ArchetypeSpec, ClubUpgradeSpec, ConfigLoader, ContentFactory, FlawSpec,
    ItemLoader, LoadResult, SceneCueSpec,
};
