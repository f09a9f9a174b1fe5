//! # scry-core
//!
//! Core types, identity derivation, and enums for Scry.
//!
//! This crate provides the foundational types shared across all Scry crates:
//! - Entity structs for digests, paper metadata, and citation edges
//! - Period and relation enums with their storage string forms
//! - Deterministic digest-identity derivation and arXiv id normalization

pub mod entities;
pub mod enums;
pub mod identity;
