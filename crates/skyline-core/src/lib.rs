//! Skyline Core Types
//!
//! This crate provides the plain data types shared by the Skyline layout
//! engine and its callers. It includes:
//!
//! - **Identifiers**: String-interned entity identifiers ([`identifier::Id`])
//! - **Structure**: The application/package/class tree ([`structure`] module)
//! - **Traces**: Observed runtime call traces ([`trace`] module)
//! - **City**: The computed per-entity boxes ([`city::CityLayout`])
//! - **Geometry**: Ground-plane points, sizes and rectangles ([`geometry`] module)

pub mod city;
pub mod geometry;
pub mod identifier;
pub mod structure;
pub mod trace;
