//! Shared traits for the strided fixture ecosystem.
//!
//! This crate provides the backend seam used by `strided-fixtures`: the
//! [`ArrayLib`] capability trait and the [`FixtureScalar`] element bound.
//! Backend crates (`strided-view`, `ndarray-fixtures`, or external ones)
//! depend only on this crate, so they can implement [`ArrayLib`] for their
//! own types without orphan rule violations.

pub mod array_lib;
pub mod scalar;

pub use array_lib::ArrayLib;
pub use scalar::FixtureScalar;
