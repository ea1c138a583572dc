//! Lantern Progress -- the journey around the puzzles.
//!
//! Chapter order and rewards come from a [`catalog::Catalog`]. A
//! [`progression::Progression`] owns the [`save::SaveState`] and writes the
//! whole record through a [`store::SaveStore`] after every change. A
//! [`campaign::Campaign`] pairs the progression with the live
//! [`lantern_core::session::Session`] for the current chapter.
//!
//! # Key Types
//!
//! - [`catalog::Catalog`] / [`catalog::ChapterRecord`] -- ordered chapters
//!   and their one-time unlocks.
//! - [`save::SaveState`] -- everything persisted, wrapped in a versioned
//!   envelope and upgraded by [`migration::MigrationRegistry`].
//! - [`progression::Progression`] -- navigation, completion, items, skills.
//! - [`rank::Rank`] -- the ending grade.

pub mod campaign;
pub mod catalog;
pub mod migration;
pub mod progression;
pub mod rank;
pub mod save;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
