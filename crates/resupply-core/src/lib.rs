//! resupply-core: patching Gates of Hell resupply properties
//!
//! This library provides functionality to:
//! - Rewrite numeric resupply directives (radius, periods, limits) in
//!   properties fragments
//! - Decode and encode supply item records
//! - Merge the per-document item lists of a mod into canonical, deduplicated
//!   lists referenced by a single include
//! - Collapse item-list references inside resupply blocks
//! - Locate the game via Steam, pull fragments out of pak archives, and
//!   report which output files a run changed

pub mod archive;
pub mod catalog;
pub mod checksum;
pub mod error;
pub mod item;
pub mod merger;
pub mod patch;
pub mod patcher;
pub mod resupply;
pub mod scan;
pub mod settings;
pub mod splice;
pub mod steam;

pub use catalog::{catalog, find_mod, ArchiveRef, ModSpec};
pub use error::{Error, Result};
pub use item::Item;
pub use patcher::Patcher;
pub use scan::Category;
pub use settings::Settings;
pub use splice::{splice, TextEdit};
