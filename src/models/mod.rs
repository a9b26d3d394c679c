//! Data models for test discovery
//!
//! Contains the item, fingerprint, selector and result types exchanged with
//! the host runner.

mod item;
mod result;

pub use item::{Fingerprint, Item, Selector, ADAPTER_ANNOTATION};
pub use result::DiscoveryResult;
