//! Internal link analysis.
//!
//! [`graph`] validates caller-supplied page records, [`distribution`]
//! scores how links spread across them, and `checker` (behind the `net`
//! feature) finds broken link targets over HTTP.

pub mod broken;
#[cfg(feature = "net")]
pub mod checker;
pub mod distribution;
pub mod graph;

pub use broken::{BrokenLink, BrokenLinkPolicy, BrokenLinkReport};
#[cfg(feature = "net")]
pub use checker::BrokenLinkChecker;
pub use distribution::{LinkDistributionReport, LinkPolicy, PageDepth, analyze_link_distribution};
pub use graph::{LinkGraph, PageLinkData};
