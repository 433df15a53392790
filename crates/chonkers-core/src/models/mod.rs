//! Data models for chonkers.
//!
//! `github` holds the subset of GitHub API payloads the collectors read;
//! `entry` holds the flattened records written for the website.

mod entry;
mod github;

pub use entry::*;
pub use github::*;
