//! Network access: the rate-limit-aware HTTP client and the GitHub collectors.

mod client;
mod github;

pub use client::{HttpClient, RateLimitState};
pub use github::{raw_content_url, GitHubClient};
