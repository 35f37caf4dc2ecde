// HTTP plumbing shared by the external API clients

pub mod client;

pub use client::RateLimitedHttpClient;
