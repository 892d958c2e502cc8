pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod model;

// Re-export main types for convenience
pub use client::Client;
pub use config::ClientOptions;
pub use error::{Error, Result};
pub use http::{ApiRequest, HttpClient, ReqwestClient, RequestMethod};
pub use model::{Episode, PlayingStatus, Podcast, SortOrder};
