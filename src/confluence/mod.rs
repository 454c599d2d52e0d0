//! Confluence module providing the remote API trait, the XML-RPC client and
//! wire codec, page records, and session establishment.

pub mod api;
pub mod client;
pub mod models;
pub mod session;
pub mod xmlrpc;

pub use api::ConfluenceRpc;
pub use client::XmlRpcClient;
pub use models::{ApiVersion, NewPage, Page, PageLookup, UpdateOptions};
pub use session::Session;
