//! Data models for the ServiceNow Table and Attachment APIs.
//!
//! These types cover the request and response shapes the instance
//! speaks, plus the tool response envelope.

mod attachment;
mod common;
mod query;
mod record;

pub use attachment::*;
pub use common::*;
pub use query::*;
pub use record::*;
