//! Data models for the Zendesk API.
//!
//! Most configuration objects are handled as loosely-typed JSON so unknown
//! fields survive a round trip. Only pagination, jobs and brands get
//! dedicated types.

mod brand;
mod job;
mod page;
mod resource;

pub use brand::*;
pub use job::*;
pub use page::*;
pub use resource::*;
