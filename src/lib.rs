//! AWS Lambda adapter that turns GitHub webhook deliveries into Rundeck job runs.
//!
//! The webhook URL's query string selects the job, the header and body checks
//! the delivery must pass, and the body fields forwarded as job options.
//! See [`interpreter`] for the conventions.

pub mod config;
pub mod dispatcher;
pub mod handler;
pub mod http;
pub mod interpreter;
pub mod models;
pub mod schema;
