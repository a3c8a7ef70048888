pub mod error;
pub mod event;
pub mod response;

pub use error::AppError;
pub use event::InboundEvent;
pub use response::{AdapterResponse, VALIDATION_FAILED_MESSAGE};
