//! Request gateway
//!
//! Sits between the adapters and the core: the operation table, the
//! parameter validators, the response envelope and the dispatcher
//! that ties them together.

pub mod dispatcher;
pub mod operation;
pub mod response;
pub mod validate;

pub use dispatcher::RequestDispatcher;
pub use operation::{OperationKind, OperationRequest, OperationSpec, OPERATIONS};
pub use response::{ErrorBody, OperationResponse, TextContent};
pub use validate::{SchemaValidator, ValidatedRequest, ValidatedSearch};
