//! tasklane_client — HTTP client for the remote todo service.
//!
//! [`TodoApi`] is the seam between the runtime and the wire: the runtime holds
//! an `Arc<dyn TodoApi>`, so tests substitute scripted implementations while
//! production wires in [`HttpTodoClient`].

pub mod api;
pub mod error;
pub mod http;
pub mod types;


pub use api::TodoApi;
pub use error::{Error, Result};
pub use http::HttpTodoClient;
pub use types::{
    CompleteAllResponse, CreateItemRequest, CreateListRequest, UpdateItemRequest,
    UpdateListRequest,
};
