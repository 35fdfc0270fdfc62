// Middleware for CORS, request ids and response headers

pub mod cors;
pub mod request_id;
pub mod security_headers;

pub use cors::*;
pub use request_id::*;
pub use security_headers::*;
