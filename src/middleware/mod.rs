// src/middleware/mod.rs
// DOCUMENTATION: Middleware and guard organization

pub mod guards;
pub mod html_form;
pub mod method_override;
pub mod session;

pub use guards::*;
pub use html_form::HtmlForm;
pub use method_override::method_override;
pub use session::{session_middleware, RequestContext};
