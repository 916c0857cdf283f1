pub mod errors;
pub mod html;
pub mod redirect;
pub mod xlsx;

pub use errors::{error_to_response, ResultResp};

// Normal HTML response
pub use html::{html_response, html_with_status, text_response};
pub use redirect::{redirect, redirect_clearing_session, redirect_with_session};
pub use xlsx::xlsx_response;
