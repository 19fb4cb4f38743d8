pub mod auth;
pub mod change_request;
pub mod request_page;
pub mod request_query;
pub mod update_response;
