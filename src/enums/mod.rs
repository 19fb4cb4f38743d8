pub mod change_value;
pub mod commands;
pub mod diff_annotation;
pub mod edit_field;
pub mod request_status;
pub mod review_state;
pub mod session_status;
pub mod status_filter;
pub mod store_error;
