pub mod review_session;
pub mod session_view;
