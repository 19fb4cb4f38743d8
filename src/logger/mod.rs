pub mod animated_logger;
pub mod diff_logger;
