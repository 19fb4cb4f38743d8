mod common;
mod edit_fields_tests;
mod review_flow_tests;
