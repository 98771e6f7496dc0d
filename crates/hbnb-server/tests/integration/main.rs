mod api_tests;
mod auth_tests;
mod common;
