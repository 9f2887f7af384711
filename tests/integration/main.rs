//! Integration tests for Domain-Scout
//!
//! These tests use wiremock to stand in for the aggregator page and run the
//! whole refresh path against real store backends.

mod api_tests;
mod common;
mod refresh_tests;
