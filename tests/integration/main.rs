//! Integration tests for Jobscan
//!
//! These tests use wiremock to serve listing and detail pages and drive
//! complete scan passes end-to-end.

mod crawl_tests;
mod scan_tests;
mod scheduler_tests;
mod support;
