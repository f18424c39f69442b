//! # Yatube Shared
//!
//! Request and response types shared by the web server and its clients.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
