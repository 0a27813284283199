//! Client side of the xapblr search front end: form submission, search
//! session and history, pagination, and result rendering into a view model.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod history;
pub mod meta;
pub mod preview;
pub mod render;
pub mod server;
pub mod session;
pub mod tools;
