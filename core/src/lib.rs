//! # Lost & Found Security Core
//!
//! Declarative security pipeline for Actix Web used by the lost-and-found
//! service: session login, ordered role rules, CORS and BCrypt passwords.
//!
//! The main functionality lives in [`http::security`]; error types are in
//! [`http::error`].

pub mod http;
