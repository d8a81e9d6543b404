//! Library crate for vidgate-back, exposing modules for binaries and integration tests.

pub mod auth;
pub mod color;
pub mod config;
pub mod dao;
pub mod dto;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
