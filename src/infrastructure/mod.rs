//! Infrastructure layer - Storage backends, identity providers and services

pub mod identity;
pub mod logging;
pub mod services;
pub mod storage;
