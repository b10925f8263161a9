//! HTTP handlers

pub mod health;
pub mod check;
pub mod features;
pub mod model;
