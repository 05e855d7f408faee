//! Desktop dashboard for trending Reddit posts.
//!
//! A [`controller::RefreshController`] polls the trends service and owns the
//! [`state::PresentationState`]; [`view::render`] turns that state into a
//! [`view::DashboardView`] which the egui shell in [`app`] paints.

pub mod app;
pub mod config;
pub mod controller;
pub mod errors;
pub mod format;
pub mod logging;
pub mod models;
pub mod state;
pub mod theme;
pub mod trends_client;
pub mod view;
