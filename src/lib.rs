//! Widget core and views for a console-style game browsing frontend.

pub mod collections;
pub mod components;
pub mod config;
pub mod gui;
pub mod input;
pub mod math;
pub mod models;
pub mod renderer;
pub mod settings;
pub mod views;
pub mod window;
