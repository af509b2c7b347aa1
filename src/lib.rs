pub mod types;
pub mod config;
pub mod data;
pub mod classify;
pub mod extent;
pub mod processing;
pub mod render;
pub mod html;
pub mod leaflet;
