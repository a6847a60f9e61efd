//! Reflex trainers for the terminal: an aim trainer, a lane-based sky
//! shooter and a bullet-dodging movement drill, all driven by one generic
//! session loop.

pub mod app;
pub mod config;
pub mod event;
pub mod games;
pub mod pose;
pub mod ranking;
pub mod ui;
