//! Locomotion and lifecycle controller for a 3D platformer character, with a
//! small static-geometry level, trigger volumes and a headless host to run
//! scripted scenarios.

pub mod components;
pub mod config;
pub mod controller;
pub mod engine;
pub mod fsm;
pub mod physics;
pub mod scene;
pub mod sim;
pub mod trigger;
