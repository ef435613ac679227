//! # Virtual Joy Library
//!
//! An on-screen virtual joystick that publishes its position as periodic
//! joy control messages.
//!
//! This library provides the stick's input model (drag tracking, disk or
//! square clamping, normalization, change notifications) together with the
//! host that publishes the stick value at a fixed rate.

pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod joystick;
pub mod publisher;
