//! CLI infrastructure for the castle escape trainers
//!
//! This module provides the command-line interface for training tables,
//! replaying them greedily, and inspecting saved artifacts.

pub mod commands;
pub mod config;
pub mod output;
