//! Crane installation server library.
//!
//! This module exposes the server components for use in tests and binaries.

pub mod config;
pub mod error;
pub mod game_loop;
pub mod ingest;
pub mod installation;
pub mod launcher;
pub mod osc;
pub mod palette;
pub mod physics;
pub mod traveler;
pub mod ws;
