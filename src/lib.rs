//! Brains - Zombie Arena Simulation
//!
//! Zombies hunt and bite; human-controlled actors take their orders from a
//! remote decision service. Every tick the world state is written to a
//! key-value store for an external renderer.

pub mod actor;
pub mod core;
pub mod decision;
pub mod persistence;
pub mod simulation;
pub mod world;
