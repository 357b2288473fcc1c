//! Lattice generation and projection into 3D point records.
//!
//! Generation and projection run once per regenerate request; the result
//! replaces the live [`point_set::LatticePoints`] wholesale.

/// Random rank-N lattice construction.
pub mod generator;

/// Index path to position, colour and size mapping.
///
/// Every triple of dimensions forms a nested ring shrunk by the decay base.
pub mod projection;

/// The live point set owned by the engine.
pub mod point_set;

/// Request bounds and volume cap validation.
pub mod volume;
