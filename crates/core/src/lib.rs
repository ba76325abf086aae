//! Four-Dimensional Turbulence Core Library
//!
//! Turns a set of independently generated 3D turbulence boxes ("planes"),
//! sampled at increasing distance upstream of a turbine, into one 4D wind
//! field whose planes are longitudinally coherent. The boxes evolve as they
//! advect downstream instead of staying frozen.
//!
//! ## Stages
//!
//! - Decode `TurbSim` `.wnd` + `.sum` or Mann `.bin` boxes ([`codec`])
//! - Derive the frequency vector and statistics from the [`config`]
//! - Build the plane×plane coherence matrix per frequency ([`coherence`])
//! - Cholesky-factorize it into mixing operators ([`correlation`])
//! - Mix the plane spectra and transform back ([`spectral`])
//! - Encode the unfrozen planes as `.evo` ([`codec::evo`])
//!
//! [`pipeline::run`] chains all of them.

// Core types and utilities
pub mod core_types;
pub mod error;

// Configuration and derived quantities
pub mod config;

// Numerical stages
pub mod coherence;
pub mod correlation;
pub mod spectral;

// File formats and batch driver
pub mod codec;
pub mod pipeline;

// Re-export core types
pub use core_types::{ComponentGrid, MergedField, PlaneField, VelocityComponent};
pub use error::{ErrorKind, EvoTurbError, Result};

// Re-export configuration types
pub use config::{
    Configuration, DerivedParameters, EvolutionModel, FrequencyVector, GridConfig,
    TurbulenceClass, TurbulenceModel, TurbulenceStatistics,
};

// Re-export stage types
pub use codec::{BinaryScaling, TurbulenceBox};
pub use coherence::{CoherenceMatrix, CoherenceModel};
pub use correlation::MixingOperator;
pub use pipeline::{ImportedPlanes, PlaneSource};
pub use spectral::SpectralSynthesizer;
