//! qknot Braid Notation
//!
//! This crate turns user-supplied knot notation into validated braid words and
//! the topological statistics that downstream circuit planning relies on.
//!
//! # Overview
//!
//! Braid words are whitespace-separated generator tokens (`s1`, `s2^-1`, ...).
//! Parsing yields an ordered [`ParsedBraid`]; analysis yields a read-only
//! [`BraidAnalysis`] snapshot; validation applies the execution policy (at
//! least three tokens, at least two distinct generators, contiguous range).
//!
//! Dowker notation is normalized into a [`DowkerSequence`] and compiled either
//! through the static knot catalog or a deterministic fallback.
//!
//! # Core Components
//!
//! - **Tokens**: [`BraidToken`], [`ParsedBraid`], [`parse_braid_word`]
//! - **Analysis**: [`BraidAnalysis`], [`validate_braid`], [`verify_topological_mapping`]
//! - **Dowker**: [`DowkerSequence`], [`compile_dowker_notation`]
//! - **Catalog**: [`KNOT_CATALOG`]
//!
//! # Example: Dowker to Braid
//!
//! ```rust
//! use qknot_braid::{compile_dowker_notation, validate_braid};
//!
//! let compiled = compile_dowker_notation("4 6 2").unwrap();
//! assert_eq!(compiled.knot_name, "Trefoil Knot (3_1)");
//!
//! let analysis = validate_braid(&compiled.braid_word).unwrap();
//! assert_eq!(analysis.required_qubits, 4);
//! ```

pub mod analysis;
pub mod catalog;
pub mod dowker;
pub mod error;
pub mod token;

pub use analysis::{
    BraidAnalysis, MAX_GENERATOR_INDEX, StrandConnectivity, VerificationEvidence, VerificationReport,
    VerificationStatus, analyze_braid_word, validate_braid, verify_topological_mapping,
};
pub use catalog::{CatalogEntry, KNOT_CATALOG};
pub use dowker::{DEFAULT_ROOT_OF_UNITY, DowkerCompilation, DowkerSequence, compile_dowker_notation};
pub use error::{BraidError, BraidResult};
pub use token::{BraidToken, ParsedBraid, parse_braid_word};
