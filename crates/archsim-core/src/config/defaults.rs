//! Default values for archsim configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Similarity Defaults
// ============================================================================

/// Weight of the structural score in the combined score.
pub const DEFAULT_WEIGHT_STRUCTURAL: f64 = 0.5;

/// Weight of the normalized semantic score in the combined score.
pub const DEFAULT_WEIGHT_SEMANTIC: f64 = 0.5;

/// Normalization policy for structural overlap.
pub const DEFAULT_COMPARE_MODE: &str = "max";

/// Tolerance when checking that production weights sum to 1.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Number of weight splits in a sweep (0.0, 0.1, ..., 1.0).
pub const SWEEP_STEPS: usize = 10;

// ============================================================================
// Path Defaults
// ============================================================================

/// Directory holding one JSON instance document per model.
pub const DEFAULT_JSON_DIR: &str = "output-processing/json";

/// Structural similarity matrix.
pub const DEFAULT_STRUCTURAL_CSV: &str = "output/structural_similarity.csv";

/// Normalized semantic similarity matrix.
pub const DEFAULT_SEMANTIC_CSV: &str = "output/semantic_similarity.csv";

/// Combined similarity matrix.
pub const DEFAULT_COMBINED_CSV: &str = "output/combined_similarity.csv";

/// Extension of instance documents in the corpus directory.
pub const DOCUMENT_EXTENSION: &str = "json";

// ============================================================================
// Embedding Defaults
// ============================================================================

/// FastEmbed model used when no vector file is configured.
pub const DEFAULT_EMBEDDING_MODEL: &str = "BGESmallENV15";

// ============================================================================
// File Names
// ============================================================================

/// Project-local configuration file.
pub const CONFIG_FILE_NAME: &str = "archsim.toml";

/// Directory under the user config dir.
pub const CONFIG_DIR_NAME: &str = "archsim";
