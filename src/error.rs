//! Error types surfaced by construction and digest operations.
//!
//! Every condition here is pre-computation: a `CatfishParams` either builds successfully or not
//! at all, and `digest` either validates its inputs up front or runs to completion. There is no
//! partial result and nothing is ever thrown mid-digest.

/// Errors returned by [`crate::CatfishParamsBuilder::build`] and [`crate::Catfish::digest`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatfishError {
    /// `g` did not satisfy `1 < g < n`.
    #[error("generator must satisfy 1 < g < n")]
    InvalidGenerator,
    /// `N` is not a multiple of 8.
    #[error("N must be a multiple of 8, got {0}")]
    BlockSizeNotByteAligned(u32),
    /// `N` is smaller than `bitlen(n)`.
    #[error("N ({n_bits}) must be >= bitlen(n) ({modulus_bits})")]
    BlockSizeTooSmall { n_bits: u32, modulus_bits: u64 },
    /// `tcost` was zero.
    #[error("tcost must be > 0")]
    InvalidTCost,
    /// `mcost` was zero.
    #[error("mcost must be > 0")]
    InvalidMCost,
    /// `hsize` was below the 96-bit floor.
    #[error("hsize must be >= 96 bits, got {0}")]
    HSizeTooSmall(u32),
    /// `p * q != n`.
    #[error("p * q must equal n")]
    FactorsDoNotMultiplyToModulus,
    /// `salt` was not exactly 16 bytes.
    #[error("salt must be exactly 16 bytes, got {0}")]
    InvalidSaltLength(usize),
    /// `password` exceeded 128 bytes.
    #[error("password must be at most 128 bytes, got {0}")]
    PasswordTooLong(usize),
    /// A modexp result (or other derived integer) did not fit the expected byte width.
    #[error("integer does not fit in {width} bytes")]
    IntegerTooWide { width: usize },
    /// The CRT fast path disagreed with the slow path during an audit.
    #[error("CRT fast path disagrees with slow path; parameters are corrupt")]
    CrtInconsistent,
}
