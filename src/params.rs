//! The immutable, construction-time parameter record and its builder.
//!
//! Every precondition is checked in exactly one place: [`CatfishParamsBuilder::build`]. A
//! successfully built [`CatfishParams`] is therefore always safe to hand to
//! [`crate::Catfish::digest`] without further validation.

use num_bigint::BigUint;
use num_traits::One;

use crate::error::CatfishError;
use crate::exponent::Exponentiator;

/// Length, in bytes, of the digest's initialization block (16-byte salt + 16-byte password
/// bit-length + 128-byte zero-padded password). This is fed to the first `H` call as-is, even
/// when it is wider than the working state (`N/8`) — the block is never truncated to fit.
pub(crate) const INIT_BLOCK_LEN: usize = 160;

/// Immutable parameters shared read-only across every `digest` call made through a given
/// [`crate::Catfish`] engine.
#[derive(Clone, Debug)]
pub struct CatfishParams {
    pub(crate) bytelen: usize,
    pub(crate) tcost: u32,
    pub(crate) mcost: u32,
    pub(crate) hsize: u32,
    pub(crate) exponentiator: Exponentiator,
}

impl CatfishParams {
    /// Block size in bytes (`N/8`); the fixed width of `x` and of every entry of `V` after the
    /// first `H` call.
    pub fn bytelen(&self) -> usize {
        self.bytelen
    }

    /// Number of outer (time-cost) rounds.
    pub fn tcost(&self) -> u32 {
        self.tcost
    }

    /// Number of entries in the memory vector `V` (memory-cost).
    pub fn mcost(&self) -> u32 {
        self.mcost
    }

    /// Output tag size, in bits.
    pub fn hsize_bits(&self) -> u32 {
        self.hsize
    }

    /// Output tag size, in bytes (rounded up).
    pub fn hsize_bytes(&self) -> usize {
        ((self.hsize as usize) + 7) / 8
    }
}

/// Builds a [`CatfishParams`], validating every precondition before producing one.
#[derive(Clone, Debug)]
pub struct CatfishParamsBuilder {
    g: BigUint,
    n: BigUint,
    block_bits: u32,
    tcost: u32,
    mcost: u32,
    hsize: u32,
    factors: Option<(BigUint, BigUint)>,
}

impl CatfishParamsBuilder {
    /// Starts a builder for the required parameters: generator `g`, modulus `n`, and block size
    /// `N` in bits. `tcost` defaults to 1, `mcost` to 1024, `hsize` to 256.
    pub fn new(g: BigUint, n: BigUint, block_bits: u32) -> Self {
        CatfishParamsBuilder {
            g,
            n,
            block_bits,
            tcost: 1,
            mcost: 1024,
            hsize: 256,
            factors: None,
        }
    }

    /// Sets the number of outer rounds.
    pub fn tcost(mut self, tcost: u32) -> Self {
        self.tcost = tcost;
        self
    }

    /// Sets the size of the memory vector.
    pub fn mcost(mut self, mcost: u32) -> Self {
        self.mcost = mcost;
        self
    }

    /// Sets the output tag size, in bits.
    pub fn hsize(mut self, hsize: u32) -> Self {
        self.hsize = hsize;
        self
    }

    /// Supplies the factorization of `n`, enabling the CRT fast exponentiation path.
    pub fn factors(mut self, p: BigUint, q: BigUint) -> Self {
        self.factors = Some((p, q));
        self
    }

    /// Validates every precondition and, if they all hold, builds a [`CatfishParams`].
    pub fn build(self) -> Result<CatfishParams, CatfishError> {
        if self.g <= BigUint::one() || self.g >= self.n {
            return Err(CatfishError::InvalidGenerator);
        }
        if self.block_bits % 8 != 0 {
            return Err(CatfishError::BlockSizeNotByteAligned(self.block_bits));
        }
        let modulus_bits = self.n.bits();
        if u64::from(self.block_bits) < modulus_bits {
            return Err(CatfishError::BlockSizeTooSmall {
                n_bits: self.block_bits,
                modulus_bits,
            });
        }
        let bytelen = (self.block_bits / 8) as usize;
        if self.tcost == 0 {
            return Err(CatfishError::InvalidTCost);
        }
        if self.mcost == 0 {
            return Err(CatfishError::InvalidMCost);
        }
        if self.hsize < 96 {
            return Err(CatfishError::HSizeTooSmall(self.hsize));
        }
        if let Some((p, q)) = &self.factors {
            if p * q != self.n {
                return Err(CatfishError::FactorsDoNotMultiplyToModulus);
            }
        }

        let exponentiator = Exponentiator::new(self.g, self.n, self.factors);

        Ok(CatfishParams {
            bytelen,
            tcost: self.tcost,
            mcost: self.mcost,
            hsize: self.hsize,
            exponentiator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_n() -> BigUint {
        BigUint::from(61u32) * BigUint::from(53u32)
    }

    #[test]
    fn rejects_generator_out_of_range() {
        let err = CatfishParamsBuilder::new(BigUint::from(1u32), small_n(), 1280)
            .build()
            .unwrap_err();
        assert_eq!(err, CatfishError::InvalidGenerator);
    }

    #[test]
    fn rejects_non_byte_aligned_block() {
        let err = CatfishParamsBuilder::new(BigUint::from(17u32), small_n(), 1281)
            .build()
            .unwrap_err();
        assert_eq!(err, CatfishError::BlockSizeNotByteAligned(1281));
    }

    #[test]
    fn accepts_block_narrower_than_init_block() {
        // N=1024 bits (bytelen=128) is narrower than the 160-byte init block; the init block is
        // still fed to the first H call uncapped at bytelen.
        let params = CatfishParamsBuilder::new(BigUint::from(17u32), small_n(), 1024)
            .build()
            .unwrap();
        assert_eq!(params.bytelen(), 128);
    }

    #[test]
    fn rejects_zero_tcost() {
        let err = CatfishParamsBuilder::new(BigUint::from(17u32), small_n(), 1280)
            .tcost(0)
            .build()
            .unwrap_err();
        assert_eq!(err, CatfishError::InvalidTCost);
    }

    #[test]
    fn rejects_zero_mcost() {
        let err = CatfishParamsBuilder::new(BigUint::from(17u32), small_n(), 1280)
            .mcost(0)
            .build()
            .unwrap_err();
        assert_eq!(err, CatfishError::InvalidMCost);
    }

    #[test]
    fn rejects_hsize_below_floor() {
        let err = CatfishParamsBuilder::new(BigUint::from(17u32), small_n(), 1280)
            .hsize(64)
            .build()
            .unwrap_err();
        assert_eq!(err, CatfishError::HSizeTooSmall(64));
    }

    #[test]
    fn rejects_mismatched_factors() {
        let err = CatfishParamsBuilder::new(BigUint::from(17u32), small_n(), 1280)
            .factors(BigUint::from(61u32), BigUint::from(59u32))
            .build()
            .unwrap_err();
        assert_eq!(err, CatfishError::FactorsDoNotMultiplyToModulus);
    }

    #[test]
    fn accepts_valid_parameters_with_factors() {
        let params = CatfishParamsBuilder::new(BigUint::from(17u32), small_n(), 1280)
            .tcost(2)
            .mcost(64)
            .hsize(256)
            .factors(BigUint::from(61u32), BigUint::from(53u32))
            .build()
            .unwrap();
        assert_eq!(params.bytelen(), 160);
        assert_eq!(params.tcost(), 2);
        assert_eq!(params.mcost(), 64);
        assert_eq!(params.hsize_bytes(), 32);
    }
}
