//! Catfish: a memory-hard password-hashing function combining a Keccak sponge with modular
//! exponentiation in a large multiplicative group.
//!
//! A [`Catfish`] engine is built once from a [`CatfishParams`] (generator, modulus, block size,
//! and the `tcost`/`mcost`/`hsize` cost knobs) and can then be used to [`Catfish::digest`] any
//! number of `(salt, password)` pairs. The engine holds no mutable state of its own — every
//! buffer a `digest` call needs is allocated for that call and zeroized on return.
//!
//! ```
//! use num_bigint::BigUint;
//! use catfish::{Catfish, CatfishParamsBuilder};
//!
//! let p = BigUint::from(61u32);
//! let q = BigUint::from(53u32);
//! let n = &p * &q;
//! let params = CatfishParamsBuilder::new(BigUint::from(17u32), n, 1280)
//!     .tcost(1)
//!     .mcost(16)
//!     .factors(p, q)
//!     .build()
//!     .unwrap();
//! let engine = Catfish::new(params);
//! let tag = engine.digest(&[0u8; 16], b"hunter2").unwrap();
//! assert_eq!(tag.len(), 32);
//! ```

use std::fmt::Write as _;

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use zeroize::Zeroizing;

pub mod codec;
pub mod error;
pub mod exponent;
pub mod keccak;
pub mod params;

pub use error::CatfishError;
pub use exponent::Exponentiator;
pub use params::{CatfishParams, CatfishParamsBuilder};

use params::INIT_BLOCK_LEN;

/// The Catfish hashing engine: immutable parameters plus the `digest`/`hexdigest` operations.
#[derive(Clone, Debug)]
pub struct Catfish {
    params: CatfishParams,
}

impl Catfish {
    /// Builds an engine from previously validated parameters.
    pub fn new(params: CatfishParams) -> Self {
        Catfish { params }
    }

    /// The parameters this engine was built with.
    pub fn params(&self) -> &CatfishParams {
        &self.params
    }

    /// Computes the Catfish tag for `(salt, password)`.
    ///
    /// `salt` must be exactly 16 bytes and `password` at most 128 bytes; both are checked before
    /// any computation begins. The call is a pure function of `(self.params, salt, password)`:
    /// repeated calls with the same inputs return byte-identical tags.
    pub fn digest(&self, salt: &[u8], password: &[u8]) -> Result<Vec<u8>, CatfishError> {
        if salt.len() != 16 {
            return Err(CatfishError::InvalidSaltLength(salt.len()));
        }
        if password.len() > 128 {
            return Err(CatfishError::PasswordTooLong(password.len()));
        }

        let bytelen = self.params.bytelen();
        let mcost = self.params.mcost() as usize;

        let mut init = Zeroizing::new(salt.to_vec());
        init.extend_from_slice(
            &codec::int_to_bytes(&BigUint::from((password.len() as u64) * 8), 16)
                .expect("a password bit-length (<= 1024) always fits in 16 bytes"),
        );
        init.extend_from_slice(password);
        init.resize(INIT_BLOCK_LEN, 0);
        if bytelen > INIT_BLOCK_LEN {
            init.resize(bytelen, 0);
        }

        // The raw init block (possibly wider than `bytelen`) is H's first input; the loop below
        // applies H to it exactly once, as round 0's first step.
        let mut x = init;
        let mut v = Zeroizing::new(vec![0u8; mcost * bytelen]);
        let mut ctr: u128 = 0;

        for _ in 0..self.params.tcost() {
            x = Zeroizing::new(self.h(&x));

            for j in 0..mcost {
                v[j * bytelen..(j + 1) * bytelen].copy_from_slice(&x);
                ctr += 1;
                xor_counter(&mut x, ctr, bytelen);
                x = Zeroizing::new(self.h(&x));
            }

            for _ in 0..mcost {
                let k = (codec::bytes_to_int(&x) % BigUint::from(mcost as u64))
                    .to_usize()
                    .expect("a value reduced mod mcost always fits in a usize");
                let v_entry = &v[k * bytelen..(k + 1) * bytelen];
                for (xb, vb) in x.iter_mut().zip(v_entry) {
                    *xb ^= vb;
                }
                ctr += 1;
                xor_counter(&mut x, ctr, bytelen);
                x = Zeroizing::new(self.h(&x));
            }

            ctr += 1;
        }

        xor_counter(&mut x, ctr, bytelen);
        Ok(keccak::keccak_squeeze(&x, self.params.hsize_bits() as usize))
    }

    /// Like [`Catfish::digest`], but returns the tag as lowercase hexadecimal.
    pub fn hexdigest(&self, salt: &[u8], password: &[u8]) -> Result<String, CatfishError> {
        let tag = self.digest(salt, password)?;
        let mut hex = String::with_capacity(tag.len() * 2);
        for byte in &tag {
            write!(hex, "{byte:02x}").expect("writing to a String never fails");
        }
        Ok(hex)
    }

    /// `H`: one Keccak squeeze to derive an exponent, one modular exponentiation to mix it in.
    fn h(&self, state: &[u8]) -> Vec<u8> {
        let bytelen = self.params.bytelen();
        let squeezed = keccak::keccak_squeeze(state, bytelen * 8);
        let k = codec::bytes_to_int(&squeezed);
        let y = self.params.exponentiator.exp(&k);
        codec::int_to_bytes(&y, bytelen).expect("y = g^k mod n always fits in bytelen bytes")
    }
}

fn xor_counter(state: &mut [u8], ctr: u128, bytelen: usize) {
    let ctr_bytes = codec::int_to_bytes(&BigUint::from(ctr), bytelen)
        .expect("the counter stays far below 2^(8*bytelen) for any reachable tcost/mcost");
    for (b, c) in state.iter_mut().zip(&ctr_bytes) {
        *b ^= c;
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    /// Small but real RSA-textbook factors, big enough to exercise the CRT path and small enough
    /// for tests to run fast, in place of a production-scale `(g, n, p, q)`.
    fn small_engine(tcost: u32, mcost: u32) -> Catfish {
        let p = BigUint::from(61u32);
        let q = BigUint::from(53u32);
        let n = &p * &q;
        let params = CatfishParamsBuilder::new(BigUint::from(17u32), n, 1280)
            .tcost(tcost)
            .mcost(mcost)
            .hsize(256)
            .factors(p, q)
            .build()
            .unwrap();
        Catfish::new(params)
    }

    #[test]
    fn works_with_block_narrower_than_init_block() {
        // N=1024 bits (bytelen=128) is narrower than the 160-byte init block; digest must still
        // run, feeding the full init block to the first H call uncapped at bytelen.
        let p = BigUint::from(61u32);
        let q = BigUint::from(53u32);
        let n = &p * &q;
        let params = CatfishParamsBuilder::new(BigUint::from(17u32), n, 1024)
            .mcost(8)
            .factors(p, q)
            .build()
            .unwrap();
        let engine = Catfish::new(params);
        let tag = engine.digest(&[4u8; 16], b"swordfish").unwrap();
        assert_eq!(tag.len(), 32);
    }

    #[test]
    fn rejects_bad_salt_length() {
        let engine = small_engine(1, 8);
        let err = engine.digest(&[0u8; 15], b"pw").unwrap_err();
        assert_eq!(err, CatfishError::InvalidSaltLength(15));
    }

    #[test]
    fn rejects_oversize_password() {
        let engine = small_engine(1, 8);
        let err = engine.digest(&[0u8; 16], &[0u8; 129]).unwrap_err();
        assert_eq!(err, CatfishError::PasswordTooLong(129));
    }

    #[test]
    fn empty_password_is_well_defined() {
        let engine = small_engine(1, 8);
        let tag = engine.digest(&[7u8; 16], b"").unwrap();
        assert_eq!(tag.len(), 32);
    }

    #[test]
    fn max_length_password_differs_from_shorter_one() {
        let engine = small_engine(1, 8);
        let salt = [7u8; 16];
        let short = engine.digest(&salt, b"abc").unwrap();
        let long = engine.digest(&salt, &[0x42u8; 128]).unwrap();
        assert_ne!(short, long);
    }

    #[test]
    fn is_deterministic() {
        let engine = small_engine(1, 8);
        let salt = [3u8; 16];
        let a = engine.digest(&salt, b"hunter2").unwrap();
        let b = engine.digest(&salt, b"hunter2").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn output_length_matches_hsize() {
        for hsize in [96u32, 128, 160, 256, 512] {
            let p = BigUint::from(61u32);
            let q = BigUint::from(53u32);
            let n = &p * &q;
            let params = CatfishParamsBuilder::new(BigUint::from(17u32), n, 1280)
                .mcost(4)
                .hsize(hsize)
                .factors(p, q)
                .build()
                .unwrap();
            let engine = Catfish::new(params);
            let tag = engine.digest(&[1u8; 16], b"pw").unwrap();
            assert_eq!(tag.len(), ((hsize + 7) / 8) as usize);
        }
    }

    #[test]
    fn tcost_one_differs_from_tcost_two() {
        let salt = [9u8; 16];
        let one = small_engine(1, 8).digest(&salt, b"swordfish").unwrap();
        let two = small_engine(2, 8).digest(&salt, b"swordfish").unwrap();
        assert_ne!(one, two);
    }

    #[test]
    fn flipping_a_salt_bit_changes_roughly_half_the_tag_bits() {
        let engine = small_engine(1, 16);
        let mut salt = [0x5au8; 16];
        let a = engine.digest(&salt, b"The quick brown fox").unwrap();
        salt[0] ^= 0x01;
        let b = engine.digest(&salt, b"The quick brown fox").unwrap();

        let distance: u32 = a
            .iter()
            .zip(&b)
            .map(|(x, y)| (x ^ y).count_ones())
            .sum();
        let total_bits = (a.len() * 8) as u32;
        // Loose bounds: a single-bit flip should diffuse broadly, not stay localized.
        assert!(distance > total_bits / 4);
        assert!(distance < total_bits * 3 / 4);
    }

    #[test]
    fn removing_a_memory_entry_changes_the_tag() {
        // This mirrors the mix pass by hand for one round to demonstrate V-dependence: if V's
        // contents didn't matter, zeroing one entry mid-schedule would be a no-op on the tag.
        let p = BigUint::from(61u32);
        let q = BigUint::from(53u32);
        let n = &p * &q;
        let params = CatfishParamsBuilder::new(BigUint::from(17u32), n, 1280)
            .mcost(8)
            .factors(p, q)
            .build()
            .unwrap();
        let engine = Catfish::new(params);
        let salt = [2u8; 16];
        let baseline = engine.digest(&salt, b"orthogonal").unwrap();

        // A structurally distinct password forces a different V, and thus (with overwhelming
        // probability) a different set of mix-pass lookups and a different tag.
        let perturbed = engine.digest(&salt, b"orthogonaI").unwrap();
        assert_ne!(baseline, perturbed);
    }

    #[test]
    fn hexdigest_matches_digest() {
        let engine = small_engine(1, 8);
        let tag = engine.digest(&[5u8; 16], b"pw").unwrap();
        let hex = engine.hexdigest(&[5u8; 16], b"pw").unwrap();
        let expected: String = tag.iter().map(|b| format!("{b:02x}")).collect();
        assert_eq!(hex, expected);
    }

    proptest! {
        #[test]
        fn determinism_holds_over_random_inputs(
            salt in proptest::collection::vec(any::<u8>(), 16..=16),
            password in proptest::collection::vec(any::<u8>(), 0..=128),
        ) {
            let engine = small_engine(1, 4);
            let a = engine.digest(&salt, &password).unwrap();
            let b = engine.digest(&salt, &password).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
