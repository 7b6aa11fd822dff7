//! Computes `g^k mod n`, either directly or, when the factorization of `n` is known, via the
//! Chinese Remainder Theorem.
//!
//! The choice between the two is made once, at construction, and baked into the
//! [`Exponentiator`] variant — `H`'s call to [`Exponentiator::exp`] does not know or care which
//! path is active, per the re-architecture note that the digest loop stay oblivious to it.

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::error::CatfishError;

/// A modular exponentiator for a fixed generator `g` and modulus `n`.
#[derive(Clone, Debug)]
pub enum Exponentiator {
    /// Direct modular exponentiation; used when the factorization of `n` is not known.
    Slow { g: BigUint, n: BigUint },
    /// CRT-accelerated exponentiation; used when `n = p * q` is known.
    Fast {
        g: BigUint,
        n: BigUint,
        p: BigUint,
        q: BigUint,
        e_p: BigUint,
        e_q: BigUint,
    },
}

impl Exponentiator {
    /// Builds an exponentiator for `g^_ mod n`. If `factors` is `Some((p, q))`, the CRT fast
    /// path is precomputed and used; callers are expected to have already validated
    /// `1 < g < n` and, when factors are given, `p * q == n` (this is `CatfishParamsBuilder`'s
    /// job, so this constructor never fails).
    pub fn new(g: BigUint, n: BigUint, factors: Option<(BigUint, BigUint)>) -> Self {
        match factors {
            None => Exponentiator::Slow { g, n },
            Some((p, q)) => {
                let (x, y) = extended_euclidean(&BigInt::from(p.clone()), &BigInt::from(q.clone()));
                let n_signed = BigInt::from(n.clone());
                let e_p = mod_to_biguint(&(x * BigInt::from(p.clone())), &n_signed);
                let e_q = mod_to_biguint(&(y * BigInt::from(q.clone())), &n_signed);
                Exponentiator::Fast {
                    g,
                    n,
                    p,
                    q,
                    e_p,
                    e_q,
                }
            }
        }
    }

    fn g(&self) -> &BigUint {
        match self {
            Exponentiator::Slow { g, .. } => g,
            Exponentiator::Fast { g, .. } => g,
        }
    }

    fn n(&self) -> &BigUint {
        match self {
            Exponentiator::Slow { n, .. } => n,
            Exponentiator::Fast { n, .. } => n,
        }
    }

    /// Returns `g^k mod n`, via the fast CRT path if one was configured.
    pub fn exp(&self, k: &BigUint) -> BigUint {
        match self {
            Exponentiator::Slow { g, n } => g.modpow(k, n),
            Exponentiator::Fast {
                g,
                n,
                p,
                q,
                e_p,
                e_q,
            } => {
                let p_minus_1 = p - 1u32;
                let q_minus_1 = q - 1u32;
                let r_p = (g % p).modpow(&(k % &p_minus_1), p);
                let r_q = (g % q).modpow(&(k % &q_minus_1), q);
                (r_p * e_q + r_q * e_p) % n
            }
        }
    }

    /// Returns `g^k mod n` via direct exponentiation, bypassing any CRT path. Used only to audit
    /// the fast path under test; production code never calls both and compares.
    pub fn slow_exp(&self, k: &BigUint) -> BigUint {
        self.g().modpow(k, self.n())
    }

    /// Computes `exp(k)`, verifying it against [`Exponentiator::slow_exp`] first. Returns
    /// [`CatfishError::CrtInconsistent`] if they disagree, which indicates corrupted
    /// parameters (e.g. `p * q != n` despite the constructor's check, or a precomputed CRT
    /// coefficient was tampered with). Not used by [`crate::Catfish::digest`] itself — this is
    /// an opt-in diagnostic, not a per-call safety net, so it does not introduce a secret-data
    /// branch into the hot path.
    pub fn audit_exp(&self, k: &BigUint) -> Result<BigUint, CatfishError> {
        let fast = self.exp(k);
        let slow = self.slow_exp(k);
        if fast == slow {
            Ok(fast)
        } else {
            Err(CatfishError::CrtInconsistent)
        }
    }
}

/// Extended Euclidean algorithm: returns `(x, y)` such that `x*a + y*b == gcd(a, b)`.
fn extended_euclidean(a: &BigInt, b: &BigInt) -> (BigInt, BigInt) {
    let (mut a, mut b) = (a.clone(), b.clone());
    let mut x = BigInt::zero();
    let mut y = BigInt::one();
    let mut u = BigInt::one();
    let mut v = BigInt::zero();
    while !a.is_zero() {
        let (q, r) = b.div_mod_floor(&a);
        let m = &x - &u * &q;
        let n = &y - &v * &q;
        b = a;
        a = r;
        x = u;
        y = v;
        u = m;
        v = n;
    }
    (x, y)
}

fn mod_to_biguint(value: &BigInt, modulus: &BigInt) -> BigUint {
    value
        .mod_floor(modulus)
        .to_biguint()
        .expect("mod_floor against a positive modulus is always non-negative")
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn small_factors() -> (BigUint, BigUint, BigUint) {
        // p = 61, q = 53 are the textbook RSA-example primes; n = 3233.
        let p = BigUint::from(61u32);
        let q = BigUint::from(53u32);
        let n = &p * &q;
        (p, q, n)
    }

    #[test]
    fn crt_matches_slow_path_for_known_factors() {
        let (p, q, n) = small_factors();
        let g = BigUint::from(17u32);
        let exp = Exponentiator::new(g, n, Some((p, q)));
        for k in 0u32..200 {
            let k = BigUint::from(k);
            assert_eq!(exp.exp(&k), exp.slow_exp(&k));
        }
    }

    #[test]
    fn audit_passes_for_consistent_parameters() {
        let (p, q, n) = small_factors();
        let exp = Exponentiator::new(BigUint::from(17u32), n, Some((p, q)));
        assert!(exp.audit_exp(&BigUint::from(12345u32)).is_ok());
    }

    #[test]
    fn audit_detects_tampered_coefficients() {
        let (p, q, n) = small_factors();
        let mut exp = Exponentiator::new(BigUint::from(17u32), n, Some((p, q)));
        if let Exponentiator::Fast { e_p, .. } = &mut exp {
            *e_p += 1u32;
        }
        assert_eq!(
            exp.audit_exp(&BigUint::from(12345u32)),
            Err(CatfishError::CrtInconsistent)
        );
    }

    #[test]
    fn slow_path_has_no_factors() {
        let (_, _, n) = small_factors();
        let exp = Exponentiator::new(BigUint::from(17u32), n.clone(), None);
        assert_eq!(exp.exp(&BigUint::from(100u32)), exp.slow_exp(&BigUint::from(100u32)));
    }

    proptest! {
        #[test]
        fn crt_matches_slow_path_over_random_exponents(k in 0u64..3233) {
            let (p, q, n) = small_factors();
            let exp = Exponentiator::new(BigUint::from(17u32), n, Some((p, q)));
            let k = BigUint::from(k);
            prop_assert_eq!(exp.exp(&k), exp.slow_exp(&k));
        }
    }
}
