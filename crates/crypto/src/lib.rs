//! Generic finite-field/elliptic-curve arithmetic, the secp256k1
//! specialization Bitcoin uses, and deterministic-k ECDSA signing,
//! verification, SEC encoding, and WIF export built on top of it.
//!
//! The curve machinery (`field`, `point`) is deliberately generic rather
//! than baked into secp256k1 directly, so it can be exercised against the
//! small toy curves used in textbook test vectors as well as the real
//! secp256k1 parameters in [`secp256k1`].

pub mod ecdsa;
pub mod error;
pub mod field;
pub mod point;
pub mod sec;
pub mod secp256k1;
pub mod signature;

pub use ecdsa::{deterministic_k, verify, PrivateKey};
pub use error::Error;
pub use field::FieldElement;
pub use point::Point;
pub use signature::Signature;
