// caskforge-core/src/build/mod.rs
pub mod devtools;
pub mod entitlements;
pub mod preflight;
pub mod xcode;
