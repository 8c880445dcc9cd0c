// caskforge-core/src/fetch/mod.rs
pub mod git;
