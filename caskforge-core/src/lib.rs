// caskforge-core/src/lib.rs
pub mod build;
pub mod fetch;
pub mod install;
pub mod uninstall;
