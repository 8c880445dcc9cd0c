// caskforge-common/src/model/mod.rs
pub mod artifact;
pub mod cask;

pub use artifact::InstalledArtifact;
pub use cask::{ArtifactSet, BinaryStanza, BuildSpec, Cask, DependsOn, Sha256Field, SourceSpec};
