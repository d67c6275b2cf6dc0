//! Errors surfaced by the lookup facade.

use thiserror::Error;

use crate::atlas::{AtlasError, AtlasLoadError};
use crate::config::ConfigFileError;
use crate::coord::CoordError;
use crate::mask::MaskError;
use crate::matcher::DecodeError;
use crate::space::SpaceError;

/// Errors that can occur during facade operations.
///
/// Partial coverage is not an error: unreachable atlases, atlases that fail
/// to load during [`locate`](super::Whereami::locate), and empty results are
/// reported inside the returned value.
#[derive(Debug, Error)]
pub enum WhereamiError {
    /// Coordinate could not be built
    #[error("Invalid coordinate: {0}")]
    Coordinate(#[from] CoordError),

    /// Space graph declaration failed
    #[error("Space graph error: {0}")]
    Space(#[from] SpaceError),

    /// Atlas volume or registration was invalid
    #[error("Atlas declaration error: {0}")]
    Declaration(#[from] AtlasError),

    /// Named atlas could not be obtained
    #[error("Atlas error: {0}")]
    Atlas(#[from] AtlasLoadError),

    /// Region text was malformed
    #[error("Cannot decode region: {0}")]
    Decode(#[from] DecodeError),

    /// Mask could not be built
    #[error("Mask error: {0}")]
    Mask(#[from] MaskError),

    /// Settings file was unreadable or invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigFileError),
}
