// Copyright @yucwang 2026

use std::fmt;

/// Failure of a single render pass. Geometry and shading never fail; only
/// the tile workers backing a frame can.
#[derive(Debug)]
pub enum RenderError {
    /// A tile worker panicked; the frame was not completed.
    WorkerPanicked,
    /// Workers stopped reporting before every tile of the frame came back.
    TileChannelClosed { received: usize, expected: usize },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::WorkerPanicked => write!(f, "a tile worker panicked during the frame"),
            RenderError::TileChannelClosed { received, expected } => {
                write!(f, "frame interrupted after {} of {} tiles", received, expected)
            }
        }
    }
}

impl std::error::Error for RenderError {}

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(err) => write!(f, "failed to read settings: {}", err),
            SettingsError::Parse(err) => write!(f, "failed to parse settings: {}", err),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(err) => Some(err),
            SettingsError::Parse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl From<toml::de::Error> for SettingsError {
    fn from(err: toml::de::Error) -> Self {
        SettingsError::Parse(err)
    }
}
