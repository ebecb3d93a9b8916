//! Codec configuration, fixed when the codec is registered.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opus application mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Application {
    /// Speech. Forces in-band FEC on.
    #[default]
    Voip,
    /// Music and mixed content.
    Audio,
    /// Lowest algorithmic delay, restricted feature set.
    LowDelay,
}

impl Application {
    pub fn to_engine(self) -> opus::Application {
        match self {
            Application::Voip => opus::Application::Voip,
            Application::Audio => opus::Application::Audio,
            Application::LowDelay => opus::Application::LowDelay,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Application::Voip => "voip",
            Application::Audio => "audio",
            Application::LowDelay => "low-delay",
        }
    }
}

impl fmt::Display for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown opus application {0:?} (expected voip, audio or low-delay)")]
pub struct ParseApplicationError(pub String);

impl FromStr for Application {
    type Err = ParseApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "voip" => Ok(Application::Voip),
            "audio" => Ok(Application::Audio),
            "low-delay" | "lowdelay" | "restricted-lowdelay" => Ok(Application::LowDelay),
            _ => Err(ParseApplicationError(s.to_string())),
        }
    }
}

/// Encoder defaults handed to every encoder the codec creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub application: Application,
    /// In-band forward error correction.
    pub fec: bool,
    /// Expected packet loss, 0-100. Higher values trade quality for loss resilience.
    pub packet_loss: u8,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            application: Application::Voip,
            fec: true,
            packet_loss: 10,
        }
    }
}

impl CodecConfig {
    pub fn new(application: Application, fec: bool, packet_loss: u8) -> Self {
        CodecConfig {
            application,
            fec,
            packet_loss,
        }
    }

    /// The configuration encoders are actually built with: VoIP always runs with FEC.
    pub fn normalized(self) -> Self {
        if self.application == Application::Voip && !self.fec {
            tracing::debug!("Enabling in-band FEC for voip application");
            return CodecConfig { fec: true, ..self };
        }
        self
    }

    /// Parse a config table such as:
    ///
    /// ```toml
    /// application = "audio"
    /// fec = false
    /// packet_loss = 5
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}
