use serde::{Deserialize, Serialize};
use std::fmt;

/// Speech model tier sent to the provider
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TtsModel {
    /// `tts-1`
    #[default]
    Standard,
    /// `tts-1-hd`
    HighDefinition,
}

impl TtsModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "tts-1",
            Self::HighDefinition => "tts-1-hd",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "tts-1" => Some(Self::Standard),
            "tts-1-hd" => Some(Self::HighDefinition),
            _ => None,
        }
    }
}

// Голоса OpenAI. Неизвестные значения передаются провайдеру как есть.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TtsVoice {
    #[default]
    Alloy,
    Echo,
    Fable,
    Onyx,
    Nova,
    Shimmer,
    /// Anything else; the provider decides whether it is valid
    Other(String),
}

impl TtsVoice {
    pub const KNOWN: [TtsVoice; 6] = [
        TtsVoice::Alloy,
        TtsVoice::Echo,
        TtsVoice::Fable,
        TtsVoice::Onyx,
        TtsVoice::Nova,
        TtsVoice::Shimmer,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Alloy => "alloy",
            Self::Echo => "echo",
            Self::Fable => "fable",
            Self::Onyx => "onyx",
            Self::Nova => "nova",
            Self::Shimmer => "shimmer",
            Self::Other(name) => name,
        }
    }

    /// Display label used by the form
    pub fn label(&self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for TtsVoice {
    fn from(value: &str) -> Self {
        match value {
            "alloy" => Self::Alloy,
            "echo" => Self::Echo,
            "fable" => Self::Fable,
            "onyx" => Self::Onyx,
            "nova" => Self::Nova,
            "shimmer" => Self::Shimmer,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for TtsVoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TtsVoice {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TtsVoice {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(TtsVoice::from(value.as_str()))
    }
}
