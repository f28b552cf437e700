use std::fmt;
use std::str::FromStr;

/// Which slot of the failover chain produced a transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderTag {
    Primary,
    Secondary,
}

impl ProviderTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderTag::Primary => "primary",
            ProviderTag::Secondary => "secondary",
        }
    }
}

impl FromStr for ProviderTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" => Ok(ProviderTag::Primary),
            "secondary" => Ok(ProviderTag::Secondary),
            _ => Err(format!("Invalid provider tag: {}", s)),
        }
    }
}

impl fmt::Display for ProviderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A normalized speech-to-text result.
///
/// An empty `text` with confidence 0.0 is the legitimate "no speech
/// recognized" outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    pub text: String,
    pub confidence: f32,
    pub provider: ProviderTag,
}
