//! Optional capability tags.
//!
//! A capability is an optional feature that may or may not be present in the
//! running build, such as a provider integration or an input filter. The set
//! is probed once at startup and then consumed as plain data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// An optional capability that can be compiled in or left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Realtime speech-to-speech model integration.
    RealtimeVoice,
    /// Chat model plus separate text-to-speech integration.
    ChatSpeech,
    /// Enhanced noise cancellation on the room input.
    NoiseCancellation,
}

impl Capability {
    /// All known capabilities, in a stable order.
    pub const ALL: [Capability; 3] = [
        Capability::RealtimeVoice,
        Capability::ChatSpeech,
        Capability::NoiseCancellation,
    ];

    /// Returns the string label for this capability.
    pub fn label(self) -> &'static str {
        match self {
            Self::RealtimeVoice => "realtime_voice",
            Self::ChatSpeech => "chat_speech",
            Self::NoiseCancellation => "noise_cancellation",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The set of capabilities available to this process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    available: BTreeSet<Capability>,
}

impl Capabilities {
    /// An empty set: nothing optional is available.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every known capability.
    pub fn all() -> Self {
        Capability::ALL.into_iter().collect()
    }

    /// Returns a copy of this set with `capability` added.
    pub fn with(mut self, capability: Capability) -> Self {
        self.available.insert(capability);
        self
    }

    /// Returns a copy of this set with `capability` removed.
    pub fn without(mut self, capability: Capability) -> Self {
        self.available.remove(&capability);
        self
    }

    pub fn insert(&mut self, capability: Capability) {
        self.available.insert(capability);
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.available.contains(&capability)
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.available.iter().copied()
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self {
            available: iter.into_iter().collect(),
        }
    }
}
