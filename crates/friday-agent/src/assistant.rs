use crate::error::AgentError;
use crate::selector::select_provider;
use crate::tools::ToolSet;
use friday_types::{Capabilities, Credentials, ProviderConfig, AGENT_INSTRUCTION};

/// The assistant persona: instructions, one provider and the tool set.
///
/// The provider is chosen once at construction and never changes.
#[derive(Debug, Clone)]
pub struct Assistant {
    instructions: String,
    provider: ProviderConfig,
    tools: ToolSet,
}

impl Assistant {
    /// Builds the assistant, selecting its provider.
    ///
    /// # Errors
    ///
    /// Returns `AgentError::NoProviderAvailable` when no provider qualifies.
    /// An assistant without a provider is never constructed.
    pub fn new(
        capabilities: &Capabilities,
        credentials: &Credentials,
        tools: ToolSet,
    ) -> Result<Self, AgentError> {
        let provider = select_provider(capabilities, credentials)?;
        Ok(Self::with_provider(provider, tools))
    }

    pub fn with_provider(provider: ProviderConfig, tools: ToolSet) -> Self {
        Self {
            instructions: AGENT_INSTRUCTION.to_string(),
            provider,
            tools,
        }
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use friday_types::ProviderId;

    #[test]
    fn construction_fails_without_provider() {
        let err = Assistant::new(&Capabilities::all(), &Credentials::default(), ToolSet::empty())
            .unwrap_err();
        match err {
            AgentError::NoProviderAvailable(inner) => assert_eq!(inner.statuses.len(), 2),
            other => panic!("expected NoProviderAvailable, got {:?}", other),
        }
    }

    #[test]
    fn construction_selects_provider() {
        let credentials = Credentials::default().with(ProviderId::Google, "g-key");
        let assistant =
            Assistant::new(&Capabilities::all(), &credentials, ToolSet::empty()).unwrap();
        assert_eq!(assistant.provider().provider(), ProviderId::Google);
        assert_eq!(assistant.instructions(), AGENT_INSTRUCTION);
    }
}
