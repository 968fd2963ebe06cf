use super::ProviderFactory;
use arena_application::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use arena_domain::ModelSpec;
use async_trait::async_trait;

/// Gateway that routes each model to the adapter for its provider
pub struct RoutingGateway {
    factory: ProviderFactory,
}

impl RoutingGateway {
    pub fn new(factory: ProviderFactory) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &ProviderFactory {
        &self.factory
    }
}

#[async_trait]
impl LlmGateway for RoutingGateway {
    async fn create_session(&self, model: &ModelSpec) -> Result<Box<dyn LlmSession>, GatewayError> {
        self.factory.create_session(model)
    }
}
