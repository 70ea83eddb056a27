use crate::config::Provider;
use crate::core::error::AitripError;
use crate::providers::{
    PlanProvider, ernie::ErnieProvider, gemini::GeminiProvider,
    openai_compatible::OpenAICompatibleProvider, qwen::QwenProvider,
    simulator::SimulatorProvider, spark::SparkProvider,
};
use std::collections::HashMap;

pub type ProviderCreator =
    Box<dyn Fn(&str) -> Result<Box<dyn PlanProvider>, AitripError> + Send + Sync>;

/// Static dispatch table from provider id to integration. Built once at
/// startup; adding a vendor means registering one more creator here, never
/// touching the dispatcher.
pub struct ProviderFactory {
    creators: HashMap<Provider, ProviderCreator>,
}

impl ProviderFactory {
    pub fn new() -> Self {
        let mut factory = Self {
            creators: HashMap::new(),
        };

        factory.register(
            Provider::Mock,
            Box::new(|_token| Ok(Box::new(SimulatorProvider) as Box<dyn PlanProvider>)),
        );

        factory.register(
            Provider::OpenAI,
            Box::new(|token| {
                Ok(Box::new(OpenAICompatibleProvider::new(
                    Provider::OpenAI.default_base_url().to_string(),
                    token,
                    "gpt-4o".to_string(),
                )) as Box<dyn PlanProvider>)
            }),
        );

        factory.register(
            Provider::Doubao,
            Box::new(|token| {
                Ok(Box::new(OpenAICompatibleProvider::new(
                    Provider::Doubao.default_base_url().to_string(),
                    token,
                    "doubao-pro-32k".to_string(),
                )) as Box<dyn PlanProvider>)
            }),
        );

        factory.register(
            Provider::Gemini,
            Box::new(|token| {
                Ok(Box::new(GeminiProvider::new(
                    Provider::Gemini.default_base_url().to_string(),
                    token,
                    "gemini-1.5-pro".to_string(),
                )) as Box<dyn PlanProvider>)
            }),
        );

        factory.register(
            Provider::QwenMax,
            Box::new(|token| {
                Ok(Box::new(QwenProvider::new(
                    Provider::QwenMax.default_base_url().to_string(),
                    token,
                    "qwen-max".to_string(),
                )) as Box<dyn PlanProvider>)
            }),
        );

        factory.register(
            Provider::Qwen3,
            Box::new(|token| {
                Ok(Box::new(QwenProvider::new(
                    Provider::Qwen3.default_base_url().to_string(),
                    token,
                    "qwen-turbo".to_string(),
                )) as Box<dyn PlanProvider>)
            }),
        );

        factory.register(
            Provider::Ernie,
            Box::new(|token| {
                Ok(Box::new(ErnieProvider::new(
                    Provider::Ernie.default_base_url().to_string(),
                    token,
                    "ernie-4.0-8k".to_string(),
                )) as Box<dyn PlanProvider>)
            }),
        );

        factory.register(
            Provider::Spark,
            Box::new(|token| {
                Ok(Box::new(SparkProvider::new(
                    Provider::Spark.default_base_url().to_string(),
                    token,
                )) as Box<dyn PlanProvider>)
            }),
        );

        factory
    }

    pub fn register(&mut self, provider: Provider, creator: ProviderCreator) {
        self.creators.insert(provider, creator);
    }

    pub fn create(
        &self,
        provider: Provider,
        token: &str,
    ) -> Result<Box<dyn PlanProvider>, AitripError> {
        self.creators
            .get(&provider)
            .ok_or_else(|| AitripError::UnknownProvider(provider.to_string()))
            .and_then(|creator| creator(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_provider_is_registered() {
        let factory = ProviderFactory::new();
        for provider in Provider::all() {
            assert!(
                factory.create(*provider, "token").is_ok(),
                "no creator for {}",
                provider
            );
        }
    }

    #[test]
    fn unregistered_provider_is_reported() {
        let factory = ProviderFactory {
            creators: HashMap::new(),
        };
        let err = factory.create(Provider::OpenAI, "token").unwrap_err();
        assert!(matches!(err, AitripError::UnknownProvider(_)));
    }
}
