use crate::config::Provider;
use crate::core::error::AitripError;
use crate::plan::PlanState;
use crate::protocol;
use crate::providers::Message;
use crate::providers::factory::ProviderFactory;
use tracing::debug;

/// One command round trip. Constructed fresh per call; all configuration
/// flows in here rather than being read from ambient storage.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub command: String,
    pub provider: String,
    pub token: String,
    pub state: PlanState,
    pub active_scenario: String,
}

#[derive(Debug, Clone)]
pub struct DispatchResult {
    pub display_text: String,
    /// Merged snapshot when the reply carried a valid update block,
    /// `None` when it did not. The caller decides whether to adopt it.
    pub applied_state: Option<PlanState>,
}

const SYSTEM_PROMPT: &str = r#"You are a travel planning assistant working in the {scenario} workspace.

Current plan state:
{state}

Answer the traveler's request in concise, friendly prose. When, and only when, the request implies a change to plan data, append exactly one fenced block to the end of your reply:

```json
{"updates": {"<section>": {"<field>": <new value>}}}
```

The block must contain a single top-level "updates" object mapping section names (itinerary, hotel, log, creation) to only the fields that changed. Omit unchanged fields and sections. Never emit the block for purely informational requests."#;

pub(crate) fn build_system_prompt(scenario: &str, state: &PlanState) -> String {
    let state_json = serde_json::to_string_pretty(state).unwrap_or_else(|_| "{}".to_string());
    SYSTEM_PROMPT
        .replace("{scenario}", scenario)
        .replace("{state}", &state_json)
}

/// Stateless command-to-reply orchestrator. Exactly one outbound network
/// call per invocation (zero for the simulator); no retries — a failed
/// call surfaces immediately to the caller.
pub struct Dispatcher {
    factory: ProviderFactory,
}

impl Dispatcher {
    pub fn new(factory: ProviderFactory) -> Self {
        Self { factory }
    }

    pub async fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchResult, AitripError> {
        let provider_id = Provider::from_str(&request.provider)
            .ok_or_else(|| AitripError::UnknownProvider(request.provider.clone()))?;

        // Simulator sentinel: no credential, no network, never a patch.
        if provider_id == Provider::Mock {
            let provider = self.factory.create(provider_id, "")?;
            let reply = provider
                .get_response(&[Message::user(request.command.clone())])
                .await?;
            return Ok(DispatchResult {
                display_text: reply.trim().to_string(),
                applied_state: None,
            });
        }

        if provider_id.requires_token() && request.token.trim().is_empty() {
            return Err(AitripError::MissingCredential(provider_id.to_string()));
        }

        let provider = self.factory.create(provider_id, &request.token)?;
        let messages = [
            Message::system(build_system_prompt(&request.active_scenario, &request.state)),
            Message::user(request.command.clone()),
        ];

        let raw_reply = provider
            .get_response(&messages)
            .await
            .map_err(service_error)?;
        debug!(provider = %provider_id, chars = raw_reply.len(), "received reply");

        let extraction = protocol::extract(&raw_reply, &request.state);
        let applied_state = extraction
            .patch
            .as_ref()
            .map(|patch| request.state.merge(patch));

        Ok(DispatchResult {
            display_text: extraction.display_text,
            applied_state,
        })
    }
}

/// Lower-level failures all reach the caller as one display-ready AI
/// service error; configuration mistakes keep their own variants.
fn service_error(err: AitripError) -> AitripError {
    match err {
        AitripError::MalformedResponse(msg)
        | AitripError::Network(msg)
        | AitripError::Serialization(msg) => AitripError::Api(msg),
        other => other,
    }
}
