//! Payment-Link Planner
//!
//! Drives the three-step workflow (product → price → payment link) through
//! the LLM tool-call loop. The step ordering lives in the prompt text, the
//! same soft contract the original service relied on; the only hard
//! guarantees are that exactly these three tools are callable and that any
//! provider failure aborts the run.

use std::sync::Arc;

use linkgen_core::{
    provider::GenerationOptions, Agent, AgentConfig, LlmProvider, ToolRegistry,
};

use crate::error::{PaymentError, Result};
use crate::gateway::PaymentsGateway;
use crate::tools::{CreatePaymentLinkTool, CreatePriceTool, CreateProductTool};

/// System prompt for the payment-link planner
pub const PLANNER_SYSTEM_PROMPT: &str = r#"You are a helpful assistant that creates payment links.
When given a request, always follow these steps in order:
1. Create a product using create_product with a clear name and description
2. Create a price using create_price with the specified amount
3. Create a payment link using create_payment_link
Return only the final payment link URL."#;

/// Build the tool registry with the three payment actions
pub fn payment_tools(gateway: Arc<dyn PaymentsGateway>) -> ToolRegistry {
    let mut tools = ToolRegistry::new();
    tools.register(CreateProductTool::new(gateway.clone()));
    tools.register(CreatePriceTool::new(gateway.clone()));
    tools.register(CreatePaymentLinkTool::new(gateway));
    tools
}

/// Build the per-request task prompt embedding the free-text request
fn task_prompt(message: &str) -> String {
    format!(
        r#"Create a payment link for this request: {message}
Follow these steps exactly:
1. Create a product based on the request
2. Create a price for that product
3. Create and return a payment link

Return ONLY the payment link URL."#
    )
}

/// Run the planner for one payment-link request.
///
/// Returns the trimmed final answer (the payment link URL). An empty or
/// missing final answer is a parse error; any tool/provider failure aborts
/// the run with no cleanup of already-created entities.
pub async fn generate_payment_link(
    provider: Arc<dyn LlmProvider>,
    gateway: Arc<dyn PaymentsGateway>,
    model: &str,
    message: &str,
) -> Result<String> {
    let config = AgentConfig {
        system_prompt: PLANNER_SYSTEM_PROMPT.into(),
        generation: GenerationOptions {
            model: model.to_string(),
            ..Default::default()
        },
        fail_on_tool_error: true,
        ..Default::default()
    };

    let agent = Agent::new(provider, Arc::new(payment_tools(gateway)), config);

    // AgentError converts to PaymentError::Planner; covers LLM failures
    // and aborted tool calls alike.
    let answer = agent.ask(&task_prompt(message)).await?;

    let link = answer.trim();
    if link.is_empty() {
        return Err(PaymentError::Parse(
            "planner returned an empty final answer".into(),
        ));
    }

    tracing::info!(%link, "Generated payment link");

    Ok(link.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{FailingStep, MockPaymentsGateway};
    use async_trait::async_trait;
    use linkgen_core::{
        provider::Completion, AgentError, Message, Result as CoreResult,
    };
    use std::sync::Mutex;

    /// Provider that replays a fixed script of responses
    struct ScriptedProvider {
        script: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(responses: &[&str]) -> Self {
            let mut script: Vec<String> = responses.iter().map(|s| (*s).into()).collect();
            script.reverse();
            Self {
                script: Mutex::new(script),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn health_check(&self) -> CoreResult<bool> {
            Ok(true)
        }

        async fn complete(
            &self,
            _messages: &[Message],
            options: &GenerationOptions,
        ) -> CoreResult<Completion> {
            let content = self
                .script
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| AgentError::Provider("script exhausted".into()))?;
            Ok(Completion {
                content,
                model: options.model.clone(),
                usage: None,
                truncated: false,
            })
        }
    }

    const THREE_STEP_SCRIPT: [&str; 4] = [
        "```tool\n{\"tool\": \"create_product\", \"arguments\": {\"name\": \"Premium Coffee\", \"description\": \"A bag of premium coffee\"}}\n```",
        "```tool\n{\"tool\": \"create_price\", \"arguments\": {\"product\": \"prod_1\", \"unit_amount\": 1500, \"currency\": \"usd\"}}\n```",
        "```tool\n{\"tool\": \"create_payment_link\", \"arguments\": {\"price\": \"price_2\"}}\n```",
        "  https://buy.stripe.test/plink_3  ",
    ];

    #[tokio::test]
    async fn test_three_step_chain_returns_trimmed_url() {
        let provider = Arc::new(ScriptedProvider::new(&THREE_STEP_SCRIPT));
        let gateway = Arc::new(MockPaymentsGateway::new());

        let link = generate_payment_link(
            provider,
            gateway.clone(),
            "gpt-3.5-turbo",
            "a $15 bag of premium coffee",
        )
        .await
        .unwrap();

        assert_eq!(link, "https://buy.stripe.test/plink_3");
        assert_eq!(gateway.created_ids(), vec!["prod_1", "price_2", "plink_3"]);
    }

    #[tokio::test]
    async fn test_repeated_requests_create_distinct_entities() {
        let gateway = Arc::new(MockPaymentsGateway::new());

        // Same input twice; each run replays the same script but the
        // gateway keeps issuing fresh IDs.
        let first_script: Vec<&str> = THREE_STEP_SCRIPT.to_vec();
        let second_script: Vec<&str> = vec![
            THREE_STEP_SCRIPT[0],
            "```tool\n{\"tool\": \"create_price\", \"arguments\": {\"product\": \"prod_4\", \"unit_amount\": 1500, \"currency\": \"usd\"}}\n```",
            "```tool\n{\"tool\": \"create_payment_link\", \"arguments\": {\"price\": \"price_5\"}}\n```",
            "https://buy.stripe.test/plink_6",
        ];

        let first = generate_payment_link(
            Arc::new(ScriptedProvider::new(&first_script)),
            gateway.clone(),
            "gpt-3.5-turbo",
            "a $15 bag of premium coffee",
        )
        .await
        .unwrap();
        let second = generate_payment_link(
            Arc::new(ScriptedProvider::new(&second_script)),
            gateway.clone(),
            "gpt-3.5-turbo",
            "a $15 bag of premium coffee",
        )
        .await
        .unwrap();

        assert_ne!(first, second);
        assert_eq!(gateway.created_ids().len(), 6);
    }

    #[tokio::test]
    async fn test_empty_final_answer_is_parse_error() {
        let provider = Arc::new(ScriptedProvider::new(&["   "]));
        let gateway = Arc::new(MockPaymentsGateway::new());

        let err = generate_payment_link(provider, gateway, "gpt-3.5-turbo", "anything")
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::Parse(_)));
    }

    #[tokio::test]
    async fn test_provider_step_failure_aborts_without_rollback() {
        let provider = Arc::new(ScriptedProvider::new(&THREE_STEP_SCRIPT));
        let gateway = Arc::new(MockPaymentsGateway::failing_on(FailingStep::PaymentLink));

        let err = generate_payment_link(
            provider,
            gateway.clone(),
            "gpt-3.5-turbo",
            "a $15 bag of premium coffee",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, PaymentError::Planner(_)));
        // Product and price survive the failed chain.
        assert_eq!(gateway.created_ids(), vec!["prod_1", "price_2"]);
    }

    #[test]
    fn test_task_prompt_embeds_request() {
        let prompt = task_prompt("sell my handmade mug for $20");
        assert!(prompt.contains("sell my handmade mug for $20"));
        assert!(prompt.contains("Return ONLY the payment link URL."));
    }

    #[test]
    fn test_registry_has_exactly_three_tools() {
        let tools = payment_tools(Arc::new(MockPaymentsGateway::new()));
        let mut names = tools.names();
        names.sort_unstable();
        assert_eq!(
            names,
            vec!["create_payment_link", "create_price", "create_product"]
        );
    }
}
