//! Reasoning Loop
//!
//! Implements the ReAct (Reason + Act) pattern for agent behavior.
//! The agent observes, thinks, acts (via tools), and responds. Call
//! ordering across tools is a soft contract carried by the prompt text;
//! the loop itself only executes whatever call the model emits next.

use std::sync::Arc;

use crate::error::{AgentError, Result};
use crate::message::{Conversation, Message, Role};
use crate::provider::{GenerationOptions, LlmProvider};
use crate::tool::{ToolCall, ToolRegistry, ToolResult};

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System prompt template
    pub system_prompt: String,

    /// Maximum reasoning iterations before giving up
    pub max_iterations: usize,

    /// Generation options
    pub generation: GenerationOptions,

    /// Whether to append tool descriptions to system prompt
    pub inject_tool_descriptions: bool,

    /// Abort the run when a tool reports failure instead of feeding the
    /// failure back for the model to recover from. Used by pipelines whose
    /// tool calls have permanent side effects and no retry policy.
    pub fail_on_tool_error: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_iterations: 10,
            generation: GenerationOptions::default(),
            inject_tool_descriptions: true,
            fail_on_tool_error: false,
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a helpful AI assistant.

When you need to use a tool, respond with a JSON block in this exact format:
```tool
{"tool": "tool_name", "arguments": {"arg1": "value1"}}
```

After receiving tool results, synthesize them into a helpful response.
If you can answer directly without tools, do so.
Be concise and accurate."#;

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self::new(provider, tools, AgentConfig::default())
    }

    /// Build the full system prompt including tool descriptions
    fn build_system_prompt(&self) -> String {
        let mut prompt = self.config.system_prompt.clone();

        if self.config.inject_tool_descriptions && !self.tools.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(&self.tools.generate_prompt_section());
        }

        prompt
    }

    /// Run the agent on a conversation
    pub async fn run(&self, conversation: &mut Conversation) -> Result<String> {
        // Ensure system prompt is set
        if conversation.messages().first().map(|m| &m.role) != Some(&Role::System) {
            let messages = conversation.messages_mut();
            messages.insert(0, Message::system(self.build_system_prompt()));
        }

        let mut iterations = 0;

        loop {
            iterations += 1;

            if iterations > self.config.max_iterations {
                return Err(AgentError::MaxIterations(self.config.max_iterations));
            }

            // Get completion from provider
            let completion = self.provider
                .complete(conversation.messages(), &self.config.generation)
                .await?;

            let content = completion.content.clone();

            // Add assistant response to conversation
            conversation.push(Message::assistant(&content));

            // Check for tool calls
            if let Some(tool_call) = self.parse_tool_call(&content) {
                tracing::debug!(tool = %tool_call.name, "Executing tool");

                // Execute the tool
                let result = self.execute_tool(&tool_call).await;

                if !result.success && self.config.fail_on_tool_error {
                    return Err(AgentError::ToolExecution(result.output));
                }

                // Add tool result to conversation
                let tool_message = self.format_tool_result(&result);
                conversation.push(Message::tool(tool_message, tool_call.id.clone()));

                // Continue reasoning loop
                continue;
            }

            // No tool call - this is the final response
            return Ok(content);
        }
    }

    /// Run with a simple string input (creates temporary conversation)
    pub async fn ask(&self, question: &str) -> Result<String> {
        let mut conversation = Conversation::with_system_prompt(self.build_system_prompt());
        conversation.push(Message::user(question));
        self.run(&mut conversation).await
    }

    /// Parse a tool call from LLM response
    fn parse_tool_call(&self, content: &str) -> Option<ToolCall> {
        // Look for ```tool ... ``` blocks
        let tool_start = "```tool";
        let tool_end = "```";

        if let Some(start_idx) = content.find(tool_start) {
            let after_marker = &content[start_idx + tool_start.len()..];
            if let Some(end_idx) = after_marker.find(tool_end) {
                let json_str = after_marker[..end_idx].trim();

                // Try to parse as ToolCall
                if let Ok(mut call) = serde_json::from_str::<ToolCall>(json_str) {
                    // Generate call ID if not present
                    if call.id.is_none() {
                        call.id = Some(uuid::Uuid::new_v4().to_string());
                    }
                    return Some(call);
                }
            }
        }

        // Fallback: try to find raw JSON with "tool" key
        self.parse_inline_tool_call(content)
    }

    /// Try to parse inline JSON tool call
    fn parse_inline_tool_call(&self, content: &str) -> Option<ToolCall> {
        // Look for JSON object with "tool" field
        if !content.contains(r#""tool""#) {
            return None;
        }

        // Find JSON boundaries
        let start = content.find('{')?;
        let end = content.rfind('}')?;

        if end <= start {
            return None;
        }

        let json_str = &content[start..=end];
        serde_json::from_str::<ToolCall>(json_str).ok()
    }

    /// Execute a tool call
    async fn execute_tool(&self, call: &ToolCall) -> ToolResult {
        match self.tools.execute(call).await {
            Ok(mut result) => {
                result.id = call.id.clone();
                result
            }
            Err(e) => {
                ToolResult {
                    name: call.name.clone(),
                    id: call.id.clone(),
                    success: false,
                    output: format!("Error: {}", e),
                    data: None,
                }
            }
        }
    }

    /// Format tool result for conversation
    fn format_tool_result(&self, result: &ToolResult) -> String {
        if result.success {
            format!("[Tool '{}' returned]\n{}", result.name, result.output)
        } else {
            format!("[Tool '{}' failed]\n{}", result.name, result.output)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{Completion, GenerationOptions};
    use crate::tool::{ParameterSchema, Tool, ToolSchema};
    use async_trait::async_trait;
    use std::collections::HashMap;
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
        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        async fn complete(
            &self,
            _messages: &[Message],
            options: &GenerationOptions,
        ) -> Result<Completion> {
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

    struct RecordingTool {
        calls: Arc<Mutex<Vec<ToolCall>>>,
    }

    #[async_trait]
    impl Tool for RecordingTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "record".into(),
                description: "Record the call".into(),
                parameters: vec![ParameterSchema {
                    name: "value".into(),
                    param_type: "string".into(),
                    description: "Anything".into(),
                    required: true,
                    default: None,
                }],
                has_side_effects: true,
            }
        }

        async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
            self.calls.lock().unwrap().push(call.clone());
            Ok(ToolResult::success("record", "recorded"))
        }
    }

    fn agent_with(provider: ScriptedProvider, calls: Arc<Mutex<Vec<ToolCall>>>) -> Agent {
        let mut tools = ToolRegistry::new();
        tools.register(RecordingTool { calls });
        Agent::with_defaults(Arc::new(provider), Arc::new(tools))
    }

    #[tokio::test]
    async fn test_loop_executes_tool_then_returns_final_answer() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let provider = ScriptedProvider::new(&[
            "```tool\n{\"tool\": \"record\", \"arguments\": {\"value\": \"x\"}}\n```",
            "all done",
        ]);
        let agent = agent_with(provider, calls.clone());

        let answer = agent.ask("please record x").await.unwrap();
        assert_eq!(answer, "all done");
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_direct_answer_skips_tools() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let provider = ScriptedProvider::new(&["no tools needed"]);
        let agent = agent_with(provider, calls.clone());

        let answer = agent.ask("hello").await.unwrap();
        assert_eq!(answer, "no tools needed");
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_tool_failure_is_fed_back_not_fatal() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let provider = ScriptedProvider::new(&[
            "```tool\n{\"tool\": \"bogus\", \"arguments\": {}}\n```",
            "recovered",
        ]);
        let agent = agent_with(provider, calls.clone());

        let answer = agent.ask("try something").await.unwrap();
        assert_eq!(answer, "recovered");
    }

    #[tokio::test]
    async fn test_max_iterations_cap() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        // Every response is a tool call; the loop must bail out.
        let script: Vec<&str> =
            vec!["```tool\n{\"tool\": \"record\", \"arguments\": {\"value\": \"x\"}}\n```"; 20];
        let provider = ScriptedProvider::new(&script);

        let mut tools = ToolRegistry::new();
        tools.register(RecordingTool { calls });
        let config = AgentConfig {
            max_iterations: 3,
            ..Default::default()
        };
        let agent = Agent::new(Arc::new(provider), Arc::new(tools), config);

        let err = agent.ask("loop forever").await.unwrap_err();
        assert!(matches!(err, AgentError::MaxIterations(3)));
    }

    #[tokio::test]
    async fn test_fail_on_tool_error_aborts_run() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let provider = ScriptedProvider::new(&[
            "```tool\n{\"tool\": \"bogus\", \"arguments\": {}}\n```",
            "would have recovered",
        ]);

        let mut tools = ToolRegistry::new();
        tools.register(RecordingTool { calls });
        let config = AgentConfig {
            fail_on_tool_error: true,
            ..Default::default()
        };
        let agent = Agent::new(Arc::new(provider), Arc::new(tools), config);

        let err = agent.ask("try something").await.unwrap_err();
        assert!(matches!(err, AgentError::ToolExecution(_)));
    }

    #[test]
    fn test_parse_fenced_tool_call() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let agent = agent_with(ScriptedProvider::new(&[]), calls);

        let call = agent
            .parse_tool_call(
                "```tool\n{\"tool\": \"record\", \"arguments\": {\"value\": \"z\"}}\n```",
            )
            .unwrap();
        assert_eq!(call.name, "record");
        assert!(call.id.is_some());
    }

    #[test]
    fn test_parse_inline_tool_call() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let agent = agent_with(ScriptedProvider::new(&[]), calls);

        let call = agent
            .parse_tool_call(r#"I'll record that. {"tool": "record", "arguments": {"value": "y"}}"#)
            .unwrap();
        assert_eq!(call.name, "record");

        let mut args = HashMap::new();
        args.insert("value".to_string(), serde_json::json!("y"));
        assert_eq!(call.arguments, args);
    }
}
