// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use companion_chat_node::config::AppConfig;
    use companion_chat_node::conversation::{
        ConversationManager, Turn, FALLBACK_RESPONSES, SAFETY_RESPONSES,
    };
    use companion_chat_node::generation::{GenerationError, TextGenerator};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Returns a fixed continuation and counts invocations.
    struct ScriptedGenerator {
        reply: String,
        calls: AtomicUsize,
    }

    impl ScriptedGenerator {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            _prompt: &str,
            _max_new_tokens: usize,
        ) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(
            &self,
            _prompt: &str,
            _max_new_tokens: usize,
        ) -> Result<String, GenerationError> {
            Err(GenerationError::Backend("backend unavailable".to_string()))
        }
    }

    fn manager(generator: Arc<dyn TextGenerator>) -> ConversationManager {
        ConversationManager::new(generator, &AppConfig::default())
    }

    #[tokio::test]
    async fn test_scripted_reply_shaped_and_returned() {
        let generator = Arc::new(ScriptedGenerator::new(
            "  That sounds like a wonderful memory.  ",
        ));
        let reply = manager(generator.clone())
            .generate_response("I was remembering my old house.", &[])
            .await;

        assert_eq!(reply, "That sounds like a wonderful memory.");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concerning_input_never_reaches_generator() {
        let concerning = [
            "I want to die",
            "sometimes I think about suicide",
            "I might harm myself tonight",
            "should I kill myself?",
        ];

        for message in concerning {
            let generator = Arc::new(ScriptedGenerator::new("unused"));
            let reply = manager(generator.clone()).generate_response(message, &[]).await;

            assert!(
                SAFETY_RESPONSES.contains(&reply.as_str()),
                "expected safety response for {:?}, got {:?}",
                message,
                reply
            );
            assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        }
    }

    #[tokio::test]
    async fn test_failing_generator_yields_fallback() {
        let reply = manager(Arc::new(FailingGenerator))
            .generate_response("Tell me a story", &[])
            .await;

        assert!(FALLBACK_RESPONSES.contains(&reply.as_str()));
    }

    #[tokio::test]
    async fn test_rambling_generation_capped_at_sentence_boundary() {
        let rambling = "My garden is doing well this year. \
            The tomatoes came in early and the roses are blooming beautifully along the fence. \
            I spend most mornings out there with a cup of tea watching the birds come and go. \
            Yesterday a pair of finches built a nest in the apple tree.";
        assert!(rambling.len() > 200);

        let generator = Arc::new(ScriptedGenerator::new(rambling));
        let reply = manager(generator).generate_response("How is your garden?", &[]).await;

        assert!(reply.len() <= 200);
        assert!(reply.ends_with(['.', '!', '?']));
        assert!(reply.starts_with("My garden is doing well this year."));
    }

    #[tokio::test]
    async fn test_history_is_passed_through() {
        let history = vec![
            Turn {
                sender: "user".to_string(),
                text: "Good morning!".to_string(),
            },
            Turn {
                sender: "assistant".to_string(),
                text: "Good morning to you too.".to_string(),
            },
        ];

        let generator = Arc::new(ScriptedGenerator::new("It certainly is."));
        let reply = manager(generator)
            .generate_response("Lovely weather today.", &history)
            .await;

        assert_eq!(reply, "It certainly is.");
    }
}
