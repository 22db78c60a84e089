//! Integration tests for the extraction retry protocol against a canned
//! invoker: invocation-count invariants, terminal error contents, and the
//! end-to-end repair scenarios.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use siniestro_extraction::{
    ContentBlock, ExtractionError, ExtractionRequest, InvokeError, Message, ModelInvoker,
    ModelResponse, PromptStore, SchemaValidator, StructuredExtractor,
};

/// Invoker replaying a fixed response sequence, recording every request.
struct CannedInvoker {
    responses: Vec<Result<String, String>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl CannedInvoker {
    fn new(responses: Vec<Result<String, String>>) -> Self {
        Self {
            responses,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn with_texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok((*t).to_string())).collect())
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn recorded_requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelInvoker for CannedInvoker {
    async fn invoke(&self, messages: &[Message]) -> Result<ModelResponse, InvokeError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(messages.to_vec());
        match self.responses.get(call) {
            Some(Ok(text)) => Ok(ModelResponse::from(text.clone())),
            Some(Err(cause)) => Err(InvokeError::new(cause)),
            None => panic!("invoker called more times than responses were canned"),
        }
    }
}

fn store() -> PromptStore {
    PromptStore::from_yaml_str("eval_task: Evalúa el caso y responde en JSON.\n").unwrap()
}

fn request() -> ExtractionRequest {
    ExtractionRequest::new("eval_task", vec![ContentBlock::text("caso de prueba")])
}

fn rejecting_validator() -> SchemaValidator {
    Arc::new(|_| Err("always wrong".to_string()))
}

#[tokio::test]
async fn fenced_response_succeeds_on_first_invocation() {
    let invoker = CannedInvoker::with_texts(&["```json\n{\"a\": 1}\n```"]);
    let prompts = store();
    let extractor = StructuredExtractor::new(&invoker, &prompts);

    let value = extractor.evaluate(&request()).await.unwrap();
    assert_eq!(value, json!({"a": 1}));
    assert_eq!(invoker.call_count(), 1);
}

#[tokio::test]
async fn malformed_then_valid_uses_exactly_two_invocations() {
    let invoker = CannedInvoker::with_texts(&["not json", "{\"a\": 1}"]);
    let prompts = store();
    let extractor = StructuredExtractor::new(&invoker, &prompts);

    let value = extractor
        .evaluate(&request().with_max_retries(1))
        .await
        .unwrap();
    assert_eq!(value, json!({"a": 1}));
    assert_eq!(invoker.call_count(), 2);

    // The corrective message carries the previous bad output verbatim.
    let second_request = &invoker.recorded_requests()[1];
    let user_text = second_request[1].text_content();
    assert!(user_text.contains("not json"));
    assert!(user_text.contains("NOT valid JSON"));
}

#[tokio::test]
async fn zero_retries_means_exactly_one_invocation() {
    let invoker = CannedInvoker::with_texts(&["still not json"]);
    let prompts = store();
    let extractor = StructuredExtractor::new(&invoker, &prompts);

    let err = extractor
        .evaluate(&request().with_max_retries(0))
        .await
        .unwrap_err();
    assert_eq!(invoker.call_count(), 1);
    match err {
        ExtractionError::RetriesExhausted {
            attempts, raw_text, ..
        } => {
            assert_eq!(attempts, 1);
            assert_eq!(raw_text, "still not json");
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn at_most_n_plus_one_invocations() {
    let invoker = CannedInvoker::with_texts(&["bad 1", "bad 2", "bad 3", "bad 4"]);
    let prompts = store();
    let extractor = StructuredExtractor::new(&invoker, &prompts);

    let err = extractor
        .evaluate(&request().with_max_retries(3))
        .await
        .unwrap_err();
    assert_eq!(invoker.call_count(), 4);
    match err {
        ExtractionError::RetriesExhausted {
            attempts, raw_text, ..
        } => {
            assert_eq!(attempts, 4);
            // Raw text is the LAST attempt's output, not an earlier one.
            assert_eq!(raw_text, "bad 4");
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn success_on_retry_k_makes_k_plus_one_invocations() {
    let invoker = CannedInvoker::with_texts(&["bad", "also bad", "{\"ok\": true}"]);
    let prompts = store();
    let extractor = StructuredExtractor::new(&invoker, &prompts);

    let value = extractor
        .evaluate(&request().with_max_retries(5))
        .await
        .unwrap();
    assert_eq!(value, json!({"ok": true}));
    assert_eq!(invoker.call_count(), 3);
}

#[tokio::test]
async fn always_rejecting_validator_exhausts_retries_with_last_raw_text() {
    let invoker = CannedInvoker::with_texts(&["{\"v\": 1}", "{\"v\": 2}"]);
    let prompts = store();
    let extractor = StructuredExtractor::new(&invoker, &prompts);

    let err = extractor
        .evaluate(
            &request()
                .with_validator(rejecting_validator())
                .with_max_retries(1),
        )
        .await
        .unwrap_err();
    assert_eq!(invoker.call_count(), 2);
    match err {
        ExtractionError::RetriesExhausted {
            raw_text,
            last_error,
            ..
        } => {
            assert_eq!(raw_text, "{\"v\": 2}");
            assert!(last_error.to_string().contains("always wrong"));
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_prompt_fails_without_invoking_the_model() {
    let invoker = CannedInvoker::with_texts(&[]);
    let prompts = store();
    let extractor = StructuredExtractor::new(&invoker, &prompts);

    let req = ExtractionRequest::new("no_such_prompt", vec![]);
    let err = extractor.evaluate(&req).await.unwrap_err();
    assert_eq!(invoker.call_count(), 0);
    assert!(matches!(err, ExtractionError::PromptMissing { name } if name == "no_such_prompt"));
}

#[tokio::test]
async fn transport_failure_is_caught_as_terminal_error() {
    let invoker = CannedInvoker::new(vec![Err("connection refused".to_string())]);
    let prompts = store();
    let extractor = StructuredExtractor::new(&invoker, &prompts);

    let err = extractor.evaluate(&request()).await.unwrap_err();
    assert_eq!(invoker.call_count(), 1);
    match err {
        ExtractionError::Transport(cause) => {
            assert!(cause.to_string().contains("connection refused"));
        }
        other => panic!("expected Transport, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_response_is_retried_like_a_parse_failure() {
    let invoker = CannedInvoker::with_texts(&["", "{\"a\": 1}"]);
    let prompts = store();
    let extractor = StructuredExtractor::new(&invoker, &prompts);

    let value = extractor
        .evaluate(&request().with_max_retries(1))
        .await
        .unwrap();
    assert_eq!(value, json!({"a": 1}));
    assert_eq!(invoker.call_count(), 2);
}

#[tokio::test]
async fn schema_description_is_appended_to_the_system_prompt() {
    let invoker = CannedInvoker::with_texts(&["{\"a\": 1}"]);
    let prompts = store();
    let extractor = StructuredExtractor::new(&invoker, &prompts);

    extractor
        .evaluate(&request().with_schema_description("{\"a\": number}"))
        .await
        .unwrap();

    let system_text = invoker.recorded_requests()[0][0].text_content();
    assert!(system_text.contains("Evalúa el caso"));
    assert!(system_text.contains("# OUTPUT FORMAT (REQUIRED)"));
    assert!(system_text.contains("{\"a\": number}"));
}

#[tokio::test]
async fn force_json_only_false_leaves_the_prompt_untouched() {
    let invoker = CannedInvoker::with_texts(&["{\"a\": 1}"]);
    let prompts = store();
    let extractor = StructuredExtractor::new(&invoker, &prompts);

    extractor
        .evaluate(&request().with_force_json_only(false))
        .await
        .unwrap();

    let system_text = invoker.recorded_requests()[0][0].text_content();
    assert!(!system_text.contains("# OUTPUT FORMAT"));
}

#[tokio::test]
async fn identical_inputs_yield_identical_results() {
    // Two independent runs over the same canned sequence are deterministic.
    let run = || async {
        let invoker = CannedInvoker::with_texts(&["nope", "{\"a\": [1, 2]}"]);
        let prompts = store();
        let extractor = StructuredExtractor::new(&invoker, &prompts);
        let value = extractor
            .evaluate(&request().with_max_retries(1))
            .await
            .unwrap();
        (value, invoker.call_count())
    };

    let first = run().await;
    let second = run().await;
    assert_eq!(first, second);
    assert_eq!(first.0, json!({"a": [1, 2]}));
}
