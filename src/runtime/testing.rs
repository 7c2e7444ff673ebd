//! Mock implementations for testing
//!
//! These mocks enable integration testing of the runtime without real I/O.

use super::{Assistant, AssistantEvent, AssistantHandle, AssistantSnapshot, Submitted};
use crate::chat::{ChatRequest, ChatResponse, ChatTransport, TransportError};
use crate::state_machine::ExchangeContext;
use crate::store::{InMemoryKvStore, TranscriptStore};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, Semaphore};

// ============================================================================
// Mock Transport
// ============================================================================

/// Mock transport that returns queued responses
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<ChatResponse, TransportError>>>,
    /// When set, every send waits for a permit before answering
    gate: Option<Arc<Semaphore>>,
    /// Record of all requests made
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            gate: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Hold every reply until `release` is called
    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::new()
        }
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, response: impl Into<String>, ranked: &[&str]) {
        self.responses.lock().unwrap().push_back(Ok(ChatResponse {
            response: response.into(),
            ranked_course_ids: ranked.iter().map(ToString::to_string).collect(),
        }));
    }

    /// Queue an error response
    pub fn queue_error(&self, error: TransportError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Let one gated send through
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    /// Queued responses not yet handed out
    pub fn pending_responses(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::network("No mock response queued")))
    }

    fn endpoint(&self) -> &str {
        "mock://chat"
    }
}

// ============================================================================
// Test Assistant
// ============================================================================

pub const TEST_NAMESPACE: &str = "test:";

/// Running assistant wired to in-memory mocks
pub struct TestAssistant {
    pub handle: AssistantHandle,
    pub events: broadcast::Receiver<AssistantEvent>,
    pub transport: Arc<MockTransport>,
    pub kv: Arc<InMemoryKvStore>,
}

impl TestAssistant {
    pub fn builder() -> TestAssistantBuilder {
        TestAssistantBuilder::default()
    }
}

#[derive(Default)]
pub struct TestAssistantBuilder {
    transport: Option<MockTransport>,
    stored: Option<String>,
}

impl TestAssistantBuilder {
    pub fn transport(mut self, transport: MockTransport) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Raw value present in storage before the assistant starts
    pub fn stored(mut self, raw: impl Into<String>) -> Self {
        self.stored = Some(raw.into());
        self
    }

    pub async fn build(self) -> TestAssistant {
        let kv = Arc::new(InMemoryKvStore::new());
        if let Some(raw) = self.stored {
            kv.insert(&format!("{TEST_NAMESPACE}history"), &raw);
        }
        let transport = Arc::new(self.transport.unwrap_or_default());

        let store = TranscriptStore::new(kv.clone(), TEST_NAMESPACE);
        let handle = Assistant::start(store, transport.clone()).await;
        let events = handle.subscribe();

        TestAssistant {
            handle,
            events,
            transport,
            kv,
        }
    }
}

impl TestAssistant {
    pub async fn submit(&self, text: &str, context: ExchangeContext) -> Submitted {
        self.handle
            .submit(text, context)
            .await
            .expect("Failed to submit")
    }

    /// Collect events until one matches `stop`, or the timeout elapses
    pub async fn collect_until(
        &mut self,
        timeout: Duration,
        stop: impl Fn(&AssistantEvent) -> bool,
    ) -> (Vec<AssistantEvent>, bool) {
        let deadline = tokio::time::Instant::now() + timeout;
        let mut seen = Vec::new();
        while tokio::time::Instant::now() < deadline {
            match tokio::time::timeout(Duration::from_millis(50), self.events.recv()).await {
                Ok(Ok(event)) => {
                    let done = stop(&event);
                    seen.push(event);
                    if done {
                        return (seen, true);
                    }
                }
                _ => continue,
            }
        }
        (seen, false)
    }

    /// Wait for `ExchangeDone`, returning everything seen on the way
    pub async fn wait_for_done(&mut self, timeout: Duration) -> Option<Vec<AssistantEvent>> {
        let (events, done) = self
            .collect_until(timeout, |e| matches!(e, AssistantEvent::ExchangeDone))
            .await;
        done.then_some(events)
    }

    /// Wait for an error event and return its message
    pub async fn wait_for_error(&mut self, timeout: Duration) -> Option<String> {
        let (events, _) = self
            .collect_until(timeout, |e| matches!(e, AssistantEvent::Error { .. }))
            .await;
        events.into_iter().find_map(|e| match e {
            AssistantEvent::Error { message } => Some(message),
            _ => None,
        })
    }

    /// Wait for a specific state type with timeout
    pub async fn wait_for_state(&mut self, expected_type: &str, timeout: Duration) -> bool {
        let (_, found) = self
            .collect_until(timeout, |e| match e {
                AssistantEvent::StateChange { state } => {
                    state.get("type").and_then(|v| v.as_str()) == Some(expected_type)
                }
                _ => false,
            })
            .await;
        found
    }

    /// Wait until the published snapshot satisfies `pred`
    pub async fn wait_for_snapshot(
        &self,
        timeout: Duration,
        pred: impl FnMut(&AssistantSnapshot) -> bool,
    ) -> Option<AssistantSnapshot> {
        let mut rx = self.handle.watch();
        let snapshot = match tokio::time::timeout(timeout, rx.wait_for(pred)).await {
            Ok(Ok(snapshot)) => Some(snapshot.clone()),
            _ => None,
        };
        snapshot
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::Course;
    use crate::store::KvStore;
    use crate::transcript::{Message, Transcript, WELCOME_MESSAGE};

    const WAIT: Duration = Duration::from_secs(2);

    fn context_with(numbers: &[&str]) -> ExchangeContext {
        ExchangeContext {
            semester: "1131".to_string(),
            courses: numbers.iter().copied().map(Course::new).collect(),
            selected_course_ids: vec![],
        }
    }

    #[tokio::test]
    async fn test_mock_transport_queue_and_record() {
        let mock = MockTransport::new();
        mock.queue_reply("Hello", &["AI50001"]);

        let request = ChatRequest::new(vec![Message::user("hi")], "1131", vec![]);
        let response = mock.send(&request).await.unwrap();
        assert_eq!(response.response, "Hello");
        assert_eq!(response.ranked_course_ids, vec!["AI50001"]);
        assert_eq!(mock.recorded_requests(), vec![request.clone()]);

        // Empty queue behaves like an unreachable endpoint
        assert!(mock.send(&request).await.is_err());
    }

    #[tokio::test]
    async fn test_reply_appended_and_persisted() {
        let transport = MockTransport::new();
        transport.queue_reply("推薦機器學習", &[]);

        let mut rt = TestAssistant::builder().transport(transport).build().await;
        rt.submit("有什麼AI課程?", context_with(&[])).await;
        assert!(rt.wait_for_done(WAIT).await.is_some());

        let requests = rt.transport.recorded_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages, vec![Message::user("有什麼AI課程?")]);
        assert_eq!(requests[0].semesters, "1131");

        let expected = vec![
            Message::assistant(WELCOME_MESSAGE),
            Message::user("有什麼AI課程?"),
            Message::assistant("推薦機器學習"),
        ];
        let snapshot = rt
            .wait_for_snapshot(WAIT, |s| !s.busy && s.transcript.len() == 3)
            .await
            .unwrap();
        assert_eq!(snapshot.transcript.messages(), expected.as_slice());

        let stored = rt.kv.get("test:history").await.unwrap().unwrap();
        let stored: Vec<Message> = serde_json::from_str(&stored).unwrap();
        assert_eq!(stored, expected);
    }

    #[tokio::test]
    async fn test_busy_drops_second_submit() {
        let transport = MockTransport::gated();
        transport.queue_reply("first answer", &[]);
        transport.queue_reply("never used", &[]);

        let mut rt = TestAssistant::builder().transport(transport).build().await;
        assert!(rt.submit("first", context_with(&[])).await.accepted);
        assert!(rt.wait_for_state("sending", WAIT).await);
        assert!(rt.handle.snapshot().busy);

        let second = rt.submit("second", context_with(&[])).await;
        assert!(!second.accepted);
        rt.transport.release();

        let events = rt.wait_for_done(WAIT).await.unwrap();
        assert!(!events
            .iter()
            .any(|e| matches!(e, AssistantEvent::Error { .. })));

        let snapshot = rt.wait_for_snapshot(WAIT, |s| !s.busy).await.unwrap();
        assert_eq!(snapshot.transcript.messages(), &[
            Message::assistant(WELCOME_MESSAGE),
            Message::user("first"),
            Message::assistant("first answer"),
        ]);
        assert_eq!(rt.transport.recorded_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_while_sending_drops_late_reply() {
        let transport = MockTransport::gated();
        transport.queue_reply("late answer", &[]);

        let mut rt = TestAssistant::builder().transport(transport).build().await;
        assert!(rt.submit("first", context_with(&[])).await.accepted);
        assert!(rt.handle.snapshot().busy);
        assert!(rt.kv.get("test:history").await.unwrap().is_some());

        rt.handle.clear().await.unwrap();
        let snapshot = rt.handle.snapshot();
        assert!(!snapshot.busy);
        assert_eq!(snapshot.transcript, Transcript::welcome());
        assert_eq!(rt.kv.get("test:history").await.unwrap(), None);

        // Let the abandoned request answer
        rt.transport.release();
        tokio::time::timeout(WAIT, async {
            while rt.transport.pending_responses() > 0 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
        let (_, done) = rt
            .collect_until(Duration::from_millis(300), |e| {
                matches!(e, AssistantEvent::ExchangeDone)
            })
            .await;
        assert!(!done);
        assert_eq!(rt.handle.snapshot().transcript, Transcript::welcome());
        assert_eq!(rt.kv.get("test:history").await.unwrap(), None);

        // A fresh exchange works normally afterwards
        rt.transport.queue_reply("fresh answer", &[]);
        assert!(rt.submit("again", context_with(&[])).await.accepted);
        rt.transport.release();
        assert!(rt.wait_for_done(WAIT).await.is_some());

        let snapshot = rt.wait_for_snapshot(WAIT, |s| !s.busy).await.unwrap();
        assert_eq!(snapshot.transcript.messages(), &[
            Message::assistant(WELCOME_MESSAGE),
            Message::user("again"),
            Message::assistant("fresh answer"),
        ]);
    }

    #[tokio::test]
    async fn test_failure_then_resend_replaces_unanswered() {
        let transport = MockTransport::new();
        transport.queue_error(TransportError::server_error("Chat server returned 500"));
        transport.queue_reply("second try worked", &[]);

        let mut rt = TestAssistant::builder().transport(transport).build().await;
        rt.submit("first", context_with(&[])).await;

        let message = rt.wait_for_error(WAIT).await.unwrap();
        assert_eq!(message, "Chat server returned 500");

        let snapshot = rt.wait_for_snapshot(WAIT, |s| !s.busy).await.unwrap();
        assert_eq!(snapshot.transcript.messages(), &[
            Message::assistant(WELCOME_MESSAGE),
            Message::user("first"),
        ]);

        rt.submit("edited", context_with(&[])).await;
        let events = rt.wait_for_done(WAIT).await.unwrap();
        assert!(!events
            .iter()
            .any(|e| matches!(e, AssistantEvent::Error { .. })));

        let requests = rt.transport.recorded_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].messages, vec![Message::user("edited")]);

        let snapshot = rt
            .wait_for_snapshot(WAIT, |s| !s.busy && s.transcript.len() == 3)
            .await
            .unwrap();
        assert_eq!(snapshot.transcript.messages(), &[
            Message::assistant(WELCOME_MESSAGE),
            Message::user("edited"),
            Message::assistant("second try worked"),
        ]);
    }

    #[tokio::test]
    async fn test_ranked_reply_reorders_courses() {
        let transport = MockTransport::new();
        transport.queue_reply("c3 then c1", &["c3", "c1"]);

        let mut rt = TestAssistant::builder().transport(transport).build().await;
        rt.submit("rank them", context_with(&["c1", "c2", "c3", "c4"])).await;

        let events = rt.wait_for_done(WAIT).await.unwrap();
        let reordered: Vec<String> = events
            .iter()
            .find_map(|e| match e {
                AssistantEvent::CoursesReordered { courses } => {
                    Some(courses.iter().map(|c| c.number.clone()).collect())
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(reordered, vec!["c3", "c1", "c2", "c4"]);
    }

    #[tokio::test]
    async fn test_unranked_reply_leaves_courses_alone() {
        let transport = MockTransport::new();
        transport.queue_reply("no ranking", &[]);

        let mut rt = TestAssistant::builder().transport(transport).build().await;
        rt.submit("hello", context_with(&["c1", "c2"])).await;

        let events = rt.wait_for_done(WAIT).await.unwrap();
        assert!(!events
            .iter()
            .any(|e| matches!(e, AssistantEvent::CoursesReordered { .. })));
    }

    #[tokio::test]
    async fn test_blank_submit_sends_nothing() {
        let mut rt = TestAssistant::builder().build().await;
        assert!(!rt.submit("   ", context_with(&[])).await.accepted);

        let (events, _) = rt
            .collect_until(Duration::from_millis(200), |_| false)
            .await;
        assert!(events.is_empty());
        assert!(rt.transport.recorded_requests().is_empty());
        assert_eq!(rt.handle.snapshot().transcript, Transcript::welcome());
    }

    #[tokio::test]
    async fn test_restores_stored_transcript() {
        let stored = Transcript::try_from(vec![
            Message::assistant(WELCOME_MESSAGE),
            Message::user("AI?"),
            Message::assistant("機器學習"),
        ])
        .unwrap();

        let rt = TestAssistant::builder()
            .stored(serde_json::to_string(&stored).unwrap())
            .build()
            .await;
        assert_eq!(rt.handle.snapshot().transcript, stored);
    }

    #[tokio::test]
    async fn test_malformed_storage_falls_back_to_welcome() {
        for raw in ["not json", "[]", "{\"role\":\"user\"}"] {
            let rt = TestAssistant::builder().stored(raw).build().await;
            assert_eq!(rt.handle.snapshot().transcript, Transcript::welcome());
        }
    }

    #[tokio::test]
    async fn test_clear_resets_and_forgets() {
        let transport = MockTransport::new();
        transport.queue_reply("answer", &[]);

        let mut rt = TestAssistant::builder().transport(transport).build().await;
        rt.submit("question", context_with(&[])).await;
        assert!(rt.wait_for_done(WAIT).await.is_some());
        assert!(rt.kv.get("test:history").await.unwrap().is_some());

        rt.handle.clear().await.unwrap();
        let snapshot = rt
            .wait_for_snapshot(WAIT, |s| s.transcript.len() == 1)
            .await
            .unwrap();
        assert_eq!(snapshot.transcript, Transcript::welcome());
        assert_eq!(rt.kv.get("test:history").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_cloned_handle_keeps_runtime_alive() {
        let rt = TestAssistant::builder().build().await;
        let handle = rt.handle.clone();
        drop(rt);

        // The clone still reaches the loop
        handle.clear().await.unwrap();
        assert!(handle.submit("   ", context_with(&[])).await.is_ok());
    }
}
