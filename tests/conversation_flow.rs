use giftwrap::api::{Completion, CompletionError, MockApiClient};
use giftwrap::config::Persona;
use giftwrap::state::ConversationManager;
use giftwrap::types::{Speaker, Turn};
use std::sync::Arc;

fn empty_session(client: &MockApiClient) -> ConversationManager {
    ConversationManager::with_seed(Arc::new(client.clone()), None, Vec::new())
}

#[tokio::test]
async fn test_end_to_end_with_scripted_reply() {
    let client = MockApiClient::replying(&["Got it!"]);
    let mut manager = empty_session(&client);

    manager.submit_user_text("gift for mom").await;

    let snapshot = manager.snapshot();
    assert_eq!(
        snapshot.transcript,
        vec![Turn::user("gift for mom"), Turn::assistant("Got it!")]
    );
    assert!(!snapshot.awaiting_reply);
    assert!(snapshot.choices.is_empty());
}

#[tokio::test]
async fn test_unreachable_service_yields_failure_turn() {
    let client = MockApiClient::new(vec![Err(CompletionError::unreachable(
        "dns error: no such host",
    ))]);
    let mut manager = empty_session(&client);

    manager.submit_user_text("hello").await;

    let transcript = manager.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[1].speaker(), Speaker::Assistant);
    assert!(transcript[1].text().contains("Something went wrong"));
    assert!(!manager.is_awaiting_reply());
}

#[tokio::test]
async fn test_http_status_failures_are_summarised() {
    let client = MockApiClient::new(vec![
        Err(CompletionError::from_status(400, "API key not valid. Please pass a valid API key.")),
        Err(CompletionError::from_status(429, "Resource exhausted")),
    ]);
    let mut manager = empty_session(&client);

    manager.submit_user_text("one").await;
    assert!(manager.transcript()[1].text().contains("API key"));

    manager.submit_user_text("two").await;
    assert!(manager.transcript()[3].text().contains("too many requests"));
}

#[tokio::test]
async fn test_each_submission_sends_full_transcript() {
    let client = MockApiClient::new(vec![
        Ok(Completion::Reply(
            "Who is it for?\nChoices: Mom | Dad".to_string(),
        )),
        Ok(Completion::Reply("Lovely.".to_string())),
    ]);
    let mut manager = ConversationManager::new(client.clone(), &Persona::default());

    manager.submit_user_text("a book").await;
    assert_eq!(manager.choices(), &["Mom".to_string(), "Dad".to_string()]);

    manager.select_choice("Mom").await;

    let requests = client.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].len(), 4);
    assert_eq!(requests[1][1], Turn::user("a book"));
    assert_eq!(requests[1][2], Turn::assistant("Who is it for?"));
    assert_eq!(requests[1][3], Turn::user("Mom"));
}

#[tokio::test]
async fn test_reset_after_conversation_restores_seed() {
    let client = MockApiClient::replying(&["Great!"]);
    let mut manager = ConversationManager::new(client, &Persona::default());
    let seeded = manager.snapshot();

    manager.submit_user_text("ribbon ideas").await;
    manager.reset();

    assert_eq!(manager.snapshot(), seeded);
}
