use anyhow::Result;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use easel::clock::ManualClock;
use easel::models::artifact::ArtifactKind;
use easel::registry::{ArtifactRegistry, ARTIFACT_STATE_KEY};
use easel::session::ChatSession;
use easel::store::memory::MemoryStore;
use easel::store::SessionStore;

fn session_over(store: MemoryStore, clock: ManualClock) -> ChatSession {
    ChatSession::new(ArtifactRegistry::new(Box::new(store), Box::new(clock)))
}

#[tokio::test]
async fn test_streamed_reply_flows_into_registry_and_store() -> Result<()> {
    let store = MemoryStore::new();
    let clock = ManualClock::new(0);
    let mut session = session_over(store.clone(), clock.clone());
    session.push_user("make me a page");

    let deltas = [
        "Sure - here you go: ",
        "<artifact type=\"text/html\" ",
        "title=\"Page\">",
        "<p>hello</p>",
        "</artifact>",
        " Done.",
    ];
    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        for delta in deltas {
            if tx.send(Ok(delta.to_string())).await.is_err() {
                break;
            }
        }
    });

    let mut updates = Vec::new();
    {
        let mut stream = session.stream_reply(ReceiverStream::new(rx).boxed());
        while let Some(update) = stream.next().await {
            updates.push(update?);
        }
    }

    assert_eq!(updates.len(), deltas.len());
    // Nothing open before the tag arrives, open while it streams, closed once
    // the closing tag lands.
    assert_eq!(updates[0].in_progress, 0);
    assert_eq!(updates[1].in_progress, 1);
    assert_eq!(updates[3].in_progress, 1);
    assert_eq!(updates[4].in_progress, 0);
    assert!(updates[3].artifact_ids.is_empty());
    assert_eq!(updates[4].artifact_ids.len(), 1);

    let artifact_id = updates[4].artifact_ids[0].clone();
    assert_eq!(session.registry().len(), 1);
    assert_eq!(session.registry().active_id(), Some(artifact_id.as_str()));
    let entry = session.registry().get(&artifact_id).unwrap();
    assert_eq!(entry.artifact.kind, ArtifactKind::Html);
    assert_eq!(entry.artifact.title, "Page");
    assert_eq!(entry.artifact.content, "<p>hello</p>");

    let message_id = updates[4].message_id.clone();
    let view = session.message_view(&message_id).unwrap();
    assert_eq!(view.clean_content, "Sure - here you go:  Done.");
    assert_eq!(view.in_progress, 0);

    // The registry persisted a snapshot the store can hand back on "reload".
    assert!(store.get(ARTIFACT_STATE_KEY)?.is_some());
    let restored = ArtifactRegistry::new(Box::new(store.clone()), Box::new(clock.clone()));
    assert_eq!(restored.len(), 1);
    assert_eq!(restored.active_id(), Some(artifact_id.as_str()));
    assert_eq!(restored.get(&artifact_id).unwrap().artifact.content, "<p>hello</p>");
    Ok(())
}

#[tokio::test]
async fn test_aborted_stream_leaves_last_accumulated_state() -> Result<()> {
    let store = MemoryStore::new();
    let mut session = session_over(store.clone(), ManualClock::new(0));

    let (tx, rx) = mpsc::channel(4);
    tx.send(Ok("<artifact type=\"react\" ".to_string())).await?;
    tx.send(Ok("title=\"App\">const x =".to_string())).await?;
    // Dropping the sender mid-block is a stream abort.
    drop(tx);

    let mut last = None;
    {
        let mut stream = session.stream_reply(ReceiverStream::new(rx).boxed());
        while let Some(update) = stream.next().await {
            last = Some(update?);
        }
    }

    let last = last.unwrap();
    assert_eq!(last.in_progress, 1);
    assert!(last.artifact_ids.is_empty());
    assert!(session.registry().is_empty());

    // The partial text is still there; a later parse sees it as plain text.
    let view = session.message_view(&last.message_id).unwrap();
    assert_eq!(view.in_progress, 1);
    assert!(view.artifacts.is_empty());
    assert_eq!(
        view.clean_content,
        "<artifact type=\"react\" title=\"App\">const x ="
    );
    Ok(())
}

#[tokio::test]
async fn test_artifacts_across_replies_share_one_bounded_registry() -> Result<()> {
    let store = MemoryStore::new();
    let clock = ManualClock::new(0);
    let mut session = session_over(store.clone(), clock.clone());

    for i in 0..6 {
        clock.advance(1);
        let block = format!(
            "<artifact type=\"text/html\" title=\"Page {}\"><p>{}</p></artifact>",
            i, i
        );
        let (tx, rx) = mpsc::channel(1);
        tx.send(Ok(block)).await?;
        drop(tx);
        let mut stream = session.stream_reply(ReceiverStream::new(rx).boxed());
        while let Some(update) = stream.next().await {
            update?;
        }
    }

    // Six replies, capacity five: the oldest artifact was evicted.
    assert_eq!(session.registry().len(), 5);
    let titles: Vec<&str> = session
        .registry()
        .iter()
        .map(|e| e.artifact.title.as_str())
        .collect();
    assert_eq!(
        titles,
        vec!["Page 1", "Page 2", "Page 3", "Page 4", "Page 5"]
    );
    Ok(())
}
