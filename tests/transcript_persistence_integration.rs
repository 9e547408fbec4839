use dailyfetch::api::ChatMessage;
use dailyfetch::storage::TranscriptStore;

/// Transcripts survive a store reopen, keyed by fetch id.
#[test]
fn test_transcripts_survive_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("transcripts.db");

    {
        let store = TranscriptStore::new_with_path(&db_path).expect("store");
        store
            .save(
                "fetch-A",
                &[
                    ChatMessage::user("question"),
                    ChatMessage::assistant("answer"),
                ],
            )
            .expect("save");
    } // store dropped, database closed

    let store = TranscriptStore::new_with_path(&db_path).expect("reopen");
    let messages = store.load("fetch-A").expect("load");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, "question");
    assert!(store.load("fetch-B").expect("load").is_empty());
}

/// The on-disk key has the documented "AIConversation_<fetchId>" shape.
#[test]
fn test_on_disk_key_format() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("transcripts.db");

    {
        let store = TranscriptStore::new_with_path(&db_path).expect("store");
        store
            .save("fetch-42", &[ChatMessage::user("hello")])
            .expect("save");
    }

    let db = sled::open(&db_path).expect("raw open");
    let value = db
        .get(b"AIConversation_fetch-42")
        .expect("get")
        .expect("key present");

    let envelope: serde_json::Value = serde_json::from_slice(&value).expect("json value");
    assert_eq!(envelope["version"], 1);
    assert_eq!(envelope["messages"][0]["content"], "hello");
}

/// Message order is insertion order, verbatim across save/load.
#[test]
fn test_append_only_order_is_preserved() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = TranscriptStore::new_with_path(dir.path().join("transcripts.db")).expect("store");

    let mut messages = Vec::new();
    for i in 0..5 {
        messages.push(ChatMessage::user(format!("q{}", i)));
        messages.push(ChatMessage::assistant(format!("a{}", i)));
        store.save("fetch-1", &messages).expect("save");
    }

    let loaded = store.load("fetch-1").expect("load");
    assert_eq!(loaded.len(), 10);
    for (expected, actual) in messages.iter().zip(loaded.iter()) {
        assert_eq!(expected, actual);
    }
}
