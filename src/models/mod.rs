use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A titled, contiguous unit of manuscript text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub id: Uuid,
    pub title: String,
    pub content: String,
}

impl Chapter {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Chapter {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
        }
    }
}

/// One importable manuscript in the library directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub key: String,
    pub label: String,
}

/// Full editor state returned by the session endpoints so a thin
/// client can re-render after every mutation.
#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    pub chapters: Vec<Chapter>,
    pub selected_id: Option<Uuid>,
    pub cursor: Option<usize>,
}
