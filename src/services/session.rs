use uuid::Uuid;

use crate::models::{Chapter, SessionSnapshot};
use crate::services::history::EditHistory;
use crate::services::segmenter::{self, SPLIT_MARKER};

/// In-memory editing state for one manuscript: the ordered chapter
/// list, the current selection, the cursor inside the selected
/// chapter, and an undo log scoped to the selected chapter.
///
/// Invariants: chapter ids are unique within the list; at most one
/// chapter is selected; the undo log exists exactly when a chapter is
/// selected and is reset whenever the selected identity changes.
pub struct EditorSession {
    chapters: Vec<Chapter>,
    selected_id: Option<Uuid>,
    cursor: Option<usize>,
    history: Option<EditHistory>,
}

impl EditorSession {
    /// A fresh session holds one blank chapter so the editor always
    /// has something to render before the first import.
    pub fn new() -> Self {
        EditorSession {
            chapters: vec![Chapter::new("Chapter 1 - Blank", "")],
            selected_id: None,
            cursor: None,
            history: None,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            chapters: self.chapters.clone(),
            selected_id: self.selected_id,
            cursor: self.cursor,
        }
    }

    /// Replace the whole session with the segmentation of `text` and
    /// select the first chapter.
    pub fn import(&mut self, text: &str) {
        self.chapters = segmenter::segment(text);
        self.cursor = None;
        match self.chapters.first() {
            Some(first) => {
                self.selected_id = Some(first.id);
                let content = first.content.clone();
                self.reset_history(&content);
            }
            None => {
                self.selected_id = None;
                self.history = None;
            }
        }
        tracing::info!(chapters = self.chapters.len(), "manuscript imported");
    }

    /// Select a chapter by id. Unknown ids are ignored; reselecting
    /// the current chapter keeps its undo log.
    pub fn select(&mut self, id: Uuid) {
        if self.selected_id == Some(id) {
            return;
        }
        let Some(chapter) = self.chapters.iter().find(|c| c.id == id) else {
            return;
        };
        let content = chapter.content.clone();
        self.reset_history(&content);
        self.selected_id = Some(id);
        self.cursor = None;
    }

    /// Restart the undo log from a single snapshot, reusing the
    /// existing log when one is attached.
    fn reset_history(&mut self, content: &str) {
        match self.history.as_mut() {
            Some(history) => history.reset(content),
            None => self.history = Some(EditHistory::new(content)),
        }
    }

    /// Replace a chapter's content, recording an undo snapshot when
    /// the chapter is the selected one. Unknown ids are ignored.
    pub fn update_content(&mut self, id: Uuid, content: &str, cursor: Option<usize>) {
        let Some(chapter) = self.chapters.iter_mut().find(|c| c.id == id) else {
            return;
        };
        chapter.content = content.to_string();
        if self.selected_id == Some(id) {
            if let Some(history) = self.history.as_mut() {
                history.record(content);
            }
            self.cursor = cursor;
        }
    }

    /// Insert the split marker into the selected chapter at a byte
    /// offset, returning the cursor position just past the marker.
    /// Requires a selection and an offset on a char boundary.
    pub fn insert_split_marker(&mut self, offset: usize) -> Option<usize> {
        let id = self.selected_id?;
        let chapter = self.chapters.iter_mut().find(|c| c.id == id)?;
        if offset > chapter.content.len() || !chapter.content.is_char_boundary(offset) {
            return None;
        }

        let marker = format!("\n{SPLIT_MARKER}\n");
        chapter.content.insert_str(offset, &marker);
        if let Some(history) = self.history.as_mut() {
            history.record(&chapter.content);
        }
        let new_cursor = offset + marker.len();
        self.cursor = Some(new_cursor);
        Some(new_cursor)
    }

    /// Split the selected chapter at every split marker. The first
    /// part keeps the chapter's id and title; later parts become new
    /// chapters titled "{title} - 2", "{title} - 3", … spliced in
    /// right after it.
    pub fn split_selected(&mut self) {
        let Some(id) = self.selected_id else {
            return;
        };
        let Some(index) = self.chapters.iter().position(|c| c.id == id) else {
            return;
        };
        if !self.chapters[index].content.contains(SPLIT_MARKER) {
            return;
        }

        let base_title = self.chapters[index].title.clone();
        let parts: Vec<String> = self.chapters[index]
            .content
            .split(SPLIT_MARKER)
            .map(|part| part.trim().to_string())
            .collect();

        self.chapters[index].content = parts[0].clone();
        let tail: Vec<Chapter> = parts[1..]
            .iter()
            .enumerate()
            .map(|(i, part)| Chapter::new(format!("{} - {}", base_title, i + 2), part.clone()))
            .collect();
        let new_count = tail.len();
        self.chapters.splice(index + 1..index + 1, tail);

        if let Some(history) = self.history.as_mut() {
            history.record(&parts[0]);
        }
        tracing::debug!(chapter = %id, new_chapters = new_count, "chapter split");
    }

    /// Merge the next chapter into the selected one, joined by a blank
    /// line. No-op when nothing is selected or the selection is last.
    pub fn merge_with_next(&mut self) {
        let Some(id) = self.selected_id else {
            return;
        };
        let Some(index) = self.chapters.iter().position(|c| c.id == id) else {
            return;
        };
        if index + 1 >= self.chapters.len() {
            return;
        }

        let next = self.chapters.remove(index + 1);
        let chapter = &mut self.chapters[index];
        chapter.content.push_str("\n\n");
        chapter.content.push_str(&next.content);
        let merged = chapter.content.clone();
        if let Some(history) = self.history.as_mut() {
            history.record(&merged);
        }
        tracing::debug!(chapter = %id, absorbed = %next.id, "chapters merged");
    }

    /// Remove a chapter. When the selected chapter is removed the
    /// selection falls back to the first remaining chapter, or clears
    /// if the list is now empty.
    pub fn delete(&mut self, id: Uuid) {
        let Some(index) = self.chapters.iter().position(|c| c.id == id) else {
            return;
        };
        self.chapters.remove(index);

        if self.selected_id == Some(id) {
            self.cursor = None;
            match self.chapters.first() {
                Some(first) => {
                    self.selected_id = Some(first.id);
                    let content = first.content.clone();
                    self.reset_history(&content);
                }
                None => {
                    self.selected_id = None;
                    self.history = None;
                }
            }
        }
    }

    /// Step the undo log back one snapshot and apply it to the
    /// selected chapter, returning the restored content.
    pub fn undo(&mut self) -> Option<String> {
        let id = self.selected_id?;
        let restored = self.history.as_mut()?.undo()?.to_string();
        let chapter = self.chapters.iter_mut().find(|c| c.id == id)?;
        chapter.content = restored.clone();
        Some(restored)
    }

    #[cfg(test)]
    fn selected_content(&self) -> Option<&str> {
        let id = self.selected_id?;
        self.chapters
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.content.as_str())
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}
