use regex::Regex;
use std::sync::OnceLock;

use crate::models::Chapter;

/// Marker a user can type (or insert via the editor) to force a chapter
/// boundary. Checked before any heading detection.
pub const SPLIT_MARKER: &str = "====SPLIT CHAPTER====";

/// Legacy boundary marker still honored on import.
pub const CHAPTER_END_MARKER: &str = "---CHAPTER END---";

/// Explicit separators in priority order; the first one present in the
/// text is used for the entire split.
const SEPARATORS: [&str; 2] = [CHAPTER_END_MARKER, SPLIT_MARKER];

/// Heading grammar: the word "Chapter", whitespace, then a designator
/// (digits, a letter run, or a Roman numeral), optionally followed by
/// a colon/pipe/dash and a free-text title. The match must end its
/// line, so a mid-sentence "Chapter 12" mention is not a heading.
const HEADING_PATTERN: &str = r"Chapter\s+(\d+|[A-Z]+|[IVXLCDM]+)(?:\s*[:|\-]\s*([^\n]+))?$";

fn heading_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!("(?im){HEADING_PATTERN}")).expect("heading pattern is valid")
    })
}

fn anchored_heading_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"(?im)\A{HEADING_PATTERN}")).expect("heading pattern is valid")
    })
}

/// Divide raw manuscript text into an ordered list of chapters.
///
/// Never fails: when no separator and no heading is found the whole
/// text becomes a single chapter. Every produced chapter gets a fresh
/// id, so titles and contents are deterministic but ids are not.
pub fn segment(text: &str) -> Vec<Chapter> {
    for separator in SEPARATORS {
        if text.contains(separator) {
            return split_on_separator(text, separator);
        }
    }
    split_on_headings(text)
}

/// Split on every occurrence of one explicit separator, dropping
/// segments that are blank after trimming.
fn split_on_separator(text: &str, separator: &str) -> Vec<Chapter> {
    let chapters: Vec<Chapter> = text
        .split(separator)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .enumerate()
        .map(|(index, part)| {
            let title = anchored_heading_regex()
                .captures(part)
                .map(|caps| heading_title(&caps))
                .unwrap_or_else(|| format!("Chapter {}", index + 1));
            Chapter::new(title, part)
        })
        .collect();

    if chapters.is_empty() {
        // Nothing but separators and whitespace; fall back to one
        // whole-text chapter so an import never yields an empty list.
        return vec![Chapter::new("Chapter 1", text)];
    }
    chapters
}

/// Detect chapter headings anywhere in the text; each match starts a
/// chapter that runs up to the next match (or end of text), heading
/// line included, content untrimmed.
fn split_on_headings(text: &str) -> Vec<Chapter> {
    let matches: Vec<regex::Captures> = heading_regex().captures_iter(text).collect();

    if matches.is_empty() {
        return vec![Chapter::new("Chapter 1", text)];
    }

    matches
        .iter()
        .enumerate()
        .map(|(index, caps)| {
            let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
            let end = matches
                .get(index + 1)
                .and_then(|next| next.get(0))
                .map(|m| m.start())
                .unwrap_or(text.len());
            Chapter::new(heading_title(caps), &text[start..end])
        })
        .collect()
}

/// Render a matched heading as a chapter title: "Chapter 5" or
/// "Chapter 5 - The Storm" when a trailing title was captured.
fn heading_title(caps: &regex::Captures) -> String {
    let designator = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    match caps.get(2).map(|m| m.as_str().trim()) {
        Some(title) if !title.is_empty() => format!("Chapter {designator} - {title}"),
        _ => format!("Chapter {designator}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_headings_split_at_each_heading() {
        let chapters = segment("Chapter 1\nHello\nChapter 2: The Return\nWorld");

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, "Chapter 1");
        assert_eq!(chapters[0].content, "Chapter 1\nHello\n");
        assert_eq!(chapters[1].title, "Chapter 2 - The Return");
        assert_eq!(chapters[1].content, "Chapter 2: The Return\nWorld");
    }

    #[test]
    fn text_without_headings_becomes_single_chapter() {
        let text = "intro text with no headings";
        let chapters = segment(text);

        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, "Chapter 1");
        assert_eq!(chapters[0].content, text);
    }

    #[test]
    fn midline_chapter_mention_is_not_a_heading() {
        let text = "He read Chapter 12 before bed and slept.\nMore prose follows.";
        let chapters = segment(text);

        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, "Chapter 1");
        assert_eq!(chapters[0].content, text);
    }

    #[test]
    fn heading_must_end_its_line_even_at_line_start() {
        let chapters = segment("Chapter 12 was long\nChapter 13\nreal chapter");

        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, "Chapter 13");
        assert_eq!(chapters[0].content, "Chapter 13\nreal chapter");
    }

    #[test]
    fn separator_segment_heading_must_end_its_line() {
        let chapters = segment("Chapter 9 was his favorite\nbody====SPLIT CHAPTER====tail");

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, "Chapter 1");
        assert_eq!(chapters[1].title, "Chapter 2");
    }

    #[test]
    fn explicit_separator_takes_priority_over_headings() {
        let text = "Chapter 1\nfirst---CHAPTER END---Chapter 2\nsecond---CHAPTER END---tail";
        let chapters = segment(text);

        assert_eq!(chapters.len(), 3);
        assert_eq!(chapters[0].title, "Chapter 1");
        assert_eq!(chapters[0].content, "Chapter 1\nfirst");
        assert_eq!(chapters[1].title, "Chapter 2");
        assert_eq!(chapters[2].title, "Chapter 3");
        assert_eq!(chapters[2].content, "tail");
    }

    #[test]
    fn blank_separator_segments_are_dropped() {
        let chapters = segment("one---CHAPTER END---   \n ---CHAPTER END---two");

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].content, "one");
        assert_eq!(chapters[1].content, "two");
        assert_eq!(chapters[1].title, "Chapter 2");
    }

    #[test]
    fn chapter_end_marker_wins_over_split_marker() {
        let text = "a====SPLIT CHAPTER====b---CHAPTER END---c";
        let chapters = segment(text);

        // Only the first marker found in priority order is honored, so
        // the split marker text stays inside the first segment.
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].content, "a====SPLIT CHAPTER====b");
        assert_eq!(chapters[1].content, "c");
    }

    #[test]
    fn separator_segments_keep_their_own_headings() {
        let text = "Chapter 4 - Dawn\nbody====SPLIT CHAPTER====no heading here";
        let chapters = segment(text);

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, "Chapter 4 - Dawn");
        assert_eq!(chapters[1].title, "Chapter 2");
    }

    #[test]
    fn roman_numeral_and_uppercase_designators() {
        let chapters = segment("Chapter IV\nalpha\nCHAPTER TWELVE: Night\nbeta");

        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].title, "Chapter IV");
        assert_eq!(chapters[1].title, "Chapter TWELVE - Night");
    }

    #[test]
    fn heading_detection_is_case_insensitive() {
        let chapters = segment("chapter 7 - the storm\ncontent");

        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, "Chapter 7 - the storm");
    }

    #[test]
    fn empty_input_still_yields_one_chapter() {
        let chapters = segment("");

        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, "Chapter 1");
        assert_eq!(chapters[0].content, "");
    }

    #[test]
    fn separator_only_input_falls_back_to_whole_text() {
        let text = "  ====SPLIT CHAPTER====  ";
        let chapters = segment(text);

        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, "Chapter 1");
        assert_eq!(chapters[0].content, text);
    }

    #[test]
    fn segmentation_is_deterministic_apart_from_ids() {
        let text = "Chapter 1\none\nChapter 2\ntwo";
        let first = segment(text);
        let second = segment(text);

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.title, b.title);
            assert_eq!(a.content, b.content);
            assert_ne!(a.id, b.id);
        }
    }
}
