//! Narration script parsing
//!
//! A narration script is markdown. Each `### Title` heading opens a segment;
//! the segment's spoken text follows an `**Audio**:` marker and runs until
//! the next bold marker or the end of the section. Sections without audio
//! are skipped.

const HEADING: &str = "###";
const AUDIO_MARKER: &str = "**Audio**:";
const BOLD: &str = "**";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationSegment {
    pub title: String,
    pub text: String,
}

pub fn parse_narration(markdown: &str) -> Vec<NarrationSegment> {
    let markdown = markdown.replace("\r\n", "\n");
    let mut segments = Vec::new();

    let mut rest = markdown.as_str();
    while let Some(start) = rest.find(HEADING) {
        let after = &rest[start + HEADING.len()..];
        let section_end = after.find(HEADING).unwrap_or(after.len());
        let section = &after[..section_end];
        rest = &after[section_end..];

        if let Some(segment) = parse_section(section) {
            segments.push(segment);
        }
    }

    segments
}

fn parse_section(section: &str) -> Option<NarrationSegment> {
    // The heading marker must be followed by whitespace
    if !section.starts_with(char::is_whitespace) {
        return None;
    }
    let (title, body) = section.trim_start_matches([' ', '\t']).split_once('\n')?;
    let title = title.trim();
    if title.is_empty() || body.is_empty() {
        return None;
    }

    let audio = &body[body.find(AUDIO_MARKER)? + AUDIO_MARKER.len()..];
    let audio = match audio.find(BOLD) {
        Some(end) => &audio[..end],
        None => audio,
    };

    let text = strip_quotes(audio.trim());
    if text.is_empty() {
        return None;
    }

    Some(NarrationSegment {
        title: title.to_string(),
        text: text.to_string(),
    })
}

/// Drop one leading and one trailing double quote
fn strip_quotes(text: &str) -> &str {
    let text = text.strip_prefix('"').unwrap_or(text);
    text.strip_suffix('"').unwrap_or(text)
}
