use serde::{Deserialize, Serialize};

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Label shown in front of a message in the conversation view.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You:",
            Role::Assistant => "AI:",
        }
    }
}

/// One message in the conversation. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    role: Role,
    content: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    error: bool,
}

impl TranscriptEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            error: false,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            error: false,
        }
    }

    /// An assistant entry standing in for a failed request.
    pub fn assistant_error(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            error: true,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_error(&self) -> bool {
        self.error
    }
}

/// Append-only, chronologically ordered list of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TranscriptEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a TranscriptEntry;
    type IntoIter = std::slice::Iter<'a, TranscriptEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_constructors() {
        let user = TranscriptEntry::user("Hi");
        assert_eq!(user.role(), Role::User);
        assert_eq!(user.content(), "Hi");
        assert!(!user.is_error());

        let failed = TranscriptEntry::assistant_error("Sorry");
        assert_eq!(failed.role(), Role::Assistant);
        assert!(failed.is_error());
    }

    #[test]
    fn test_transcript_preserves_order() {
        let mut transcript = Transcript::new();
        transcript.push(TranscriptEntry::user("one"));
        transcript.push(TranscriptEntry::assistant("two"));

        let contents: Vec<&str> = transcript.iter().map(|e| e.content()).collect();
        assert_eq!(contents, vec!["one", "two"]);
        assert_eq!(transcript.last().map(|e| e.role()), Some(Role::Assistant));
    }

    #[test]
    fn test_entry_serialization_omits_false_error_flag() {
        let json = serde_json::to_string(&TranscriptEntry::user("Hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"Hi"}"#);

        let json = serde_json::to_string(&TranscriptEntry::assistant_error("x")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"x","error":true}"#);
    }
}
