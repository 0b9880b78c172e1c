/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    /// Role name used by the generateContent wire format.
    pub fn api_role(self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Assistant => "model",
        }
    }
}

/// One message in the transcript. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    speaker: Speaker,
    text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_user(&self) -> bool {
        self.speaker == Speaker::User
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speaker_maps_to_wire_roles() {
        assert_eq!(Speaker::User.api_role(), "user");
        assert_eq!(Speaker::Assistant.api_role(), "model");
    }

    #[test]
    fn test_turn_constructors_set_speaker() {
        let question = Turn::user("gift for mom");
        let answer = Turn::assistant("Got it!");
        assert!(question.is_user());
        assert_eq!(answer.speaker(), Speaker::Assistant);
        assert_eq!(answer.text(), "Got it!");
    }
}
