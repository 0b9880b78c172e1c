use crate::config::split_choice_list;

const CHOICE_LABELS: [&str; 2] = ["choices:", "options:"];
const MAX_OFFERED_CHOICES: usize = 9;

/// Splits a trailing `Choices: a | b | c` line off an assistant reply.
///
/// Returns the text to keep in the transcript and the offered choices. The line
/// must list at least two `|`-separated entries; a reply without such a line is
/// returned unchanged with no choices.
pub fn split_offered_choices(text: &str) -> (String, Vec<String>) {
    let trimmed = text.trim_end();
    let (body, last_line) = match trimmed.rfind('\n') {
        Some(idx) => (&trimmed[..idx], &trimmed[idx + 1..]),
        None => ("", trimmed),
    };

    let line = last_line.trim().trim_start_matches('*');
    let lower = line.to_ascii_lowercase();
    let Some(label) = CHOICE_LABELS.iter().find(|label| lower.starts_with(**label)) else {
        return (text.to_string(), Vec::new());
    };

    let mut choices = split_choice_list(line[label.len()..].trim_start_matches('*'));
    choices.truncate(MAX_OFFERED_CHOICES);
    if choices.len() < 2 {
        return (text.to_string(), Vec::new());
    }

    let body = body.trim_end();
    if body.is_empty() {
        return (text.to_string(), choices);
    }
    (body.to_string(), choices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_without_choice_line_is_unchanged() {
        let (text, choices) = split_offered_choices("Got it!\nWho is it for?");
        assert_eq!(text, "Got it!\nWho is it for?");
        assert!(choices.is_empty());
    }

    #[test]
    fn test_trailing_choice_line_is_extracted() {
        let (text, choices) =
            split_offered_choices("Who is this lovely gift for? 🎁\n\nChoices: Mom | Partner | Kid\n");
        assert_eq!(text, "Who is this lovely gift for? 🎁");
        assert_eq!(choices, vec!["Mom", "Partner", "Kid"]);
    }

    #[test]
    fn test_bold_options_label_is_recognised() {
        let (text, choices) = split_offered_choices("Style?\n**Options:** Elegant | Rustic");
        assert_eq!(text, "Style?");
        assert_eq!(choices, vec!["Elegant", "Rustic"]);
    }

    #[test]
    fn test_choice_line_alone_keeps_text() {
        let (text, choices) = split_offered_choices("Choices: Yes | No");
        assert_eq!(text, "Choices: Yes | No");
        assert_eq!(choices.len(), 2);
    }

    #[test]
    fn test_prose_options_line_stays_in_reply() {
        let reply = "Here are some ideas for the book.\nOptions: you could use kraft paper or an old map.";
        let (text, choices) = split_offered_choices(reply);
        assert_eq!(text, reply);
        assert!(choices.is_empty());
    }

    #[test]
    fn test_single_entry_choice_line_is_not_extracted() {
        let (text, choices) = split_offered_choices("Ready?\nChoices: Yes |");
        assert_eq!(text, "Ready?\nChoices: Yes |");
        assert!(choices.is_empty());
    }

    #[test]
    fn test_choice_line_in_middle_is_ignored() {
        let (_, choices) = split_offered_choices("Choices: a | b\nMore text after.");
        assert!(choices.is_empty());
    }
}
