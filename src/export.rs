use crate::markup::{escape_html, render};
use crate::types::{Speaker, Turn};
use anyhow::{Context, Result};
use std::path::Path;

pub const DEFAULT_EXPORT_PATH: &str = "giftwrap-transcript.html";

const STYLE: &str = "body{font-family:sans-serif;max-width:720px;margin:2em auto;background:#fdf6f0}\
.chat-bubble{border-radius:12px;padding:.6em 1em;margin:.6em 0}\
.chat-bubble.user{background:#d8ecff;margin-left:15%}\
.chat-bubble.ai{background:#fff;border:1px solid #f1d3e0;margin-right:15%}\
.speaker{display:block;font-weight:bold;font-size:.85em;margin-bottom:.3em}\
pre{background:#272822;color:#f8f8f2;padding:.6em;overflow-x:auto}";

/// Builds a standalone HTML page for the transcript.
pub fn transcript_html(transcript: &[Turn], assistant_name: &str) -> String {
    let title = escape_html(assistant_name);
    let mut out = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<h1>{title}</h1>\n"
    );

    for turn in transcript {
        let (class, speaker) = match turn.speaker() {
            Speaker::User => ("user", "You".to_string()),
            Speaker::Assistant => ("ai", title.clone()),
        };
        out.push_str(&format!(
            "<div class=\"chat-bubble {class}\"><span class=\"speaker\">{speaker}</span>{}</div>\n",
            render(turn.text())
        ));
    }

    out.push_str("</body>\n</html>\n");
    out
}

pub fn write_transcript_html(path: &Path, transcript: &[Turn], assistant_name: &str) -> Result<()> {
    std::fs::write(path, transcript_html(transcript, assistant_name))
        .with_context(|| format!("failed to write transcript to {}", path.display()))?;
    tracing::info!(path = %path.display(), turns = transcript.len(), "transcript exported");
    Ok(())
}
