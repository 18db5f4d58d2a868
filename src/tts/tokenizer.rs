//! Text pre-processing and chunking for the speech service.
//!
//! The service rejects long inputs, so text is cut at punctuation first and
//! then any piece still longer than [`MAX_CHUNK_CHARS`] is cut again at the
//! last space that fits (or hard-cut when there is none).

use std::sync::OnceLock;

use regex::Regex;

/// Longest chunk, in characters, sent in a single request.
pub const MAX_CHUNK_CHARS: usize = 100;

fn hyphenated_line_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-\s*\r?\n\s*").expect("valid regex"))
}

fn abbreviation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(dr|esq|hon|jr|mr|mrs|ms|messrs|mmes|msgr|prof|rev|rt|sr|st)\.")
            .expect("valid regex")
    })
}

/// Sentence and clause boundaries.
///
/// `.`, `,` and `:` only split when followed by whitespace or the end of the
/// text so decimals, times and dotted abbreviations stay whole.
fn boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[.,:](?:\s+|$)|[?!？！¡¿()\[\]…‥،;—。，、\n।॥]").expect("valid regex")
    })
}

/// Join words broken across lines with a hyphen and drop the periods of
/// common honorifics so they do not end a sentence.
pub fn preprocess(text: &str) -> String {
    let joined = hyphenated_line_break().replace_all(text, "");
    abbreviation().replace_all(&joined, "$1").into_owned()
}

/// Split on punctuation. Question and exclamation marks stay attached to
/// their clause since they change the spoken intonation.
pub fn split_on_punctuation(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for m in boundary().find_iter(text) {
        let mut token = text[last..m.start()].to_string();
        if let Some(c) = m.as_str().chars().next() {
            if matches!(c, '?' | '!' | '？' | '！') {
                token.push(c);
            }
        }
        tokens.push(token);
        last = m.end();
    }
    tokens.push(text[last..].to_string());
    tokens
}

/// Trim tokens and drop those with nothing speakable in them.
pub fn clean_tokens(tokens: Vec<String>) -> Vec<String> {
    tokens
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| t.chars().any(char::is_alphanumeric))
        .collect()
}

/// Cut `token` into pieces of at most `max_chars` characters, preferring the
/// last space inside the window. A `max_chars` of zero is treated as one.
pub fn minimize(token: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut pieces = Vec::new();
    let mut rest = token;

    loop {
        rest = rest.strip_prefix(' ').unwrap_or(rest);
        if rest.chars().count() <= max_chars {
            if !rest.is_empty() {
                pieces.push(rest.to_string());
            }
            return pieces;
        }

        // Byte offset of the first character past the window.
        let window_end = rest
            .char_indices()
            .nth(max_chars)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());

        let cut = match rest[..window_end].rfind(' ') {
            Some(i) if i > 0 => i,
            _ => window_end,
        };

        pieces.push(rest[..cut].to_string());
        rest = &rest[cut..];
    }
}

/// Full chunking pass: pre-process, split, clean, minimize.
///
/// ```
/// use bhashalink::tts::tokenizer::split_text;
///
/// let chunks = split_text("Hello there. How are you?", 100);
/// assert_eq!(chunks, vec!["Hello there", "How are you?"]);
/// ```
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let text = preprocess(text);
    clean_tokens(split_on_punctuation(&text))
        .iter()
        .flat_map(|t| minimize(t, max_chars))
        .filter(|t| !t.trim().is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
