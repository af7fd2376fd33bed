//! Pure, stateless rendering helpers: markup stripping, markup to ANSI
//! conversion, the fixed-width card frame, and the HTML fragment built
//! for new cards. No terminal state is touched here, which keeps every
//! function testable as plain string transforms.

use regex::Regex;

use crate::models::Meaning;

/// Reset sequence every styled string terminates with.
pub const RESET: &str = "\x1b[0m";

const BOLD_ON: &str = "\x1b[1m";
const BOLD_OFF: &str = "\x1b[22m";
const ITALIC_ON: &str = "\x1b[3m";
const ITALIC_OFF: &str = "\x1b[23m";
const UNDERLINE_ON: &str = "\x1b[4m";
const UNDERLINE_OFF: &str = "\x1b[24m";

/// Total width of the card frame, border included.
const FRAME_WIDTH: usize = 40;

/// Strip markup down to plain text for fixed-width display: remove
/// tags, decode the entity subset the collection uses, trim. Running
/// it twice yields the same result as running it once.
pub fn strip_markup(text: &str) -> String {
    let tag_re = Regex::new(r"<[^>]+>").unwrap();
    let stripped = tag_re.replace_all(text, "");
    decode_entities(&stripped).trim().to_string()
}

/// Convert the constrained markup subset (bold/italic/underline plus
/// block tags) to ANSI styling. Unknown tags are dropped, and the
/// output always terminates with a reset sequence so stray styling
/// cannot leak into the next prompt.
pub fn markup_to_ansi(text: &str) -> String {
    let replacements: &[(&str, &str)] = &[
        (r"(?i)<br\s*/?>", "\n"),
        (r"(?i)<b>|<strong>", BOLD_ON),
        (r"(?i)</b>|</strong>", BOLD_OFF),
        (r"(?i)<i>|<em>", ITALIC_ON),
        (r"(?i)</i>|</em>", ITALIC_OFF),
        (r"(?i)<u>", UNDERLINE_ON),
        (r"(?i)</u>", UNDERLINE_OFF),
        (r"(?i)<div[^>]*>", ""),
        (r"(?i)</div>", "\n"),
        (r"(?i)<p[^>]*>", ""),
        (r"(?i)</p>", "\n"),
        (r"(?i)<span[^>]*>", ""),
        (r"(?i)</span>", ""),
        (r"<[^>]+>", ""),
    ];

    let mut result = text.to_string();
    for (pattern, replacement) in replacements {
        let re = Regex::new(pattern).unwrap();
        result = re.replace_all(&result, *replacement).to_string();
    }
    result = decode_entities(&result);
    result.push_str(RESET);
    result
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Draw the fixed-width double-line frame around a card front,
/// annotated with the remaining due count. The front text is stripped
/// of markup, flattened to one line, and truncated to fit.
pub fn card_frame(front: &str, due_total: u32) -> String {
    let due = due_total.to_string();
    let inner = FRAME_WIDTH - 2;
    // Room left for the centered front text once "(<due>)" is placed
    // flush against the right border.
    let text_field = inner.saturating_sub(due.len() + 2);

    let text = strip_markup(front).replace('\n', " ");
    let text = truncate_chars(&text, text_field.saturating_sub(1));

    let top = format!("╔{}╗", "═".repeat(inner));
    let bottom = format!("╚{}╝", "═".repeat(inner));
    let middle = format!("║{}({due})║", center(&text, text_field));

    format!("{top}\n{middle}\n{bottom}")
}

/// Truncate to at most `max` characters. Counting is by `char`, which
/// assumes single-width glyphs; wide scripts will overflow the frame
/// the same way the count annotation does.
fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Center `text` inside a field of `width` characters.
fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let padding = width - len;
    let left = padding / 2;
    let right = padding - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

/// Build the HTML fragment stored as the back of a new card: meanings
/// separated by blank lines, each example on a small italic line, and
/// the pronunciation trailing in muted styling.
pub fn build_card_html(meanings: &[Meaning], pronunciation: Option<&str>) -> String {
    let mut parts = Vec::new();
    for (index, meaning) in meanings.iter().enumerate() {
        let mut part = meaning.meaning.clone();
        if let Some(example) = meaning.example.as_deref().filter(|e| !e.is_empty()) {
            part.push_str(&format!(
                "<br><span style=\"font-size: small;\"><i> - {example}</i></span>"
            ));
        }
        if index != meanings.len() - 1 {
            part.push_str("<br><br>");
        }
        parts.push(part);
    }

    if let Some(pronunciation) = pronunciation.filter(|p| !p.is_empty()) {
        parts.push(format!(
            "<br><br><span style=\"color: #666; font-size: small;\">{pronunciation}</span>"
        ));
    }

    parts.concat()
}
