// greedy word wrapping shared by all renderers

/// render width used when line wrapping is enabled
pub const DEFAULT_LINE_WIDTH: usize = 79;

/// width that never forces a line break
pub const UNBOUNDED: usize = usize::MAX;

/// split text into the words that `wrap` lays out
///
/// text that was already wrapped (lines joined by a newline and an indent)
/// reads back as the same word sequence it was built from
fn words(input: &str) -> impl Iterator<Item = &str> {
    input
        .split('\n')
        .enumerate()
        .map(|(idx, line)| {
            if idx == 0 {
                line
            } else {
                line.trim_start_matches(' ')
            }
        })
        .flat_map(|line| line.split(' '))
}

/// wrap `input` over multiple lines of at most `max_width` characters
///
/// every line after the first is indented by `continuation_indent` spaces,
/// which count against the width. a single word longer than the width is
/// kept whole on its own line.
pub fn wrap(input: &str, continuation_indent: usize, max_width: usize) -> String {
    fill(words(input), continuation_indent, max_width)
}

/// like `wrap`, but `marker` stays on the first line, attached to the first
/// word of `input`
///
/// `wrap_marked("* ", text, 2, w)` never leaves a bare `*` on a line of its
/// own, even when the first word is wider than the line.
pub fn wrap_marked(
    marker: &str,
    input: &str,
    continuation_indent: usize,
    max_width: usize,
) -> String {
    let mut rest = words(input);
    let first = format!("{}{}", marker, rest.next().unwrap_or_default());
    fill(
        std::iter::once(first).chain(rest.map(str::to_string)),
        continuation_indent,
        max_width,
    )
}

fn fill<S: AsRef<str>>(
    words: impl IntoIterator<Item = S>,
    continuation_indent: usize,
    max_width: usize,
) -> String {
    let mut lines: Vec<(String, usize)> = Vec::new();

    for word in words {
        let word = word.as_ref();
        let word_len = word.chars().count();
        let limit = if lines.len() > 1 {
            max_width.saturating_sub(continuation_indent)
        } else {
            max_width
        };

        match lines.last_mut() {
            Some((line, line_len)) if line_len.saturating_add(1 + word_len) <= limit => {
                line.push(' ');
                line.push_str(word);
                *line_len += 1 + word_len;
            }
            _ => lines.push((word.to_string(), word_len)),
        }
    }

    let separator = format!("\n{}", " ".repeat(continuation_indent));
    lines
        .into_iter()
        .map(|(line, _)| line)
        .collect::<Vec<_>>()
        .join(&separator)
}
