/// Terminal columns a string occupies. CJK ideographs, kana, Hangul, and
/// fullwidth forms take two columns; destination names routinely mix them
/// with ASCII.
pub fn display_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

fn char_width(c: char) -> usize {
    match c {
        '\u{1100}'..='\u{115F}'
        | '\u{2E80}'..='\u{A4CF}'
        | '\u{AC00}'..='\u{D7AF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{FE30}'..='\u{FE4F}'
        | '\u{FF00}'..='\u{FF60}'
        | '\u{FFE0}'..='\u{FFE6}'
        | '\u{20000}'..='\u{2FFFD}' => 2,
        _ => 1,
    }
}

/// Break text into lines of at most `max` display columns, preferring
/// space boundaries and falling back to per-character breaks for long
/// unspaced runs (CJK prose has no spaces to break at).
pub fn wrap_text(text: &str, max: usize) -> Vec<String> {
    let max = max.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut width = 0usize;

    for word in text.split_whitespace() {
        let word_width = display_width(word);

        if width > 0 && width + 1 + word_width > max {
            lines.push(std::mem::take(&mut current));
            width = 0;
        }

        if word_width <= max {
            if width > 0 {
                current.push(' ');
                width += 1;
            }
            current.push_str(word);
            width += word_width;
        } else {
            for c in word.chars() {
                let cw = char_width(c);
                if width > 0 && width + cw > max {
                    lines.push(std::mem::take(&mut current));
                    width = 0;
                }
                current.push(c);
                width += cw;
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cjk_counts_double_width() {
        assert_eq!(display_width("Kyoto"), 5);
        assert_eq!(display_width("京都"), 4);
        assert_eq!(display_width("京都 Kyoto"), 10);
    }

    #[test]
    fn wraps_at_spaces_within_budget() {
        let lines = wrap_text("five day trip to Kyoto", 10);
        assert!(lines.iter().all(|l| display_width(l) <= 10));
        assert_eq!(lines.join(" "), "five day trip to Kyoto");
    }

    #[test]
    fn hard_breaks_unspaced_runs() {
        let lines = wrap_text("清水寺岚山金阁寺伏见稻荷", 8);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| display_width(l) <= 8));
    }
}
