/// Result of comparing the typed buffer against the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixMatch {
    /// Length in chars of the longest common prefix.
    pub matched_len: usize,
    /// Everything typed so far is a correct prefix of the target. This says
    /// nothing about whether the whole word has been typed.
    pub fully_matched: bool,
}

pub fn common_prefix_len(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count()
}

pub fn match_prefix(typed: &str, target: &str) -> PrefixMatch {
    let matched_len = common_prefix_len(typed, target);
    PrefixMatch {
        matched_len,
        fully_matched: matched_len == typed.chars().count(),
    }
}

/// Submission check: surrounding whitespace is ignored, nothing else is
/// normalized.
pub fn is_exact_match(typed: &str, target: &str) -> bool {
    typed.trim() == target
}

/// Prompt split for display. Both halves are taken from the target so typos
/// never show up in the prompt itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptRender {
    pub confirmed_prefix: String,
    pub remaining_suffix: String,
    /// Whether the typed buffer is currently on track.
    pub on_track: bool,
}

impl PromptRender {
    pub fn split(typed: &str, target: &str) -> Self {
        let m = match_prefix(typed, target);
        let cut = target
            .char_indices()
            .nth(m.matched_len)
            .map_or(target.len(), |(idx, _)| idx);

        Self {
            confirmed_prefix: target[..cut].to_string(),
            remaining_suffix: target[cut..].to_string(),
            on_track: m.fully_matched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_prefix_partial_word() {
        let m = match_prefix("ca", "cat");
        assert_eq!(m.matched_len, 2);
        assert!(m.fully_matched);
    }

    #[test]
    fn test_match_prefix_with_typo() {
        let m = match_prefix("cx", "cat");
        assert_eq!(m.matched_len, 1);
        assert!(!m.fully_matched);
    }

    #[test]
    fn test_match_prefix_overlong_input() {
        let m = match_prefix("cats", "cat");
        assert_eq!(m.matched_len, 3);
        assert!(!m.fully_matched);
    }

    #[test]
    fn test_match_prefix_empty_input() {
        let m = match_prefix("", "cat");
        assert_eq!(m.matched_len, 0);
        assert!(m.fully_matched);
    }

    #[test]
    fn test_match_prefix_counts_chars_not_bytes() {
        let m = match_prefix("héll", "héllo");
        assert_eq!(m.matched_len, 4);
        assert!(m.fully_matched);
    }

    #[test]
    fn test_common_prefix_len_exhaustive_small_alphabet() {
        let alphabet = ["", "a", "b", "aa", "ab", "ba", "aab", "abb"];
        for typed in alphabet {
            for target in alphabet {
                let expected = typed
                    .bytes()
                    .zip(target.bytes())
                    .position(|(x, y)| x != y)
                    .unwrap_or_else(|| typed.len().min(target.len()));
                let m = match_prefix(typed, target);
                assert_eq!(m.matched_len, expected, "{typed:?} vs {target:?}");
                assert_eq!(m.fully_matched, expected == typed.len());
            }
        }
    }

    #[test]
    fn test_exact_match_trims_but_is_case_sensitive() {
        assert!(is_exact_match("cat", "cat"));
        assert!(is_exact_match("  cat \t", "cat"));
        assert!(!is_exact_match("Cat", "cat"));
        assert!(!is_exact_match("ca", "cat"));
    }

    #[test]
    fn test_prompt_split_uses_target_text() {
        let render = PromptRender::split("apx", "apple");
        assert_eq!(render.confirmed_prefix, "ap");
        assert_eq!(render.remaining_suffix, "ple");
        assert!(!render.on_track);
    }

    #[test]
    fn test_prompt_split_complete_and_empty() {
        let done = PromptRender::split("moon", "moon");
        assert_eq!(done.confirmed_prefix, "moon");
        assert_eq!(done.remaining_suffix, "");
        assert!(done.on_track);

        let fresh = PromptRender::split("", "moon");
        assert_eq!(fresh.confirmed_prefix, "");
        assert_eq!(fresh.remaining_suffix, "moon");
    }

    #[test]
    fn test_prompt_split_multibyte_boundary() {
        let render = PromptRender::split("ca", "café");
        assert_eq!(render.confirmed_prefix, "ca");
        assert_eq!(render.remaining_suffix, "fé");

        let render = PromptRender::split("café", "café!");
        assert_eq!(render.confirmed_prefix, "café");
        assert_eq!(render.remaining_suffix, "!");
    }
}
