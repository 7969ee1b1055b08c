/// Streak bonus grows by one every third consecutive correct word, up to this cap.
pub const MAX_STREAK_BONUS: u32 = 5;

/// Accuracy in whole percent, rounded half up. An untouched round is 100%.
pub fn accuracy_percent(hits: u32, total: u32) -> u32 {
    if total == 0 {
        return 100;
    }
    let (hits, total) = (u64::from(hits), u64::from(total));
    ((200 * hits + total) / (2 * total)) as u32
}

/// Per-round counters: score, streak and keystroke accuracy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreKeeper {
    score: u32,
    streak: u32,
    hits: u32,
    total: u32,
}

impl ScoreKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bonus for a correct word given the streak after it was counted.
    pub fn streak_bonus(streak: u32) -> u32 {
        (streak / 3).min(MAX_STREAK_BONUS)
    }

    /// Returns the points awarded for the word.
    pub fn on_correct_submit(&mut self, target_len: usize) -> u32 {
        self.streak += 1;
        let base = u32::try_from(target_len).unwrap_or(u32::MAX).max(1);
        let delta = base.saturating_add(Self::streak_bonus(self.streak));
        self.score = self.score.saturating_add(delta);
        delta
    }

    pub fn on_incorrect_submit(&mut self) {
        self.streak = 0;
    }

    pub fn on_live_keystroke(&mut self, is_prefix_ok: bool) {
        self.total += 1;
        if is_prefix_ok {
            self.hits += 1;
        } else {
            self.streak = 0;
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn accuracy(&self) -> u32 {
        accuracy_percent(self.hits, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_defaults_to_100() {
        assert_eq!(accuracy_percent(0, 0), 100);
        assert_eq!(ScoreKeeper::new().accuracy(), 100);
    }

    #[test]
    fn test_accuracy_rounds_to_nearest() {
        assert_eq!(accuracy_percent(1, 3), 33);
        assert_eq!(accuracy_percent(2, 3), 67);
        assert_eq!(accuracy_percent(1, 8), 13); // 12.5 rounds up
        assert_eq!(accuracy_percent(0, 5), 0);
        assert_eq!(accuracy_percent(5, 5), 100);
    }

    #[test]
    fn test_accuracy_matches_float_rounding() {
        for total in 1..=60u32 {
            for hits in 0..=total {
                let expected = (100.0 * hits as f64 / total as f64).round() as u32;
                assert_eq!(accuracy_percent(hits, total), expected, "{hits}/{total}");
            }
        }
    }

    #[test]
    fn test_correct_submit_with_streak_bonus() {
        let mut keeper = ScoreKeeper::new();
        keeper.on_correct_submit(1);
        keeper.on_correct_submit(1);
        assert_eq!(keeper.streak(), 2);

        // third in a row: streak 3, bonus 1, "cat" is worth 3 + 1
        let delta = keeper.on_correct_submit(3);
        assert_eq!(delta, 4);
        assert_eq!(keeper.streak(), 3);
        assert_eq!(keeper.score(), 1 + 1 + 4);
    }

    #[test]
    fn test_empty_target_still_scores_one() {
        let mut keeper = ScoreKeeper::new();
        assert_eq!(keeper.on_correct_submit(0), 1);
    }

    #[test]
    fn test_bonus_is_capped() {
        assert_eq!(ScoreKeeper::streak_bonus(2), 0);
        assert_eq!(ScoreKeeper::streak_bonus(15), 5);
        assert_eq!(ScoreKeeper::streak_bonus(300), 5);

        let mut keeper = ScoreKeeper::new();
        for _ in 0..20 {
            keeper.on_correct_submit(4);
        }
        assert_eq!(keeper.on_correct_submit(4), 4 + MAX_STREAK_BONUS);
    }

    #[test]
    fn test_delta_formula_for_any_prior_streak() {
        for prior in 0..40u32 {
            for len in 0..12usize {
                let mut keeper = ScoreKeeper::new();
                for _ in 0..prior {
                    keeper.on_correct_submit(1);
                }
                let expected = (len as u32).max(1) + ((prior + 1) / 3).min(5);
                assert_eq!(keeper.on_correct_submit(len), expected);
            }
        }
    }

    #[test]
    fn test_incorrect_submit_resets_streak_only() {
        let mut keeper = ScoreKeeper::new();
        keeper.on_correct_submit(5);
        keeper.on_correct_submit(5);
        keeper.on_incorrect_submit();

        assert_eq!(keeper.streak(), 0);
        assert_eq!(keeper.score(), 10);
    }

    #[test]
    fn test_live_keystrokes() {
        let mut keeper = ScoreKeeper::new();
        keeper.on_correct_submit(3);
        keeper.on_live_keystroke(true);
        assert_eq!(keeper.streak(), 1);

        keeper.on_live_keystroke(false);
        assert_eq!(keeper.streak(), 0);
        assert_eq!(keeper.hits(), 1);
        assert_eq!(keeper.total(), 2);
        assert_eq!(keeper.accuracy(), 50);
    }
}
