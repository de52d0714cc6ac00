//! Viseme scoring - acoustic heuristics over the current frame and baseline
//!
//! Rules run in a fixed order and accumulate. Some rules overwrite instead
//! of adding (FF and most vowels); the last writer wins.

use std::ops::{Index, IndexMut};

use lipsync_core::{FeatureFrame, FsmCategory, Viseme, VISEME_COUNT};

/// Volume under which a frame counts as quiet
pub const SILENCE_VOLUME: f32 = 0.2;

/// Centroid rise (Hz) that marks a burst or hiss onset
pub const CENTROID_JUMP_HZ: f32 = 1000.0;

/// Centroid ceiling for vowels
pub const VOWEL_MAX_CENTROID_HZ: f32 = 6000.0;

/// Gap under which two vowel bands count as level
const LEVEL_GAP: f32 = 0.25;

/// One score per viseme, indexed in enumeration order
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct VisemeScores([f32; VISEME_COUNT]);

impl VisemeScores {
    /// All scores zero
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(&self, viseme: Viseme) -> f32 {
        self.0[viseme.index()]
    }

    pub fn set(&mut self, viseme: Viseme, score: f32) {
        self.0[viseme.index()] = score;
    }

    pub fn add(&mut self, viseme: Viseme, delta: f32) {
        self.0[viseme.index()] += delta;
    }

    pub fn scale(&mut self, viseme: Viseme, factor: f32) {
        self.0[viseme.index()] *= factor;
    }

    /// Highest scoring viseme. Ties go to the earliest in enumeration order.
    pub fn argmax(&self) -> Viseme {
        let mut best = Viseme::sil;
        let mut best_score = f32::NEG_INFINITY;
        for viseme in Viseme::ALL {
            let score = self.get(viseme);
            if score > best_score {
                best_score = score;
                best = viseme;
            }
        }
        best
    }

    pub fn iter(&self) -> impl Iterator<Item = (Viseme, f32)> + '_ {
        Viseme::ALL.into_iter().map(move |v| (v, self.get(v)))
    }

    pub fn as_array(&self) -> &[f32; VISEME_COUNT] {
        &self.0
    }
}

impl Index<Viseme> for VisemeScores {
    type Output = f32;

    fn index(&self, viseme: Viseme) -> &f32 {
        &self.0[viseme.index()]
    }
}

impl IndexMut<Viseme> for VisemeScores {
    fn index_mut(&mut self, viseme: Viseme) -> &mut f32 {
        &mut self.0[viseme.index()]
    }
}

/// Score every viseme for the current frame against the baseline.
///
/// `d_volume` and `d_centroid` are `current - baseline`.
pub fn score_visemes(
    current: &FeatureFrame,
    baseline: &FeatureFrame,
    d_volume: f32,
    d_centroid: f32,
) -> VisemeScores {
    let mut scores = VisemeScores::zero();

    // Silence
    if baseline.volume < SILENCE_VOLUME && current.volume < SILENCE_VOLUME {
        scores[Viseme::sil] += 1.0;
    }

    // Plosives: rising energy after quiet, centroid jump
    for viseme in FsmCategory::Plosive.members() {
        if d_volume < 0.01 {
            // possibly a fade-out
            scores[viseme] -= 0.5;
        }
        if baseline.volume < SILENCE_VOLUME {
            scores[viseme] += 0.2;
        }
        if d_centroid > CENTROID_JUMP_HZ {
            scores[viseme] += 0.2;
        }
    }

    score_bursts(current, &mut scores);

    // Fricatives: high centroid, sustained high-band energy
    if d_centroid > CENTROID_JUMP_HZ
        && current.centroid_hz > 6000.0
        && baseline.centroid_hz > 5000.0
        && current.high_band() > 0.4
        && baseline.high_band() > 0.3
    {
        scores.set(Viseme::FF, 0.7);
    }

    // Vowels: sustained mid-frequency energy, moderate centroid
    if baseline.volume > 0.1
        && baseline.centroid_hz < VOWEL_MAX_CENTROID_HZ
        && current.centroid_hz < VOWEL_MAX_CENTROID_HZ
    {
        score_vowels(baseline, &mut scores);
    }

    scores
}

/// Burst tiering by centroid; exactly one tier fires
fn score_bursts(current: &FeatureFrame, scores: &mut VisemeScores) {
    let centroid = current.centroid_hz;
    if centroid <= 1000.0 || centroid >= 8000.0 {
        return;
    }

    if centroid > 7000.0 {
        scores[Viseme::DD] += 0.6;
    } else if centroid > 5000.0 {
        scores[Viseme::kk] += 0.6;
    } else if centroid > 4000.0 {
        scores[Viseme::PP] += 1.0;
        if current.high_band() > 0.25 && centroid < 6000.0 {
            scores[Viseme::DD] += 1.4;
        }
    } else {
        scores[Viseme::nn] += 0.6;
    }
}

/// Vowel shapes from the baseline's formant bands
fn score_vowels(baseline: &FeatureFrame, scores: &mut VisemeScores) {
    let [b1, b2, b3, b4, b5, _, _] = baseline.bands;

    if b3 <= 0.1 && b4 <= 0.1 {
        return;
    }

    let gap_b1_b2 = (b1 - b2).abs();
    let max_gap_b2_b3_b4 = (b2 - b3).abs().max((b2 - b4).abs()).max((b3 - b4).abs());

    if b4 > b3 {
        scores.set(Viseme::aa, 0.8);
        if b3 > b2 {
            scores.add(Viseme::aa, 0.2);
        }
    }
    if b3 > b2 && b3 > b4 {
        scores.set(Viseme::I, 0.7);
    }
    if gap_b1_b2 < LEVEL_GAP {
        scores.set(Viseme::U, 0.7);
    }
    if max_gap_b2_b3_b4 < LEVEL_GAP {
        scores.set(Viseme::O, 0.9);
    }
    if b2 > b3 && b3 > b4 {
        scores.set(Viseme::E, 1.0);
    }
    if b3 < 0.2 && b4 > 0.3 {
        scores.set(Viseme::I, 0.7);
    }
    // overrides the level-gap O above
    if b3 > 0.25 && b5 > 0.25 {
        scores.set(Viseme::O, 0.7);
    }
    if b3 < 0.15 && b5 < 0.15 {
        scores.set(Viseme::U, 0.7);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lipsync_core::BAND_COUNT;

    fn frame(bands: [f32; BAND_COUNT], centroid_hz: f32) -> FeatureFrame {
        FeatureFrame::from_bands(bands, centroid_hz)
    }

    fn deltas(current: &FeatureFrame, baseline: &FeatureFrame) -> (f32, f32) {
        (
            current.volume - baseline.volume,
            current.centroid_hz - baseline.centroid_hz,
        )
    }

    #[test]
    fn test_silence_scores() {
        let scores = score_visemes(&FeatureFrame::ZERO, &FeatureFrame::ZERO, 0.0, 0.0);

        assert_eq!(scores[Viseme::sil], 1.0);
        // fade-out penalty plus quiet-baseline bonus
        for viseme in FsmCategory::Plosive.members() {
            assert!((scores[viseme] - -0.3).abs() < 1e-6);
        }
        assert_eq!(scores.argmax(), Viseme::sil);
    }

    #[test]
    fn test_argmax_first_max_wins() {
        let mut scores = VisemeScores::zero();
        scores.set(Viseme::O, 0.9);
        scores.set(Viseme::E, 0.9);
        assert_eq!(scores.argmax(), Viseme::E);

        // all zero: silence comes first
        assert_eq!(VisemeScores::zero().argmax(), Viseme::sil);
    }

    #[test]
    fn test_burst_tiers() {
        let baseline = frame([0.05; BAND_COUNT], 500.0);
        let cases = [
            (7500.0, Viseme::DD),
            (5500.0, Viseme::kk),
            (4500.0, Viseme::PP),
            (2000.0, Viseme::nn),
        ];
        let mut bands = [0.3; BAND_COUNT];
        bands[6] = 0.2;
        for (centroid, expected) in cases {
            let current = frame(bands, centroid);
            let (dv, dc) = deltas(&current, &baseline);
            let scores = score_visemes(&current, &baseline, dv, dc);
            assert_eq!(scores.argmax(), expected, "centroid {centroid}");
        }
    }

    #[test]
    fn test_mid_burst_with_hiss_prefers_dd() {
        let baseline = frame([0.05; BAND_COUNT], 500.0);
        let current = frame([0.3; BAND_COUNT], 4500.0);
        let (dv, dc) = deltas(&current, &baseline);
        let scores = score_visemes(&current, &baseline, dv, dc);

        assert!((scores[Viseme::PP] - 1.4).abs() < 1e-5);
        assert!((scores[Viseme::DD] - 1.8).abs() < 1e-5);
        assert_eq!(scores.argmax(), Viseme::DD);
    }

    #[test]
    fn test_no_burst_outside_range() {
        let baseline = frame([0.05; BAND_COUNT], 500.0);
        let current = frame([0.3; BAND_COUNT], 900.0);
        let (dv, dc) = deltas(&current, &baseline);
        let scores = score_visemes(&current, &baseline, dv, dc);
        for viseme in FsmCategory::Plosive.members() {
            // only the family rules: +0.2 quiet baseline
            assert!((scores[viseme] - 0.2).abs() < 1e-6);
        }
    }

    #[test]
    fn test_fricative_overwrites() {
        let mut bands = [0.1; BAND_COUNT];
        bands[6] = 0.6;
        let current = frame(bands, 7200.0);
        let baseline = frame(bands, 5500.0);
        let scores = score_visemes(&current, &baseline, 0.0, 1700.0);

        assert_eq!(scores[Viseme::FF], 0.7);
    }

    #[test]
    fn test_fricative_needs_baseline_hiss() {
        let mut bands = [0.1; BAND_COUNT];
        bands[6] = 0.6;
        let current = frame(bands, 7200.0);
        let baseline = frame([0.1; BAND_COUNT], 5500.0);
        let scores = score_visemes(&current, &baseline, 0.0, 1700.0);

        assert_eq!(scores[Viseme::FF], 0.0);
    }

    #[test]
    fn test_open_vowel_aa() {
        // F2 above F1, F1 rising: "ah"
        let baseline = frame([0.5, 0.1, 0.3, 0.6, 0.2, 0.1, 0.05], 1500.0);
        let scores = score_visemes(&baseline, &baseline, 0.0, 0.0);

        assert!((scores[Viseme::aa] - 1.0).abs() < 1e-6);
        assert_eq!(scores.argmax(), Viseme::aa);
    }

    #[test]
    fn test_falling_formants_e() {
        let baseline = frame([0.3, 0.8, 0.5, 0.2, 0.1, 0.05, 0.05], 1200.0);
        let scores = score_visemes(&baseline, &baseline, 0.0, 0.0);

        assert_eq!(scores[Viseme::E], 1.0);
        assert_eq!(scores.argmax(), Viseme::E);
    }

    #[test]
    fn test_late_o_rule_overwrites_level_gap_o() {
        // b2, b3, b4 level (O = 0.9), then b3 and b5 strong (O = 0.7)
        let baseline = frame([0.4, 0.4, 0.45, 0.4, 0.3, 0.1, 0.05], 1500.0);
        let scores = score_visemes(&baseline, &baseline, 0.0, 0.0);

        assert_eq!(scores[Viseme::O], 0.7);
    }

    #[test]
    fn test_peaked_f2_gives_i() {
        let baseline = frame([0.6, 0.2, 0.5, 0.3, 0.1, 0.0, 0.0], 1500.0);
        let scores = score_visemes(&baseline, &baseline, 0.0, 0.0);

        assert_eq!(scores[Viseme::I], 0.7);
        assert_eq!(scores[Viseme::U], 0.0);
        assert_eq!(scores[Viseme::aa], 0.0);
        assert_eq!(scores[Viseme::O], 0.0);
    }

    #[test]
    fn test_weak_f2_strong_f3_gives_i() {
        // I from the b3 < 0.2 && b4 > 0.3 rule alone, aa set beside it
        let baseline = frame([0.6, 0.3, 0.15, 0.5, 0.3, 0.0, 0.0], 1500.0);
        let scores = score_visemes(&baseline, &baseline, 0.0, 0.0);

        assert_eq!(scores[Viseme::I], 0.7);
        assert_eq!(scores[Viseme::aa], 0.8);
        assert_eq!(scores[Viseme::U], 0.0);
    }

    #[test]
    fn test_both_i_and_u_rules_fire() {
        let baseline = frame([0.1, 0.1, 0.1, 0.5, 0.1, 0.0, 0.0], 1500.0);
        let scores = score_visemes(&baseline, &baseline, 0.0, 0.0);

        assert_eq!(scores[Viseme::I], 0.7);
        assert_eq!(scores[Viseme::U], 0.7);
        assert_eq!(scores[Viseme::aa], 0.8);
    }

    #[test]
    fn test_level_low_bands_give_u() {
        let baseline = frame([0.5, 0.4, 0.3, 0.1, 0.3, 0.0, 0.0], 1500.0);
        let scores = score_visemes(&baseline, &baseline, 0.0, 0.0);

        assert_eq!(scores[Viseme::U], 0.7);
        assert_eq!(scores[Viseme::I], 0.0);
        assert_eq!(scores[Viseme::E], 1.0);
    }

    #[test]
    fn test_dark_f2_and_f4_give_u() {
        // U from the b3 < 0.15 && b5 < 0.15 rule alone
        let baseline = frame([0.6, 0.2, 0.1, 0.25, 0.1, 0.0, 0.0], 1500.0);
        let scores = score_visemes(&baseline, &baseline, 0.0, 0.0);

        assert_eq!(scores[Viseme::U], 0.7);
        assert_eq!(scores[Viseme::O], 0.9);
        assert_eq!(scores[Viseme::I], 0.0);
    }

    #[test]
    fn test_vowel_gate_on_mid_bands() {
        let closed = frame([0.5, 0.3, 0.1, 0.1, 0.3, 0.0, 0.0], 1500.0);
        assert!(closed.volume > 0.1);
        let scores = score_visemes(&closed, &closed, 0.0, 0.0);
        for viseme in FsmCategory::Vowel.members() {
            assert_eq!(scores[viseme], 0.0, "{viseme}");
        }

        let open = frame([0.5, 0.3, 0.1, 0.11, 0.3, 0.0, 0.0], 1500.0);
        let scores = score_visemes(&open, &open, 0.0, 0.0);
        assert_eq!(scores[Viseme::aa], 0.8);
    }

    #[test]
    fn test_centroid_jump_bonus_alone() {
        // loud baseline, rising volume, centroid above the burst range
        let baseline = frame([0.3; BAND_COUNT], 2000.0);
        let current = frame([0.4; BAND_COUNT], 8500.0);
        let (dv, dc) = deltas(&current, &baseline);
        let scores = score_visemes(&current, &baseline, dv, dc);
        for viseme in FsmCategory::Plosive.members() {
            assert!((scores[viseme] - 0.2).abs() < 1e-6, "{viseme}");
        }

        let scores = score_visemes(&current, &baseline, dv, 900.0);
        for viseme in FsmCategory::Plosive.members() {
            assert_eq!(scores[viseme], 0.0, "{viseme}");
        }
    }

    #[test]
    fn test_vowels_skipped_when_quiet() {
        let baseline = frame([0.1, 0.05, 0.05, 0.05, 0.05, 0.0, 0.0], 1500.0);
        assert!(baseline.volume <= 0.1);
        let scores = score_visemes(&baseline, &baseline, 0.0, 0.0);

        for viseme in FsmCategory::Vowel.members() {
            assert_eq!(scores[viseme], 0.0);
        }
    }

    #[test]
    fn test_vowels_skipped_when_bright() {
        let baseline = frame([0.5, 0.1, 0.3, 0.6, 0.2, 0.1, 0.05], 1500.0);
        let current = frame([0.5, 0.1, 0.3, 0.6, 0.2, 0.1, 0.05], 6500.0);
        let scores = score_visemes(&current, &baseline, 0.0, 5000.0);

        for viseme in FsmCategory::Vowel.members() {
            assert_eq!(scores[viseme], 0.0);
        }
    }

    #[test]
    fn test_iter_in_enumeration_order() {
        let scores = VisemeScores::zero();
        let order: Vec<_> = scores.iter().map(|(v, _)| v).collect();
        assert_eq!(order, Viseme::ALL.to_vec());
    }
}
