//! Viseme and category definitions
//!
//! Visemes follow the Oculus-style 15 shape set. Each viseme belongs to
//! exactly one coarse category, which the scorer uses to apply family-wide
//! rules:
//! - Silence: closed, resting mouth
//! - Vowel: sustained formant energy (aa, E, I, O, U)
//! - Plosive: bursts after closure (PP, DD, kk, nn)
//! - Fricative: high-frequency noise (FF, TH, CH, SS, RR)

use std::fmt;
use std::str::FromStr;

use crate::LipsyncError;

/// Number of visemes in the set
pub const VISEME_COUNT: usize = 15;

/// Mouth shape for a moment of speech.
///
/// The discriminant order is the enumeration order used to break
/// scoring ties: the first maximum wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
#[allow(non_camel_case_types)]
pub enum Viseme {
    /// Silence, mouth at rest
    #[default]
    sil = 0,
    /// p, b, m (lips together)
    PP = 1,
    /// f, v (teeth on lip)
    FF = 2,
    /// th (tongue between teeth)
    TH = 3,
    /// d, t (tongue on ridge)
    DD = 4,
    /// k, g (back of tongue)
    kk = 5,
    /// ch, j, sh
    CH = 6,
    /// s, z
    SS = 7,
    /// n, l
    nn = 8,
    /// r
    RR = 9,
    /// "ah" as in "father"
    aa = 10,
    /// "eh" as in "bed"
    E = 11,
    /// "ee" as in "see"
    I = 12,
    /// "oh" as in "boat"
    O = 13,
    /// "oo" as in "boot"
    U = 14,
}

impl Viseme {
    /// All visemes in enumeration order
    pub const ALL: [Viseme; VISEME_COUNT] = [
        Viseme::sil,
        Viseme::PP,
        Viseme::FF,
        Viseme::TH,
        Viseme::DD,
        Viseme::kk,
        Viseme::CH,
        Viseme::SS,
        Viseme::nn,
        Viseme::RR,
        Viseme::aa,
        Viseme::E,
        Viseme::I,
        Viseme::O,
        Viseme::U,
    ];

    /// Position in enumeration order
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Viseme at an enumeration position
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Coarse category. Total and fixed.
    pub fn category(self) -> FsmCategory {
        match self {
            Viseme::sil => FsmCategory::Silence,
            Viseme::PP => FsmCategory::Plosive,
            Viseme::FF => FsmCategory::Fricative,
            Viseme::TH => FsmCategory::Fricative,
            Viseme::DD => FsmCategory::Plosive,
            Viseme::kk => FsmCategory::Plosive,
            Viseme::CH => FsmCategory::Fricative,
            Viseme::SS => FsmCategory::Fricative,
            Viseme::nn => FsmCategory::Plosive,
            Viseme::RR => FsmCategory::Fricative,
            Viseme::aa => FsmCategory::Vowel,
            Viseme::E => FsmCategory::Vowel,
            Viseme::I => FsmCategory::Vowel,
            Viseme::O => FsmCategory::Vowel,
            Viseme::U => FsmCategory::Vowel,
        }
    }

    /// Short label ("sil", "PP", ...)
    pub fn as_str(self) -> &'static str {
        match self {
            Viseme::sil => "sil",
            Viseme::PP => "PP",
            Viseme::FF => "FF",
            Viseme::TH => "TH",
            Viseme::DD => "DD",
            Viseme::kk => "kk",
            Viseme::CH => "CH",
            Viseme::SS => "SS",
            Viseme::nn => "nn",
            Viseme::RR => "RR",
            Viseme::aa => "aa",
            Viseme::E => "E",
            Viseme::I => "I",
            Viseme::O => "O",
            Viseme::U => "U",
        }
    }

    /// Blend shape name used by Oculus-style avatar rigs ("viseme_aa")
    pub fn blend_shape_name(self) -> &'static str {
        match self {
            Viseme::sil => "viseme_sil",
            Viseme::PP => "viseme_PP",
            Viseme::FF => "viseme_FF",
            Viseme::TH => "viseme_TH",
            Viseme::DD => "viseme_DD",
            Viseme::kk => "viseme_kk",
            Viseme::CH => "viseme_CH",
            Viseme::SS => "viseme_SS",
            Viseme::nn => "viseme_nn",
            Viseme::RR => "viseme_RR",
            Viseme::aa => "viseme_aa",
            Viseme::E => "viseme_E",
            Viseme::I => "viseme_I",
            Viseme::O => "viseme_O",
            Viseme::U => "viseme_U",
        }
    }

    /// Is this the silence viseme?
    #[inline]
    pub fn is_silence(self) -> bool {
        self == Viseme::sil
    }
}

impl fmt::Display for Viseme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Viseme {
    type Err = LipsyncError;

    /// Accepts the short label or the blend shape name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.strip_prefix("viseme_").unwrap_or(s);
        Viseme::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == label)
            .ok_or_else(|| LipsyncError::UnknownViseme(s.to_string()))
    }
}

/// Coarse acoustic category of a viseme
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum FsmCategory {
    /// No speech energy
    #[default]
    Silence,
    /// Sustained voiced energy
    Vowel,
    /// Burst after closure
    Plosive,
    /// Turbulent high-frequency energy
    Fricative,
}

impl FsmCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            FsmCategory::Silence => "silence",
            FsmCategory::Vowel => "vowel",
            FsmCategory::Plosive => "plosive",
            FsmCategory::Fricative => "fricative",
        }
    }

    /// Visemes belonging to this category, in enumeration order
    pub fn members(self) -> impl Iterator<Item = Viseme> {
        Viseme::ALL
            .into_iter()
            .filter(move |v| v.category() == self)
    }
}

impl fmt::Display for FsmCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
