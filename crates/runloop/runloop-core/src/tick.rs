//! Tick positions and keyframe label parsing.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A quantized playback position in percent, always within `0..=100`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tick(u8);

/// Why a keyframe label could not be turned into a [`Tick`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("keyframe label {0:?} contains no digits")]
    NoDigits(String),
    #[error("keyframe label {0:?} is outside 0..=100")]
    OutOfRange(String),
}

impl Tick {
    pub const MIN: Tick = Tick(0);
    pub const MAX: Tick = Tick(100);

    #[inline]
    pub fn new(value: u8) -> Option<Self> {
        (value <= 100).then_some(Self(value))
    }

    /// Clamp an arbitrary integer into `0..=100`.
    #[inline]
    pub fn saturating(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Extract the first run of ASCII digits from `label`, ignoring everything else.
    ///
    /// `"25%"` → 25, `"at 7"` → 7, `"12.5%"` → 12, `"-5"` → 5.
    pub fn parse(label: &str) -> Result<Self, LabelError> {
        let digits: &str = match label.find(|c: char| c.is_ascii_digit()) {
            Some(start) => {
                let rest = &label[start..];
                let end = rest
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(rest.len());
                &rest[..end]
            }
            None => return Err(LabelError::NoDigits(label.to_string())),
        };
        let significant = digits.trim_start_matches('0');
        if significant.len() > 3 {
            return Err(LabelError::OutOfRange(label.to_string()));
        }
        let value: u16 = if significant.is_empty() {
            0
        } else {
            significant
                .parse()
                .map_err(|_| LabelError::OutOfRange(label.to_string()))?
        };
        u8::try_from(value)
            .ok()
            .and_then(Tick::new)
            .ok_or_else(|| LabelError::OutOfRange(label.to_string()))
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl From<Tick> for u8 {
    fn from(t: Tick) -> u8 {
        t.0
    }
}

impl TryFrom<u8> for Tick {
    type Error = LabelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Tick::new(value).ok_or_else(|| LabelError::OutOfRange(value.to_string()))
    }
}

/// Anything that can name a keyframe position: `"25%"`, `"50"`, `75`, `Tick`.
pub trait KeyLabel {
    fn to_tick(&self) -> Result<Tick, LabelError>;
}

impl KeyLabel for Tick {
    fn to_tick(&self) -> Result<Tick, LabelError> {
        Ok(*self)
    }
}

impl KeyLabel for str {
    fn to_tick(&self) -> Result<Tick, LabelError> {
        Tick::parse(self)
    }
}

impl KeyLabel for String {
    fn to_tick(&self) -> Result<Tick, LabelError> {
        Tick::parse(self)
    }
}

impl<T: KeyLabel + ?Sized> KeyLabel for &T {
    fn to_tick(&self) -> Result<Tick, LabelError> {
        (**self).to_tick()
    }
}

macro_rules! numeric_label {
    ($($t:ty),*) => {
        $(
            impl KeyLabel for $t {
                fn to_tick(&self) -> Result<Tick, LabelError> {
                    Tick::parse(&self.to_string())
                }
            }
        )*
    };
}

numeric_label!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);
