use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Placeholder glyph used by the game service for unrevealed letters.
pub const PLACEHOLDER: char = '_';

pub const MAX_BREACH_LEVEL: u8 = 5;

/// Ordered breach stages; index equals the breach level that activates it.
pub const BREACH_STAGES: [&str; 6] = [
    "Secure",
    "Firewall Weakened",
    "Encryption Broken",
    "Credentials Exposed",
    "Unauthorized Access",
    "SYSTEM COMPROMISED",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Minimal,
    Cyber,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Minimal => Theme::Cyber,
            Theme::Cyber => Theme::Minimal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Minimal => "minimal",
            Theme::Cyber => "cyber",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "minimal" => Some(Theme::Minimal),
            "cyber" => Some(Theme::Cyber),
            _ => None,
        }
    }

    /// Label shown on the theme toggle affordance.
    pub fn label(self) -> &'static str {
        match self {
            Theme::Minimal => "⚪ Minimal",
            Theme::Cyber => "🟢 Cyber",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Glyph {
    Revealed(char),
    Hidden,
}

impl Glyph {
    pub fn from_char(c: char) -> Self {
        if c == PLACEHOLDER {
            Glyph::Hidden
        } else {
            Glyph::Revealed(c)
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Glyph::Revealed(c) => c,
            Glyph::Hidden => PLACEHOLDER,
        }
    }

    pub fn is_revealed(self) -> bool {
        matches!(self, Glyph::Revealed(_))
    }
}

/// Secret word as seen by the client. Travels as `"A _ _ L E"` on the wire;
/// an array of one-character strings is accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "MaskedWordWire", into = "String")]
pub struct MaskedWord(Vec<Glyph>);

#[derive(Deserialize)]
#[serde(untagged)]
enum MaskedWordWire {
    Joined(String),
    Slots(Vec<String>),
}

impl MaskedWord {
    /// Slots sit at even character offsets with a single space between
    /// them, so a space slot (a word break in the target) arrives as a run
    /// of three spaces.
    pub fn parse(joined: &str) -> Result<Self, ProtocolError> {
        let chars: Vec<char> = joined.chars().collect();
        if chars.is_empty() {
            return Ok(Self::default());
        }
        if chars.len() % 2 == 0 {
            return Err(ProtocolError::InvalidSlot(joined.to_string()));
        }
        chars
            .chunks(2)
            .map(|pair| match pair {
                [slot] | [slot, ' '] => Ok(Glyph::from_char(*slot)),
                _ => Err(ProtocolError::InvalidSlot(pair.iter().collect())),
            })
            .collect::<Result<_, _>>()
            .map(Self)
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn parse_slot(slot: &str) -> Result<Glyph, ProtocolError> {
    let mut chars = slot.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Glyph::from_char(c)),
        _ => Err(ProtocolError::InvalidSlot(slot.to_string())),
    }
}

impl TryFrom<MaskedWordWire> for MaskedWord {
    type Error = ProtocolError;

    fn try_from(value: MaskedWordWire) -> Result<Self, Self::Error> {
        match value {
            MaskedWordWire::Joined(joined) => Self::parse(&joined),
            MaskedWordWire::Slots(slots) => slots
                .iter()
                .map(|s| parse_slot(s))
                .collect::<Result<_, _>>()
                .map(Self),
        }
    }
}

impl From<MaskedWord> for String {
    fn from(value: MaskedWord) -> Self {
        value.to_string()
    }
}

impl fmt::Display for MaskedWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, glyph) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", glyph.as_char())?;
        }
        Ok(())
    }
}

/// The five progressively revealed parts of the breach figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FigurePart {
    Head,
    Body,
    LeftArm,
    RightArm,
    Legs,
}

impl FigurePart {
    pub const ALL: [FigurePart; 5] = [
        FigurePart::Head,
        FigurePart::Body,
        FigurePart::LeftArm,
        FigurePart::RightArm,
        FigurePart::Legs,
    ];

    pub fn index(self) -> usize {
        match self {
            FigurePart::Head => 0,
            FigurePart::Body => 1,
            FigurePart::LeftArm => 2,
            FigurePart::RightArm => 3,
            FigurePart::Legs => 4,
        }
    }

    /// Presentation slots driven by this part. Legs are a pair shown together.
    pub fn slots(self) -> &'static [&'static str] {
        match self {
            FigurePart::Head => &["man-head"],
            FigurePart::Body => &["man-body"],
            FigurePart::LeftArm => &["man-arm-l"],
            FigurePart::RightArm => &["man-arm-r"],
            FigurePart::Legs => &["man-leg-l", "man-leg-r"],
        }
    }

    pub fn visible_at(self, breach_level: u8) -> bool {
        usize::from(breach_level) > self.index()
    }
}

pub fn breach_stage_name(level: u8) -> &'static str {
    BREACH_STAGES[usize::from(level).min(BREACH_STAGES.len() - 1)]
}
