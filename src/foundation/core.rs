use crate::foundation::error::{FoundryError, FoundryResult};

pub use kurbo::{Affine, Point, Vec2};

/// Straight-alpha RGBA8 color, written in configuration as `#rrggbb` or `#rrggbbaa`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::opaque(255, 255, 255);
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn parse_hex(s: &str) -> FoundryResult<Self> {
        let hex = s
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| FoundryError::config(format!("color '{s}' must start with '#'")))?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(FoundryError::config(format!(
                "color '{s}' must be #rrggbb or #rrggbbaa"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| FoundryError::config(format!("color '{s}' has invalid hex digits")))
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if hex.len() == 8 { channel(6)? } else { 255 },
        })
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Premultiplied pixel bytes for this color.
    pub fn premul(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}

impl TryFrom<String> for Rgba8 {
    type Error = FoundryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Rgba8> for String {
    fn from(value: Rgba8) -> Self {
        value.to_hex()
    }
}

/// One of the nine standard placement anchors.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Gravity {
    #[default]
    NorthWest,
    North,
    NorthEast,
    West,
    Center,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl Gravity {
    pub const ALL: [Gravity; 9] = [
        Gravity::NorthWest,
        Gravity::North,
        Gravity::NorthEast,
        Gravity::West,
        Gravity::Center,
        Gravity::East,
        Gravity::SouthWest,
        Gravity::South,
        Gravity::SouthEast,
    ];

    /// Top-left corner of an `inner` box placed inside an `outer` box at this anchor.
    ///
    /// Offsets point inward from the anchored edge: `dx` moves away from an east edge toward
    /// the west, `dy` moves away from a south edge toward the north. Centered axes take the
    /// offset as-is (positive right / down).
    pub fn place(self, outer: (u32, u32), inner: (u32, u32), offset: Offset) -> (i64, i64) {
        let (ow, oh) = (i64::from(outer.0), i64::from(outer.1));
        let (iw, ih) = (i64::from(inner.0), i64::from(inner.1));
        let dx = i64::from(offset.x);
        let dy = i64::from(offset.y);

        let x = match self.column() {
            Axis::Start => dx,
            Axis::Middle => (ow - iw) / 2 + dx,
            Axis::End => ow - iw - dx,
        };
        let y = match self.row() {
            Axis::Start => dy,
            Axis::Middle => (oh - ih) / 2 + dy,
            Axis::End => oh - ih - dy,
        };
        (x, y)
    }

    fn column(self) -> Axis {
        match self {
            Gravity::NorthWest | Gravity::West | Gravity::SouthWest => Axis::Start,
            Gravity::North | Gravity::Center | Gravity::South => Axis::Middle,
            Gravity::NorthEast | Gravity::East | Gravity::SouthEast => Axis::End,
        }
    }

    fn row(self) -> Axis {
        match self {
            Gravity::NorthWest | Gravity::North | Gravity::NorthEast => Axis::Start,
            Gravity::West | Gravity::Center | Gravity::East => Axis::Middle,
            Gravity::SouthWest | Gravity::South | Gravity::SouthEast => Axis::End,
        }
    }
}

#[derive(Clone, Copy)]
enum Axis {
    Start,
    Middle,
    End,
}

/// Integer pixel offset.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Offset {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
}

impl Offset {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Where an overlay lands on a base surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    /// Absolute offset from the base's top-left corner.
    At(Offset),
    /// Anchor plus an offset relative to that anchor.
    Anchored(Gravity, Offset),
}

impl Position {
    pub const ORIGIN: Self = Self::At(Offset::ZERO);

    pub fn resolve(self, base: (u32, u32), overlay: (u32, u32)) -> (i64, i64) {
        match self {
            Position::At(o) => (i64::from(o.x), i64::from(o.y)),
            Position::Anchored(g, o) => g.place(base, overlay, o),
        }
    }
}

/// Per-pixel combination rule used when compositing one surface onto another.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum BlendOp {
    /// Source over destination (premultiplied alpha).
    #[default]
    Over,
    /// Overlay pixels overwrite the base unconditionally inside the overlay's footprint.
    Copy,
    /// Per-channel multiplicative blend.
    Multiply,
    /// Per-channel screen blend.
    Screen,
    /// Overlay coverage (luminance times alpha) replaces the base alpha only.
    CopyAlpha,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
