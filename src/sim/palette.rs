//! Car and garage colors

use serde::{Deserialize, Serialize};

/// The fixed color palette shared by cars and garages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarColor {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
}

impl CarColor {
    /// Palette in garage order
    pub const ALL: [CarColor; 5] = [
        CarColor::Red,
        CarColor::Green,
        CarColor::Blue,
        CarColor::Yellow,
        CarColor::Purple,
    ];

    /// Palette entry for an index, wrapping past the end
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CarColor::Red => "Red",
            CarColor::Green => "Green",
            CarColor::Blue => "Blue",
            CarColor::Yellow => "Yellow",
            CarColor::Purple => "Purple",
        }
    }

    /// RGBA for drawing
    pub fn rgba(&self) -> [u8; 4] {
        match self {
            CarColor::Red => [230, 41, 55, 255],
            CarColor::Green => [0, 228, 48, 255],
            CarColor::Blue => [0, 121, 241, 255],
            CarColor::Yellow => [253, 249, 0, 255],
            CarColor::Purple => [200, 122, 255, 255],
        }
    }
}

impl std::fmt::Display for CarColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
