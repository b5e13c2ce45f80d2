use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").expect("hex color pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid color format: {0:?}")]
pub struct ColorError(pub String);

/// A validated role color.
///
/// Accepts `abc123`, `#abc123`, `abc` and `#ABC`. Three-digit colors are
/// expanded the CSS way, so `#abc` is `#aabbcc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleColor {
    rgb: u32,
}

impl RoleColor {
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let normalized = if input.starts_with('#') {
            input.to_string()
        } else {
            format!("#{input}")
        };

        if !HEX_COLOR.is_match(&normalized) {
            return Err(ColorError(input.to_string()));
        }

        let digits = &normalized[1..];
        let expanded: String = if digits.len() == 3 {
            digits.chars().flat_map(|c| [c, c]).collect()
        } else {
            digits.to_string()
        };

        let rgb = u32::from_str_radix(&expanded, 16).map_err(|_| ColorError(input.to_string()))?;
        Ok(Self { rgb })
    }

    pub fn rgb(&self) -> u32 {
        self.rgb
    }

    pub fn components(&self) -> [u8; 3] {
        [
            (self.rgb >> 16) as u8,
            (self.rgb >> 8) as u8,
            self.rgb as u8,
        ]
    }
}

impl FromStr for RoleColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RoleColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.rgb)
    }
}
