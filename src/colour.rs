use crate::error::LayoutError;
use std::str::FromStr;

/// A colour, expressed in RGB, CMYK or grey colour spaces
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Colour {
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceCMYK colour; c, m, y, and k range from 0.0 to 1.0
    CMYK { c: f32, m: f32, y: f32, k: f32 },
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
}

impl Default for Colour {
    fn default() -> Self {
        colours::BLACK
    }
}

impl Colour {
    /// Create a new colour in the RGB space. r, g, and b range from 0.0 to 1.0
    pub fn new_rgb(r: f32, g: f32, b: f32) -> Colour {
        Colour::RGB { r, g, b }
    }

    /// Create a new colour in the RGB space. r, g, and b range from 0 to 255
    pub fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour::RGB {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Create a new colour in the CMYK space. c, m, y, and k range from 0.0 to 1.0
    pub fn new_cmyk(c: f32, m: f32, y: f32, k: f32) -> Colour {
        Colour::CMYK { c, m, y, k }
    }

    /// Create a new colour in the grey space, g ranges from 0.0 to 1.0
    pub fn new_grey(g: f32) -> Colour {
        Colour::Grey { g }
    }
}

impl<T: Into<f32>> From<(T, T, T)> for Colour {
    fn from(c: (T, T, T)) -> Self {
        Colour::RGB {
            r: c.0.into(),
            g: c.1.into(),
            b: c.2.into(),
        }
    }
}

impl<T: Into<f32>> From<(T, T, T, T)> for Colour {
    fn from(c: (T, T, T, T)) -> Self {
        Colour::CMYK {
            c: c.0.into(),
            m: c.1.into(),
            y: c.2.into(),
            k: c.3.into(),
        }
    }
}

/// Parses `#rgb`, `#rrggbb`, or one of the names in [colours]
impl FromStr for Colour {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LayoutError::InvalidStyle {
            property: "colour",
            value: s.to_string(),
        };

        if let Some(hex) = s.strip_prefix('#') {
            let digits: Vec<u8> = hex
                .chars()
                .map(|c| c.to_digit(16).map(|d| d as u8))
                .collect::<Option<Vec<u8>>>()
                .ok_or_else(invalid)?;
            return match digits.as_slice() {
                [r, g, b] => Ok(Colour::new_rgb_bytes(r * 17, g * 17, b * 17)),
                [r1, r2, g1, g2, b1, b2] => Ok(Colour::new_rgb_bytes(
                    r1 * 16 + r2,
                    g1 * 16 + g2,
                    b1 * 16 + b2,
                )),
                _ => Err(invalid()),
            };
        }

        match s.to_ascii_lowercase().as_str() {
            "black" => Ok(colours::BLACK),
            "white" => Ok(colours::WHITE),
            "red" => Ok(colours::RED),
            "green" => Ok(colours::GREEN),
            "blue" => Ok(colours::BLUE),
            "grey" | "gray" => Ok(colours::GREY),
            _ => Err(invalid()),
        }
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
    pub const WHITE: Colour = Colour::Grey { g: 1.0 };
    pub const GREY: Colour = Colour::Grey { g: 0.5 };
    pub const RED: Colour = Colour::RGB {
        r: 1.0,
        g: 0.0,
        b: 0.0,
    };
    pub const GREEN: Colour = Colour::RGB {
        r: 0.0,
        g: 1.0,
        b: 0.0,
    };
    pub const BLUE: Colour = Colour::RGB {
        r: 0.0,
        g: 0.0,
        b: 1.0,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_names() {
        assert_eq!("#ff0000".parse::<Colour>().unwrap(), colours::RED);
        assert_eq!("#fff".parse::<Colour>().unwrap(), Colour::new_rgb(1.0, 1.0, 1.0));
        assert_eq!("Black".parse::<Colour>().unwrap(), colours::BLACK);
    }

    #[test]
    fn rejects_unknown_colours() {
        assert!(matches!(
            "#12345".parse::<Colour>(),
            Err(LayoutError::InvalidStyle { property: "colour", .. })
        ));
        assert!("chartreuse-ish".parse::<Colour>().is_err());
    }
}
