/// Color with an alpha channel, stored as the record form `a,r,g,b`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Argb {
    pub alpha: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Argb {
    pub const TRANSPARENT: Argb = Argb::new(0, 0, 0, 0);

    pub const fn new(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Argb {
            alpha,
            red,
            green,
            blue,
        }
    }

    /// Packs the channels into the `0xAARRGGBB` integer display entities
    /// take as a background color.
    pub const fn packed(&self) -> u32 {
        (self.alpha as u32) << 24
            | (self.red as u32) << 16
            | (self.green as u32) << 8
            | self.blue as u32
    }

    pub fn parse(input: &str) -> Option<Self> {
        let mut parts = input.split(',').map(str::trim);
        let alpha = parts.next()?.parse().ok()?;
        let red = parts.next()?.parse().ok()?;
        let green = parts.next()?.parse().ok()?;
        let blue = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Argb::new(alpha, red, green, blue))
    }
}

impl std::fmt::Display for Argb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{},{}", self.alpha, self.red, self.green, self.blue)
    }
}

/// Opaque color, stored as the record form `r,g,b`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Rgb { red, green, blue }
    }

    pub fn parse(input: &str) -> Option<Self> {
        let mut parts = input.split(',').map(str::trim);
        let red = parts.next()?.parse().ok()?;
        let green = parts.next()?.parse().ok()?;
        let blue = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Rgb::new(red, green, blue))
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.red, self.green, self.blue)
    }
}
