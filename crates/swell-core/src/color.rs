#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Multiply every channel by `factor`, truncating toward zero.
    #[inline]
    pub fn scale(self, factor: f32) -> Self {
        let f = factor.max(0.0);
        Self {
            r: (self.r as f32 * f) as u8,
            g: (self.g as f32 * f) as u8,
            b: (self.b as f32 * f) as u8,
        }
    }

    pub fn max_channel(self) -> u8 {
        self.r.max(self.g).max(self.b)
    }

    pub fn is_black(self) -> bool {
        self == Self::BLACK
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

pub const RED: Rgb = Rgb::new(255, 0, 0);
pub const ORANGE: Rgb = Rgb::new(255, 40, 0);
pub const YELLOW: Rgb = Rgb::new(255, 150, 0);
pub const GREEN: Rgb = Rgb::new(0, 255, 0);
pub const CYAN: Rgb = Rgb::new(0, 255, 255);
pub const BLUE: Rgb = Rgb::new(0, 0, 255);
pub const INDIGO: Rgb = Rgb::new(63, 0, 255);
pub const VIOLET: Rgb = Rgb::new(127, 0, 255);
pub const PINK: Rgb = Rgb::new(242, 90, 255);
pub const WHITE: Rgb = Rgb::new(255, 255, 255);

/// Far-to-near color ramp for the blob: red when the hand is far away,
/// white when it is right at the sensor.
pub const DEFAULT_PALETTE: [Rgb; 10] = [
    RED, ORANGE, YELLOW, GREEN, CYAN, BLUE, INDIGO, VIOLET, PINK, WHITE,
];
