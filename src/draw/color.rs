//! Color model: explicit RGBA values, palette indices, and the packed 32-bit
//! form used at the toolkit boundary.
//!
//! The packed form keeps RGB in bits 8–31 and either an alpha value or a
//! palette index in bits 0–7. A value with no RGB bits is a palette index, so
//! pure black carrying an alpha byte is stored with the [`BLACK_SENTINEL`] RGB
//! bits instead of zeros.

/// Packed RGB bits standing in for pure black when an alpha byte is present.
pub const BLACK_SENTINEL: u32 = 0x0101_0100;

const RGB_MASK: u32 = 0xFFFF_FF00;

/// An explicit color with 8-bit channels. `a == 255` is fully opaque.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    const fn from_rgb_bits(bits: u32) -> Self {
        Self::rgb((bits >> 24) as u8, (bits >> 16) as u8, (bits >> 8) as u8)
    }

    /// Channels scaled to 0.0–1.0, as Cairo sources expect.
    pub fn to_unit(self) -> (f64, f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
            self.a as f64 / 255.0,
        )
    }

    /// Perceived brightness on the 0–255 scale.
    fn luminance(self) -> u32 {
        (self.r as u32 * 30 + self.g as u32 * 59 + self.b as u32 * 11) / 100
    }
}

/// Index into the 256-entry [`Palette`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PaletteIndex(pub u8);

impl PaletteIndex {
    pub const FOREGROUND: PaletteIndex = PaletteIndex(0);
    pub const BACKGROUND2: PaletteIndex = PaletteIndex(7);
    pub const INACTIVE: PaletteIndex = PaletteIndex(8);
    pub const SELECTION: PaletteIndex = PaletteIndex(15);
    pub const GRAY_RAMP: PaletteIndex = PaletteIndex(32);
    pub const BACKGROUND: PaletteIndex = PaletteIndex(49);
    pub const COLOR_CUBE: PaletteIndex = PaletteIndex(56);
    pub const BLACK: PaletteIndex = PaletteIndex(56);
    pub const GREEN: PaletteIndex = PaletteIndex(63);
    pub const RED: PaletteIndex = PaletteIndex(88);
    pub const YELLOW: PaletteIndex = PaletteIndex(95);
    pub const BLUE: PaletteIndex = PaletteIndex(216);
    pub const CYAN: PaletteIndex = PaletteIndex(223);
    pub const MAGENTA: PaletteIndex = PaletteIndex(248);
    pub const WHITE: PaletteIndex = PaletteIndex(255);
}

/// A drawing color: either explicit channels or a palette reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Rgba(Rgba),
    Index(PaletteIndex),
}

impl Color {
    pub const FOREGROUND: Color = Color::Index(PaletteIndex::FOREGROUND);
    pub const BACKGROUND: Color = Color::Index(PaletteIndex::BACKGROUND);
    pub const BACKGROUND2: Color = Color::Index(PaletteIndex::BACKGROUND2);
    pub const SELECTION: Color = Color::Index(PaletteIndex::SELECTION);
    pub const INACTIVE: Color = Color::Index(PaletteIndex::INACTIVE);
    pub const BLACK: Color = Color::Index(PaletteIndex::BLACK);
    pub const WHITE: Color = Color::Index(PaletteIndex::WHITE);
    pub const RED: Color = Color::Index(PaletteIndex::RED);
    pub const GREEN: Color = Color::Index(PaletteIndex::GREEN);
    pub const BLUE: Color = Color::Index(PaletteIndex::BLUE);
    pub const YELLOW: Color = Color::Index(PaletteIndex::YELLOW);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgba(Rgba::rgb(r, g, b))
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color::Rgba(Rgba::new(r, g, b, a))
    }

    /// Decodes the packed boundary form.
    ///
    /// No RGB bits means a palette index (including index 0). Otherwise the
    /// low byte is alpha, with 0 read as fully opaque. The black sentinel
    /// decodes back to pure black.
    pub fn from_packed(packed: u32) -> Self {
        let rgb = packed & RGB_MASK;
        let low = (packed & 0xFF) as u8;
        if rgb == 0 {
            return Color::Index(PaletteIndex(low));
        }
        let alpha = if low == 0 { 255 } else { low };
        let channels = if rgb == BLACK_SENTINEL {
            Rgba::rgb(0, 0, 0)
        } else {
            Rgba::from_rgb_bits(rgb)
        };
        Color::Rgba(Rgba { a: alpha, ..channels })
    }

    /// Encodes into the packed boundary form.
    pub fn to_packed(self) -> u32 {
        match self {
            Color::Index(PaletteIndex(i)) => i as u32,
            Color::Rgba(c) => pack_rgba(c),
        }
    }
}

fn pack_rgba(c: Rgba) -> u32 {
    let mut rgb = ((c.r as u32) << 24) | ((c.g as u32) << 16) | ((c.b as u32) << 8);
    if rgb == 0 {
        rgb = BLACK_SENTINEL;
    }
    rgb | c.a as u32
}

impl From<Rgba> for Color {
    fn from(c: Rgba) -> Self {
        Color::Rgba(c)
    }
}

impl From<PaletteIndex> for Color {
    fn from(i: PaletteIndex) -> Self {
        Color::Index(i)
    }
}

/// Encodes `alpha` into a packed color.
///
/// Indexed colors are resolved through the palette first, black is written
/// with the sentinel RGB bits, and an alpha of 0 becomes 255: the encoding
/// has no room for a fully transparent color.
pub fn add_alpha(palette: &Palette, packed: u32, alpha: u8) -> u32 {
    let base = palette.resolve(Color::from_packed(packed));
    let alpha = if alpha == 0 { 255 } else { alpha };
    pack_rgba(Rgba { a: alpha, ..base })
}

const GRAY_RAMP_LEN: usize = 24;
const BACKGROUND_STEP: usize = 17;
const NUM_RED: usize = 5;
const NUM_GREEN: usize = 8;
const NUM_BLUE: usize = 5;

/// The 256-entry color table indexed colors resolve through.
///
/// Layout: 16 base colors, a 24-step gray ramp at 32 whose step 17 is the
/// background color, and a 5×8×5 color cube starting at 56.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    entries: [Rgba; 256],
}

impl Default for Palette {
    fn default() -> Self {
        const BASE: [u32; 16] = [
            0x000000, 0xff0000, 0x00ff00, 0xffff00, 0x0000ff, 0xff00ff, 0x00ffff, 0xffffff,
            0x555555, 0xc67171, 0x71c671, 0x8e8e38, 0x7171c6, 0x8e388e, 0x388e8e, 0x000080,
        ];

        let mut entries = [Rgba::rgb(0, 0, 0); 256];
        for (slot, rgb) in entries.iter_mut().zip(BASE) {
            *slot = Rgba::from_rgb_bits(rgb << 8);
        }
        for (i, slot) in entries[16..32].iter_mut().enumerate() {
            let v = (i * 17) as u8;
            *slot = Rgba::rgb(v, v, v);
        }
        for b in 0..NUM_BLUE {
            for r in 0..NUM_RED {
                for g in 0..NUM_GREEN {
                    let index = PaletteIndex::COLOR_CUBE.0 as usize + (b * NUM_RED + r) * NUM_GREEN + g;
                    entries[index] = Rgba::rgb(
                        (r * 255 / (NUM_RED - 1)) as u8,
                        (g * 255 / (NUM_GREEN - 1)) as u8,
                        (b * 255 / (NUM_BLUE - 1)) as u8,
                    );
                }
            }
        }

        let mut palette = Self { entries };
        palette.set_background(Rgba::rgb(0xc0, 0xc0, 0xc0));
        palette
    }
}

impl Palette {
    pub fn get(&self, index: PaletteIndex) -> Rgba {
        self.entries[index.0 as usize]
    }

    pub fn set(&mut self, index: PaletteIndex, color: Rgba) {
        self.entries[index.0 as usize] = Rgba { a: 255, ..color };
    }

    /// Sets the background color and rebuilds the gray ramp around it so
    /// darker/lighter shades of the background stay consistent.
    pub fn set_background(&mut self, color: Rgba) {
        let ramp = |bg: u8, step: usize| -> u8 {
            let bg = bg as usize;
            if step <= BACKGROUND_STEP {
                (bg * step / BACKGROUND_STEP) as u8
            } else {
                let top = GRAY_RAMP_LEN - 1 - BACKGROUND_STEP;
                (bg + (255 - bg) * (step - BACKGROUND_STEP) / top) as u8
            }
        };
        let start = PaletteIndex::GRAY_RAMP.0 as usize;
        for step in 0..GRAY_RAMP_LEN {
            self.entries[start + step] =
                Rgba::rgb(ramp(color.r, step), ramp(color.g, step), ramp(color.b, step));
        }
    }

    /// Resolves any color to explicit channels.
    pub fn resolve(&self, color: Color) -> Rgba {
        match color {
            Color::Rgba(c) => c,
            Color::Index(i) => self.get(i),
        }
    }

    /// Blends `a` over `b`: `weight` 1.0 yields `a`, 0.0 yields `b`.
    pub fn average(&self, a: Color, b: Color, weight: f32) -> Color {
        let a = self.resolve(a);
        let b = self.resolve(b);
        let weight = weight.clamp(0.0, 1.0);
        let mix = |x: u8, y: u8| (x as f32 * weight + y as f32 * (1.0 - weight)) as u8;
        Color::rgba(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b), mix(a.a, b.a))
    }

    pub fn darker(&self, c: Color) -> Color {
        self.average(c, Color::BLACK, 0.67)
    }

    pub fn lighter(&self, c: Color) -> Color {
        self.average(c, Color::WHITE, 0.67)
    }

    /// The washed-out variant used for deactivated widgets.
    pub fn inactive(&self, c: Color) -> Color {
        self.average(c, Color::BACKGROUND, 0.33)
    }

    /// Returns `fg` when it stands out against `bg`, otherwise black or
    /// white, whichever contrasts more.
    pub fn contrast(&self, fg: Color, bg: Color) -> Color {
        let l1 = self.resolve(fg).luminance() as i32;
        let l2 = self.resolve(bg).luminance() as i32;
        if (l1 - l2).abs() > 99 {
            fg
        } else if l2 > 127 {
            Color::BLACK
        } else {
            Color::WHITE
        }
    }
}
