use crate::draw::{Color, Palette, PaletteIndex, Rgba};

/// Base colors applied to the palette in one go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorScheme {
    pub name: String,
    pub background: Rgba,
    pub background2: Rgba,
    pub foreground: Rgba,
    pub selection: Color,
}

impl ColorScheme {
    pub fn new(
        name: &str,
        background: Rgba,
        background2: Rgba,
        foreground: Rgba,
        selection: Color,
    ) -> Self {
        Self {
            name: name.to_string(),
            background,
            background2,
            foreground,
            selection,
        }
    }

    /// Writes the scheme into `palette`. The background also rebuilds the
    /// gray ramp.
    pub fn apply(&self, palette: &mut Palette) {
        let selection = palette.resolve(self.selection);
        palette.set_background(self.background);
        palette.set(PaletteIndex::BACKGROUND2, self.background2);
        palette.set(PaletteIndex::FOREGROUND, self.foreground);
        palette.set(PaletteIndex::SELECTION, selection);
    }
}

const fn gray(v: u8) -> Rgba {
    Rgba::rgb(v, v, v)
}

const ORANGE: Color = Color::rgb(0xf0, 0xad, 0x3f);

pub(super) fn builtin() -> Vec<ColorScheme> {
    vec![
        ColorScheme::new("Black", gray(4), gray(20), gray(240), Color::YELLOW),
        ColorScheme::new("Darker", gray(20), gray(100), gray(240), Color::YELLOW),
        ColorScheme::new("Dark", gray(50), gray(100), gray(255), Color::YELLOW),
        ColorScheme::new("Gray", gray(100), gray(127), gray(255), Color::YELLOW),
        ColorScheme::new("Washed out", gray(135), gray(203), gray(1), ORANGE),
        ColorScheme::new(
            "Beige",
            Rgba::rgb(0xb7, 0xb5, 0x9e),
            Rgba::rgb(0x91, 0x8f, 0x7c),
            Rgba::rgb(0x18, 0x17, 0x13),
            Color::rgb(0xeb, 0x7b, 0x19),
        ),
        ColorScheme::new("Muted", gray(195), gray(220), gray(1), ORANGE),
        ColorScheme::new("Light", gray(220), gray(192), gray(1), Color::BLUE),
    ]
}
