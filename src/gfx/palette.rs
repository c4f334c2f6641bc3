/// The fixed 256-entry palette behind every indexed surface.
///
/// Layout:
///   0          background / transparent-key candidate (black)
///   1..=15     fixed UI colors
///   16..=255   15 hue ramps of 16 shades each; shade 0 is darkest.
///
/// Fog dimming never picks a color: it subtracts shade steps inside a
/// ramp, so index arithmetic is the whole dimming pass.

pub const BG: u8 = 0;

pub const UI_WHITE: u8 = 1;
pub const UI_LIGHT: u8 = 2;
pub const UI_MID: u8 = 3;
pub const UI_DARK: u8 = 4;
pub const UI_RED: u8 = 5;
pub const UI_GREEN: u8 = 6;
#[allow(dead_code)]
pub const UI_BLUE: u8 = 7;
pub const UI_YELLOW: u8 = 8;
pub const UI_CYAN: u8 = 9;
pub const UI_MAGENTA: u8 = 10;
pub const UI_ORANGE: u8 = 11;

pub const RAMP_GRAY: u8 = 0;
pub const RAMP_RED: u8 = 1;
pub const RAMP_ORANGE: u8 = 2;
#[allow(dead_code)]
pub const RAMP_YELLOW: u8 = 3;
pub const RAMP_GREEN: u8 = 4;
#[allow(dead_code)]
pub const RAMP_TEAL: u8 = 5;
pub const RAMP_CYAN: u8 = 6;
pub const RAMP_AZURE: u8 = 7;
#[allow(dead_code)]
pub const RAMP_BLUE: u8 = 8;
pub const RAMP_VIOLET: u8 = 9;
pub const RAMP_MAGENTA: u8 = 10;
pub const RAMP_PINK: u8 = 11;
pub const RAMP_BROWN: u8 = 12;
#[allow(dead_code)]
pub const RAMP_OLIVE: u8 = 13;
pub const RAMP_SLATE: u8 = 14;

const RAMP_BASE: u8 = 16;
const RAMP_LEN: u8 = 16;

/// Index of `shade` (0 = darkest, 15 = brightest) within a hue ramp.
pub fn ramp(hue: u8, shade: u8) -> u8 {
    let hue = hue.min(14);
    RAMP_BASE + hue * RAMP_LEN + shade.min(RAMP_LEN - 1)
}

/// Darken an index by `steps` shades without leaving its ramp.
/// UI colors (below the ramp area) pass through unchanged.
pub fn dim(idx: u8, steps: u8) -> u8 {
    if idx < RAMP_BASE {
        return idx;
    }
    let shade = (idx - RAMP_BASE) % RAMP_LEN;
    idx - (shade - shade.saturating_sub(steps))
}

#[derive(Clone)]
pub struct Palette {
    colors: [[u8; 3]; 256],
}

impl Palette {
    /// The game palette: UI colors plus generated hue ramps.
    pub fn default_game() -> Palette {
        let mut colors = [[0u8; 3]; 256];

        colors[UI_WHITE as usize] = [255, 255, 255];
        colors[UI_LIGHT as usize] = [200, 200, 210];
        colors[UI_MID as usize] = [130, 130, 145];
        colors[UI_DARK as usize] = [60, 60, 72];
        colors[UI_RED as usize] = [220, 50, 50];
        colors[UI_GREEN as usize] = [60, 210, 80];
        colors[UI_BLUE as usize] = [70, 110, 230];
        colors[UI_YELLOW as usize] = [230, 210, 60];
        colors[UI_CYAN as usize] = [70, 210, 220];
        colors[UI_MAGENTA as usize] = [210, 70, 210];
        colors[UI_ORANGE as usize] = [230, 140, 50];

        // Full-brightness anchors for each hue ramp.
        let anchors: [[u8; 3]; 15] = [
            [235, 235, 240], // gray
            [240, 60, 60],   // red
            [240, 140, 50],  // orange
            [240, 220, 70],  // yellow
            [80, 220, 90],   // green
            [60, 200, 160],  // teal
            [80, 220, 230],  // cyan
            [80, 160, 240],  // azure
            [70, 90, 235],   // blue
            [140, 80, 235],  // violet
            [220, 80, 230],  // magenta
            [240, 120, 180], // pink
            [180, 120, 70],  // brown
            [160, 160, 70],  // olive
            [120, 130, 160], // slate
        ];

        for (hue, anchor) in anchors.iter().enumerate() {
            for shade in 0..RAMP_LEN {
                let idx = ramp(hue as u8, shade) as usize;
                let scale = (shade as u16 + 2) as u32;
                colors[idx] = [
                    (anchor[0] as u32 * scale / (RAMP_LEN as u32 + 1)) as u8,
                    (anchor[1] as u32 * scale / (RAMP_LEN as u32 + 1)) as u8,
                    (anchor[2] as u32 * scale / (RAMP_LEN as u32 + 1)) as u8,
                ];
            }
        }

        Palette { colors }
    }

    pub fn rgb(&self, idx: u8) -> [u8; 3] {
        self.colors[idx as usize]
    }
}
