/// Indexed-color surfaces: the unit of all drawing.
///
/// A surface is an owned rectangle of 8-bit palette indices. Every
/// primitive and every blit writes indices; translation to real colors
/// happens only at screen presentation. Fill and blit behave identically
/// no matter which screen backend eventually presents the buffer.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: u32, h: u32) -> Rect {
        Rect { x, y, w, h }
    }
}

#[derive(Clone)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    color_key: Option<u8>,
}

impl Surface {
    /// Allocate a surface filled with index 0. Zero dimensions are a
    /// programming error.
    pub fn new(width: u32, height: u32) -> Surface {
        assert!(width > 0 && height > 0, "zero-sized surface {}x{}", width, height);
        Surface {
            width,
            height,
            pixels: vec![0; (width * height) as usize],
            color_key: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Mark one palette index as transparent for blits out of this surface.
    pub fn set_color_key(&mut self, key: u8) {
        self.color_key = Some(key);
    }

    #[allow(dead_code)]
    pub fn color_key(&self) -> Option<u8> {
        self.color_key
    }

    /// Read one pixel. Reading outside the surface is a programming error.
    #[allow(dead_code)]
    pub fn pixel(&self, x: i32, y: i32) -> u8 {
        assert!(
            x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height,
            "pixel read outside {}x{} surface: ({}, {})",
            self.width,
            self.height,
            x,
            y
        );
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Write one pixel, silently clipped at the surface edge.
    #[inline]
    pub fn put(&mut self, x: i32, y: i32, c: u8) {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            self.pixels[y as usize * self.width as usize + x as usize] = c;
        }
    }

    /// Fill a rectangle (or the whole surface) with one index.
    /// The rectangle is clipped to the surface.
    pub fn fill(&mut self, rect: Option<Rect>, c: u8) {
        let rect = match rect {
            Some(r) => r,
            None => {
                self.pixels.fill(c);
                return;
            }
        };

        let x0 = rect.x.max(0);
        let y0 = rect.y.max(0);
        let x1 = (rect.x + rect.w as i32).min(self.width as i32);
        let y1 = (rect.y + rect.h as i32).min(self.height as i32);
        for y in y0..y1 {
            let row = y as usize * self.width as usize;
            self.pixels[row + x0 as usize..row + x1 as usize].fill(c);
        }
    }
}

/// Copy indexed pixels from `src` into `dst` with the destination's
/// top-left at (dx, dy). Pixels equal to the source color key are
/// skipped. The destination clips; a source rectangle that leaves the
/// source surface is a programming error.
pub fn blit(src: &Surface, src_rect: Option<Rect>, dst: &mut Surface, dx: i32, dy: i32) {
    let sr = src_rect.unwrap_or(Rect::new(0, 0, src.width, src.height));
    assert!(
        sr.x >= 0
            && sr.y >= 0
            && sr.x as u32 + sr.w <= src.width
            && sr.y as u32 + sr.h <= src.height,
        "blit source rect {:?} outside {}x{} surface",
        sr,
        src.width,
        src.height
    );

    let key = src.color_key;
    for row in 0..sr.h as i32 {
        let ty = dy + row;
        if ty < 0 || ty as u32 >= dst.height {
            continue;
        }
        for col in 0..sr.w as i32 {
            let tx = dx + col;
            if tx < 0 || tx as u32 >= dst.width {
                continue;
            }
            let c = src.pixels[(sr.y + row) as usize * src.width as usize + (sr.x + col) as usize];
            if Some(c) == key {
                continue;
            }
            dst.pixels[ty as usize * dst.width as usize + tx as usize] = c;
        }
    }
}
