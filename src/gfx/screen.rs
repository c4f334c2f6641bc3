/// The screen: one root surface plus a presentation backend.
///
/// All drawing lands in the indexed surface; the backend only decides
/// what the display sink receives at `present()`:
///
///   Native:    the completed indexed frame and the palette.
///   Emulated:  an RGBA translation of the completed frame, built in a
///              shadow buffer owned by the screen.
///
/// The sink never draws and never sees a partial frame; the surface is
/// engine-owned memory the sink cannot write into. Index buffers are
/// byte-identical across backends for identical draw sequences.

use std::io;

use crate::config::BackendKind;

use super::palette::Palette;
use super::surface::Surface;

/// Receives one completed frame per cycle.
pub trait DisplaySink {
    fn present_indexed(&mut self, surface: &Surface, palette: &Palette) -> io::Result<()>;
    fn present_rgba(&mut self, width: u32, height: u32, rgba: &[u8]) -> io::Result<()>;
}

enum Backend {
    Native,
    Emulated { rgba: Vec<u8> },
}

pub struct Screen {
    surface: Surface,
    palette: Palette,
    backend: Backend,
    sink: Box<dyn DisplaySink>,
}

impl Screen {
    pub fn new(kind: BackendKind, width: u32, height: u32, sink: Box<dyn DisplaySink>) -> Screen {
        let backend = match kind {
            BackendKind::Native => Backend::Native,
            BackendKind::Emulated => Backend::Emulated {
                rgba: vec![0; (width * height * 4) as usize],
            },
        };
        Screen {
            surface: Surface::new(width, height),
            palette: Palette::default_game(),
            backend,
            sink,
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Hand the completed frame to the sink. Called exactly once per cycle.
    pub fn present(&mut self) -> io::Result<()> {
        match &mut self.backend {
            Backend::Native => self.sink.present_indexed(&self.surface, &self.palette),
            Backend::Emulated { rgba } => {
                for (i, &idx) in self.surface.pixels().iter().enumerate() {
                    let [r, g, b] = self.palette.rgb(idx);
                    rgba[i * 4] = r;
                    rgba[i * 4 + 1] = g;
                    rgba[i * 4 + 2] = b;
                    rgba[i * 4 + 3] = 255;
                }
                self.sink
                    .present_rgba(self.surface.width(), self.surface.height(), rgba)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::primitives::{draw_circle, draw_text, thin_line};
    use crate::gfx::surface::{blit, Rect};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records whatever the screen hands over, normalized to RGBA.
    #[derive(Default)]
    struct Captured {
        frames: u32,
        rgba: Vec<u8>,
    }

    struct CaptureSink(Rc<RefCell<Captured>>);

    impl DisplaySink for CaptureSink {
        fn present_indexed(&mut self, surface: &Surface, palette: &Palette) -> io::Result<()> {
            let mut cap = self.0.borrow_mut();
            cap.frames += 1;
            cap.rgba = surface
                .pixels()
                .iter()
                .flat_map(|&i| {
                    let [r, g, b] = palette.rgb(i);
                    [r, g, b, 255]
                })
                .collect();
            Ok(())
        }

        fn present_rgba(&mut self, _w: u32, _h: u32, rgba: &[u8]) -> io::Result<()> {
            let mut cap = self.0.borrow_mut();
            cap.frames += 1;
            cap.rgba = rgba.to_vec();
            Ok(())
        }
    }

    fn draw_scene(screen: &mut Screen) {
        let s = screen.surface_mut();
        s.fill(None, 3);
        s.fill(Some(Rect::new(5, 5, 20, 10)), 40);
        draw_circle(s, 32, 32, 10, 100);
        thin_line(s, 0, 0, 63, 63, 7);
        draw_text(s, 2, 50, "SYNC", 1);

        let mut sprite = Surface::new(6, 6);
        sprite.fill(None, 0);
        sprite.fill(Some(Rect::new(1, 1, 4, 4)), 77);
        sprite.set_color_key(0);
        blit(&sprite, None, s, 30, 8);
    }

    #[test]
    fn backends_hold_identical_index_buffers() {
        let cap_n = Rc::new(RefCell::new(Captured::default()));
        let cap_e = Rc::new(RefCell::new(Captured::default()));
        let mut native = Screen::new(
            BackendKind::Native,
            64,
            64,
            Box::new(CaptureSink(cap_n.clone())),
        );
        let mut emulated = Screen::new(
            BackendKind::Emulated,
            64,
            64,
            Box::new(CaptureSink(cap_e.clone())),
        );

        draw_scene(&mut native);
        draw_scene(&mut emulated);
        assert_eq!(native.surface().pixels(), emulated.surface().pixels());

        native.present().unwrap();
        emulated.present().unwrap();

        // The sink-visible frames agree too: the emulated RGBA handoff is
        // exactly the palette mapping of the shared index buffer.
        assert_eq!(cap_n.borrow().rgba, cap_e.borrow().rgba);
        assert_eq!(cap_n.borrow().frames, 1);
        assert_eq!(cap_e.borrow().frames, 1);
    }

    #[test]
    fn emulated_translation_matches_palette() {
        let cap = Rc::new(RefCell::new(Captured::default()));
        let mut screen = Screen::new(
            BackendKind::Emulated,
            8,
            4,
            Box::new(CaptureSink(cap.clone())),
        );
        screen.surface_mut().fill(None, 42);
        screen.present().unwrap();

        let expected = screen.palette().rgb(42);
        let cap = cap.borrow();
        assert_eq!(cap.rgba.len(), 8 * 4 * 4);
        for px in cap.rgba.chunks(4) {
            assert_eq!(&px[..3], &expected);
            assert_eq!(px[3], 255);
        }
    }
}
