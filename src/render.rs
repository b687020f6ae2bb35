//! Turns a tree matrix into positioned, colored glyphs for one frame.

use crate::config::{GlyphSet, Rgb};
use crate::palette::ColorMapper;
use crate::shape::TreeMatrix;
use rand::prelude::*;

/// Glyph extents as reported by the drawing surface
pub trait GlyphMetrics {
    fn measure_glyph(&self, ch: char) -> (usize, usize);
}

/// Distance between neighbouring cells on the surface
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphStep {
    pub x: usize,
    pub y: usize,
}

impl GlyphStep {
    pub const UNIT: Self = Self { x: 1, y: 1 };

    /// Largest extent over every glyph the tree can contain, at least 1x1
    pub fn measure<M: GlyphMetrics + ?Sized>(metrics: &M, glyphs: &GlyphSet) -> Self {
        glyphs.all_glyphs().fold(Self::UNIT, |step, ch| {
            let (w, h) = metrics.measure_glyph(ch);
            Self {
                x: step.x.max(w),
                y: step.y.max(h),
            }
        })
    }
}

/// One glyph to draw, top-left anchored
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawCommand {
    pub ch: char,
    pub color: Rgb,
    pub x: usize,
    pub y: usize,
}

/// Draw commands for every cell, padding included, so the grid stays aligned
pub fn render(
    matrix: &TreeMatrix,
    step: GlyphStep,
    mapper: &ColorMapper,
    rng: &mut StdRng,
) -> Vec<DrawCommand> {
    matrix
        .cells()
        .map(|(row, col, ch)| DrawCommand {
            ch,
            color: mapper.color_of(ch, rng),
            x: col * step.x,
            y: row * step.y,
        })
        .collect()
}

/// Owns the tree for the lifetime of the animation; only colors change between frames
pub struct Renderer {
    matrix: TreeMatrix,
    mapper: ColorMapper,
    step: GlyphStep,
}

impl Renderer {
    pub fn new(matrix: TreeMatrix, mapper: ColorMapper, step: GlyphStep) -> Self {
        Self {
            matrix,
            mapper,
            step,
        }
    }

    pub fn matrix(&self) -> &TreeMatrix {
        &self.matrix
    }

    /// Surface size needed to show the whole tree
    pub fn bounds(&self) -> (usize, usize) {
        (
            self.matrix.width() * self.step.x,
            self.matrix.row_count() * self.step.y,
        )
    }

    pub fn frame(&self, rng: &mut StdRng) -> Vec<DrawCommand> {
        render(&self.matrix, self.step, &self.mapper, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColorScheme;
    use crate::shape::{generate, ShapeParams};

    struct FixedMetrics(usize, usize);

    impl GlyphMetrics for FixedMetrics {
        fn measure_glyph(&self, ch: char) -> (usize, usize) {
            if ch == ' ' {
                (0, 0)
            } else {
                (self.0, self.1)
            }
        }
    }

    fn renderer(step: GlyphStep, seed: u64) -> Renderer {
        let glyphs = GlyphSet::default();
        let params = ShapeParams::new(8, 4, 2).unwrap();
        let matrix = generate(&params, &glyphs, &mut StdRng::seed_from_u64(seed));
        let mapper = ColorMapper::new(glyphs, ColorScheme::default()).unwrap();
        Renderer::new(matrix, mapper, step)
    }

    #[test]
    fn one_command_per_cell_at_grid_position() {
        let r = renderer(GlyphStep { x: 13, y: 17 }, 1);
        let mut rng = StdRng::seed_from_u64(2);
        let frame = r.frame(&mut rng);
        assert_eq!(frame.len(), 17 * 12);

        for (cmd, (row, col, ch)) in frame.iter().zip(r.matrix().cells()) {
            assert_eq!(cmd.ch, ch);
            assert_eq!(cmd.x, col * 13);
            assert_eq!(cmd.y, row * 17);
        }
    }

    #[test]
    fn padding_is_positioned_and_white() {
        let r = renderer(GlyphStep::UNIT, 1);
        let frame = r.frame(&mut StdRng::seed_from_u64(0));
        let first = frame[0];
        assert_eq!(first.ch, ' ');
        assert_eq!((first.x, first.y), (0, 0));
        assert_eq!(first.color, Rgb::new(255, 255, 255));
    }

    #[test]
    fn bounds_scale_with_step() {
        assert_eq!(renderer(GlyphStep::UNIT, 0).bounds(), (17, 12));
        assert_eq!(renderer(GlyphStep { x: 13, y: 17 }, 0).bounds(), (17 * 13, 12 * 17));
    }

    #[test]
    fn rerender_keeps_positions_and_varies_lights() {
        // Tall enough that the body holds plenty of lights
        let glyphs = GlyphSet::default();
        let params = ShapeParams::new(20, 4, 0).unwrap();
        let matrix = generate(&params, &glyphs, &mut StdRng::seed_from_u64(8));
        let mapper = ColorMapper::new(glyphs, ColorScheme::default()).unwrap();
        let r = Renderer::new(matrix, mapper, GlyphStep::UNIT);

        let mut rng = StdRng::seed_from_u64(4);
        let a = r.frame(&mut rng);
        let b = r.frame(&mut rng);

        assert_eq!(a.len(), b.len());
        let mut changed = 0;
        for (x, y) in a.iter().zip(&b) {
            assert_eq!((x.ch, x.x, x.y), (y.ch, y.x, y.y));
            if x.ch == '#' || x.ch == '+' || x.ch == 'H' || x.ch == ' ' {
                assert_eq!(x.color, y.color);
            } else if x.color != y.color {
                changed += 1;
            }
        }
        assert!(changed > 0);
    }

    #[test]
    fn step_is_the_widest_glyph() {
        let step = GlyphStep::measure(&FixedMetrics(9, 22), &GlyphSet::default());
        assert_eq!(step, GlyphStep { x: 9, y: 22 });

        let step = GlyphStep::measure(&FixedMetrics(0, 0), &GlyphSet::default());
        assert_eq!(step, GlyphStep::UNIT);
    }
}
