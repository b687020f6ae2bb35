//! Procedural tree shape: a star cap, a banded triangular body and a stump.

use crate::config::GlyphSet;
use crate::error::TreeError;
use rand::prelude::*;

/// Structural parameters of the tree
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeParams {
    height: usize,
    segments: usize,
    indent: usize,
}

impl ShapeParams {
    pub fn new(height: usize, segments: usize, indent: usize) -> Result<Self, TreeError> {
        if height == 0 {
            return Err(TreeError::ZeroHeight);
        }
        if segments == 0 {
            return Err(TreeError::ZeroSegments);
        }
        Ok(Self {
            height,
            segments,
            indent,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn segments(&self) -> usize {
        self.segments
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Width of every row: the widest body row with no indent applied
    pub fn width(&self) -> usize {
        1 + 2 * self.height
    }

    /// Body rows per band. Zero when there are more segments than rows.
    pub fn band_size(&self) -> usize {
        self.height / self.segments
    }

    /// Band a body row belongs to; everything is band 0 when bands are empty
    pub fn band(&self, row: usize) -> usize {
        match self.band_size() {
            0 => 0,
            j => row / j,
        }
    }

    /// Number of glyphs on body row `row`, clamped at zero
    pub fn body_len(&self, row: usize) -> usize {
        let reduction = self.indent.saturating_mul(2).saturating_mul(self.band(row));
        (1 + 2 * row).saturating_sub(reduction)
    }

    /// Stump run length, always odd so it centers under the star
    pub fn stump_width(&self) -> usize {
        let w = self.height / 5;
        if w % 2 == 1 {
            w
        } else {
            w + 1
        }
    }

    pub fn stump_rows(&self) -> usize {
        self.height / 4
    }

    /// Star rows + body rows + stump rows
    pub fn row_count(&self) -> usize {
        2 + self.height + self.stump_rows()
    }
}

/// Generated tree: fixed-width rows of glyphs, top to bottom
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeMatrix {
    rows: Vec<String>,
    width: usize,
}

impl TreeMatrix {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Every cell as `(row, column, glyph)`, padding included
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, char)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| row.chars().enumerate().map(move |(c, ch)| (r, c, ch)))
    }
}

/// Build the tree matrix. Only glyph choice on body rows draws from `rng`.
pub fn generate(params: &ShapeParams, glyphs: &GlyphSet, rng: &mut StdRng) -> TreeMatrix {
    let width = params.width();
    let mut rows = Vec::with_capacity(params.row_count());

    // Star cap
    let star = glyphs.star();
    rows.push(center(&star.to_string(), 1, width));
    rows.push(center(&star.to_string().repeat(3), 3, width));

    // Body
    let alphabet = glyphs.fill_alphabet();
    for i in 0..params.height() {
        let n = params.body_len(i);
        let layer: String = (0..n)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect();
        rows.push(center(&layer, n, width));
    }

    // Stump
    let stump_width = params.stump_width();
    let stump = glyphs.stump().to_string().repeat(stump_width);
    for _ in 0..params.stump_rows() {
        rows.push(center(&stump, stump_width, width));
    }

    log::debug!(
        "generated tree {}x{} (height={} segments={} indent={})",
        width,
        rows.len(),
        params.height(),
        params.segments(),
        params.indent()
    );

    TreeMatrix { rows, width }
}

/// Pad `content` (`len` chars) to `width`; odd leftover space goes right
fn center(content: &str, len: usize, width: usize) -> String {
    let pad = width.saturating_sub(len);
    let left = pad / 2;
    format!("{}{}{}", " ".repeat(left), content, " ".repeat(pad - left))
}
