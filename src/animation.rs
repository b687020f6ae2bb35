//! Fixed-rate redraw loop: the shape never changes, the lights re-roll every tick.

use crate::config::Rgb;
use crate::error::TreeError;
use crate::render::{GlyphMetrics, Renderer};
use rand::rngs::StdRng;
use std::io;
use std::time::{Duration, Instant};

/// Input the loop reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Cancel,
    Resize(u16, u16),
}

/// Non-blocking source of queued input events
pub trait InputSource {
    fn poll(&mut self) -> io::Result<Option<InputEvent>>;
}

/// Surface the frames are drawn to
pub trait Canvas: GlyphMetrics {
    /// Size the surface for a `width` x `height` picture, once before the first frame
    fn fit(&mut self, width: usize, height: usize) -> io::Result<()>;
    fn resize(&mut self, width: u16, height: u16);
    fn clear(&mut self, background: Rgb);
    fn draw_glyph(&mut self, ch: char, color: Rgb, x: usize, y: usize);
    fn present(&mut self) -> io::Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

pub struct AnimationLoop {
    renderer: Renderer,
    background: Rgb,
    interval: Duration,
    state: LoopState,
    frames: u64,
    started: Instant,
}

impl AnimationLoop {
    pub fn new(renderer: Renderer, background: Rgb, interval: Duration) -> Self {
        Self {
            renderer,
            background,
            interval,
            state: LoopState::Running,
            frames: 0,
            started: Instant::now(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Run until cancelled, returns the number of frames presented
    pub fn run<C, I>(&mut self, canvas: &mut C, input: &mut I, rng: &mut StdRng) -> Result<u64, TreeError>
    where
        C: Canvas,
        I: InputSource,
    {
        let (width, height) = self.renderer.bounds();
        canvas.fit(width, height)?;
        self.started = Instant::now();

        while self.state == LoopState::Running {
            let tick_start = Instant::now();
            if self.tick(canvas, input, rng)? == LoopState::Stopped {
                break;
            }
            let remaining = self.interval.saturating_sub(tick_start.elapsed());
            if !remaining.is_zero() {
                std::thread::sleep(remaining);
            }
        }

        log::info!(
            "stopped after {} frames in {:.1}s",
            self.frames,
            self.started.elapsed().as_secs_f32()
        );
        Ok(self.frames)
    }

    /// One iteration: drain input, then draw and present a frame unless cancelled
    pub fn tick<C, I>(&mut self, canvas: &mut C, input: &mut I, rng: &mut StdRng) -> Result<LoopState, TreeError>
    where
        C: Canvas,
        I: InputSource,
    {
        if self.state == LoopState::Stopped {
            return Ok(self.state);
        }

        while let Some(event) = input.poll()? {
            match event {
                InputEvent::Cancel => {
                    log::debug!("cancel requested");
                    self.state = LoopState::Stopped;
                    return Ok(self.state);
                }
                InputEvent::Resize(w, h) => {
                    log::debug!("surface resized to {w}x{h}");
                    canvas.resize(w, h);
                }
            }
        }

        draw_frame(&self.renderer, canvas, self.background, rng);
        canvas.present()?;
        self.frames += 1;
        log::trace!("frame {}", self.frames);

        Ok(self.state)
    }
}

/// Clear to `background` and submit one freshly colored frame, without presenting it
pub fn draw_frame<C: Canvas>(renderer: &Renderer, canvas: &mut C, background: Rgb, rng: &mut StdRng) {
    canvas.clear(background);
    for cmd in renderer.frame(rng) {
        canvas.draw_glyph(cmd.ch, cmd.color, cmd.x, cmd.y);
    }
}
