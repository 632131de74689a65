//! Browser event loop around [`HeroPlayer`]: animation frames drive ticks,
//! timeouts pace batches, and window resizes resize the canvas.

use std::cell::RefCell;
use std::rc::Rc;

use pulse_core::{Duration, PlayerConfig, PulseError, PulseResult, Timestamp};
use pulse_player::{HeroPlayer, LoadedFrame, PlayerSignal, Surface};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlImageElement, Window};

use crate::canvas::CanvasSurface;
use crate::fetch::ImageFetcher;
use crate::to_js;

pub struct Hero {
    window: Window,
    player: RefCell<HeroPlayer<CanvasSurface>>,
    fetcher: RefCell<ImageFetcher>,
    animation: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl Hero {
    /// Build the player on the configured canvas and request the first
    /// batch. Returns `Ok(None)` when the page has no usable canvas.
    pub fn mount(window: &Window, config: &PlayerConfig) -> Result<Option<Rc<Self>>, JsValue> {
        config.validate().map_err(to_js)?;
        let Some(document) = window.document() else {
            tracing::debug!("no document, hero disabled");
            return Ok(None);
        };
        let Some(mut surface) = CanvasSurface::find(&document, &config.canvas_id) else {
            tracing::debug!("canvas #{} not found, hero disabled", config.canvas_id);
            return Ok(None);
        };
        let (width, height) = viewport_size(window);
        surface.set_size(width, height);
        let player = HeroPlayer::new(config, surface).map_err(to_js)?;

        let hero = Rc::new_cyclic(|weak| Self {
            window: window.clone(),
            player: RefCell::new(player),
            fetcher: RefCell::new(ImageFetcher::new(weak.clone())),
            animation: RefCell::new(None),
        });
        hero.listen_for_resize()?;
        hero.boot().map_err(to_js)?;
        Ok(Some(hero))
    }

    fn boot(self: &Rc<Self>) -> PulseResult<()> {
        let signals = {
            let mut player = self.player.borrow_mut();
            let mut fetcher = self.fetcher.borrow_mut();
            player.boot(&mut *fetcher)?
        };
        self.handle_signals(signals);
        Ok(())
    }

    fn load_next_batch(self: &Rc<Self>) -> PulseResult<()> {
        let signals = {
            let mut player = self.player.borrow_mut();
            let mut fetcher = self.fetcher.borrow_mut();
            player.load_next_batch(&mut *fetcher)?
        };
        self.handle_signals(signals);
        Ok(())
    }

    pub(crate) fn frame_loaded(
        self: &Rc<Self>,
        index: usize,
        outcome: Result<LoadedFrame<HtmlImageElement>, PulseError>,
    ) {
        let signals = self.player.borrow_mut().on_frame_loaded(index, outcome);
        self.handle_signals(signals);
    }

    fn handle_signals(self: &Rc<Self>, signals: Vec<PlayerSignal>) {
        for signal in signals {
            match signal {
                PlayerSignal::StartPlayback => self.start_animation(),
                PlayerSignal::ScheduleNextBatch { delay } => self.schedule_next_batch(delay),
            }
        }
    }

    fn start_animation(self: &Rc<Self>) {
        if self.animation.borrow().is_some() {
            return;
        }
        let weak = Rc::downgrade(self);
        let callback = Closure::<dyn FnMut(f64)>::new(move |now: f64| {
            let Some(hero) = weak.upgrade() else {
                return;
            };
            hero.player.borrow_mut().tick(Timestamp::from_millis(now));
            hero.request_frame();
        });
        *self.animation.borrow_mut() = Some(callback);
        self.request_frame();
    }

    fn request_frame(&self) {
        let animation = self.animation.borrow();
        if let Some(callback) = animation.as_ref() {
            if let Err(e) = self
                .window
                .request_animation_frame(callback.as_ref().unchecked_ref())
            {
                tracing::warn!("requestAnimationFrame failed: {:?}", e);
            }
        }
    }

    fn schedule_next_batch(self: &Rc<Self>, delay: Duration) {
        let weak = Rc::downgrade(self);
        let callback = Closure::once_into_js(move || {
            if let Some(hero) = weak.upgrade() {
                if let Err(e) = hero.load_next_batch() {
                    tracing::warn!("next batch not started: {}", e);
                }
            }
        });
        if let Err(e) = self.window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            delay.as_millis().round() as i32,
        ) {
            tracing::warn!("setTimeout failed: {:?}", e);
        }
    }

    /// The resize listener lives as long as the page and owns the hero.
    fn listen_for_resize(self: &Rc<Self>) -> Result<(), JsValue> {
        let hero = Rc::clone(self);
        let callback = Closure::<dyn FnMut()>::new(move || hero.on_resize());
        self.window
            .add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref())?;
        callback.forget();
        Ok(())
    }

    fn on_resize(&self) {
        let (width, height) = viewport_size(&self.window);
        self.player.borrow_mut().resize(width, height);
    }

    pub fn with_player<R>(&self, f: impl FnOnce(&HeroPlayer<CanvasSurface>) -> R) -> R {
        f(&self.player.borrow())
    }
}

fn viewport_size(window: &Window) -> (u32, u32) {
    let dim = |v: Result<JsValue, JsValue>| {
        v.ok()
            .and_then(|v| v.as_f64())
            .map(|px| px.max(0.0) as u32)
            .unwrap_or(0)
    };
    (dim(window.inner_width()), dim(window.inner_height()))
}
