//! Frame fetching through `HtmlImageElement`.

use std::rc::Weak;

use pulse_core::PulseError;
use pulse_player::{FrameFetcher, LoadedFrame};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlImageElement;

use crate::host::Hero;

/// Starts one image load per frame. Each load runs as a local task, so its
/// completion reaches the player after the requesting borrow is released.
pub struct ImageFetcher {
    hero: Weak<Hero>,
}

impl ImageFetcher {
    pub(crate) fn new(hero: Weak<Hero>) -> Self {
        Self { hero }
    }
}

impl FrameFetcher for ImageFetcher {
    type Image = HtmlImageElement;

    fn fetch(&mut self, index: usize, path: &str) {
        let hero = self.hero.clone();
        let path = path.to_string();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = load_image(&path)
                .await
                .map_err(|e| PulseError::fetch(index, path.as_str(), format!("{:?}", e)));
            if let Some(hero) = hero.upgrade() {
                hero.frame_loaded(index, outcome);
            }
        });
    }
}

/// Resolves once the image is fetched and decoded; rejects on a network or
/// decode error.
async fn load_image(path: &str) -> Result<LoadedFrame<HtmlImageElement>, JsValue> {
    let img = HtmlImageElement::new()?;
    img.set_src(path);
    JsFuture::from(img.decode()).await?;
    Ok(LoadedFrame {
        width: img.natural_width(),
        height: img.natural_height(),
        image: img,
    })
}
