//! Landing page widgets around the hero: session countdown, stock scarcity
//! text, the sticky call-to-action, smooth in-page anchors and fade-up
//! reveals.

use std::cell::Cell;
use std::rc::Rc;

use pulse_core::promo::{anchor_target, stock_label, stock_units, Countdown, StickyCta};
use pulse_core::{Duration, PromoConfig, Timestamp};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

/// Mount every widget whose elements exist; missing elements are skipped.
pub fn mount(window: &Window, document: &Document, config: &PromoConfig) -> Result<(), JsValue> {
    mount_countdown(window, document, config)?;
    fill_stock(document, config);
    mount_sticky_cta(window, document, config)?;
    mount_smooth_scroll(document, config)?;
    mount_reveal(document, config)?;
    Ok(())
}

fn now() -> Timestamp {
    Timestamp::from_millis(js_sys::Date::now())
}

/// Resume or start the session deadline and update the display once a
/// second until it reaches zero.
pub fn mount_countdown(
    window: &Window,
    document: &Document,
    config: &PromoConfig,
) -> Result<(), JsValue> {
    let storage = window.session_storage().ok().flatten();
    let stored = storage
        .as_ref()
        .and_then(|s| s.get_item(&config.deadline_storage_key).ok().flatten());
    let length = Duration::from_seconds(config.countdown_minutes as f64 * 60.0);
    let (countdown, fresh) = Countdown::resume_or_start(stored.as_deref(), now(), length);
    if let (Some(storage), Some(value)) = (storage.as_ref(), fresh) {
        storage.set_item(&config.deadline_storage_key, &value)?;
    }

    let fields: Vec<Element> = config
        .countdown_ids
        .iter()
        .filter_map(|id| document.get_element_by_id(id))
        .collect();
    if fields.len() != config.countdown_ids.len() {
        tracing::debug!("countdown elements missing");
        return Ok(());
    }
    if !show_remaining(&countdown, &fields) {
        return Ok(());
    }

    let interval = Rc::new(Cell::new(None::<i32>));
    let handle = Rc::clone(&interval);
    let win = window.clone();
    let callback = Closure::<dyn FnMut()>::new(move || {
        if !show_remaining(&countdown, &fields) {
            if let Some(id) = handle.take() {
                win.clear_interval_with_handle(id);
            }
        }
    });
    let id = window.set_interval_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        1000,
    )?;
    interval.set(Some(id));
    callback.forget();
    Ok(())
}

/// Returns `false` once the countdown has expired.
fn show_remaining(countdown: &Countdown, fields: &[Element]) -> bool {
    let remaining = countdown.remaining(now());
    for (field, text) in fields.iter().zip(remaining.padded()) {
        field.set_text_content(Some(&text));
    }
    !remaining.is_expired()
}

/// Write one random unit count into every stock element.
pub fn fill_stock(document: &Document, config: &PromoConfig) -> u32 {
    let units = stock_units(js_sys::Math::random(), config.stock_min, config.stock_max);
    let label = stock_label(units);
    for id in &config.stock_ids {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(&label));
        }
    }
    units
}

pub fn mount_sticky_cta(
    window: &Window,
    document: &Document,
    config: &PromoConfig,
) -> Result<(), JsValue> {
    let Some(cta) = document
        .get_element_by_id(&config.sticky_cta_id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    else {
        return Ok(());
    };
    let mut sticky = StickyCta::new(config.sticky_threshold_px);
    let win = window.clone();
    let callback = Closure::<dyn FnMut()>::new(move || {
        let scroll_y = win.scroll_y().unwrap_or(0.0);
        if sticky.on_scroll(scroll_y) {
            if let Err(e) = cta.style().set_property("display", "block") {
                tracing::warn!("could not show sticky CTA: {:?}", e);
            }
        }
    });
    window.add_event_listener_with_callback("scroll", callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

/// Make every matching in-page link scroll smoothly to its target instead
/// of jumping. Returns the number of links wired.
pub fn mount_smooth_scroll(document: &Document, config: &PromoConfig) -> Result<u32, JsValue> {
    let links = document.query_selector_all(&config.anchor_selector)?;
    let mut wired = 0;
    for i in 0..links.length() {
        let Some(link) = links.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        let doc = document.clone();
        let source = link.clone();
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(href) = source.get_attribute("href") else {
                return;
            };
            let Some(selector) = anchor_target(&href) else {
                return;
            };
            event.prevent_default();
            if let Ok(Some(target)) = doc.query_selector(selector) {
                let options = ScrollIntoViewOptions::new();
                options.set_behavior(ScrollBehavior::Smooth);
                options.set_block(ScrollLogicalPosition::Start);
                target.scroll_into_view_with_scroll_into_view_options(&options);
            }
        });
        link.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref())?;
        callback.forget();
        wired += 1;
    }
    Ok(wired)
}

/// Tag matching elements with the reveal class and add the visible class
/// the first time each crosses the threshold; each is then unobserved.
/// Returns the number of elements observed.
pub fn mount_reveal(document: &Document, config: &PromoConfig) -> Result<u32, JsValue> {
    if config.reveal_selectors.is_empty() {
        return Ok(0);
    }
    let visible = config.visible_class.clone();
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                if let Err(e) = target.class_list().add_1(&visible) {
                    tracing::warn!("could not reveal element: {:?}", e);
                }
                observer.unobserve(&target);
            }
        },
    );
    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(config.reveal_threshold));
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    callback.forget();

    let nodes = document.query_selector_all(&config.reveal_selectors.join(", "))?;
    let mut observed = 0;
    for i in 0..nodes.length() {
        let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        el.class_list().add_1(&config.reveal_class)?;
        observer.observe(&el);
        observed += 1;
    }
    Ok(observed)
}
