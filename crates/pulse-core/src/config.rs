use serde::{Deserialize, Serialize};

use crate::error::{PulseError, PulseResult};
use crate::Color;

/// How frame indices map to asset URLs: `prefix`, then the frame number
/// zero-padded to `pad_width`, then `extension`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetPathTemplate {
    pub prefix: String,
    pub pad_width: usize,
    pub extension: String,
    /// Number printed for frame index 0.
    pub first_number: usize,
}

impl AssetPathTemplate {
    pub fn path_for(&self, index: usize) -> String {
        format!(
            "{}{:0width$}{}",
            self.prefix,
            index + self.first_number,
            self.extension,
            width = self.pad_width
        )
    }
}

impl Default for AssetPathTemplate {
    fn default() -> Self {
        Self {
            prefix: "Gif-Images/Gif_".to_string(),
            pad_width: 3,
            extension: ".jpg".to_string(),
            first_number: 0,
        }
    }
}

/// Low-opacity wash painted under each frame.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TrailConfig {
    pub color: String, // "#RRGGBB" | "#RRGGBBAA"
    pub alpha: f32,
}

impl TrailConfig {
    pub fn color(&self) -> PulseResult<Color> {
        Color::from_hex(&self.color).map_err(|e| PulseError::config(format!("trail.color: {}", e)))
    }
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            color: "#050505".to_string(),
            alpha: 0.15,
        }
    }
}

/// Tunables of the hero image-sequence player.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Element id of the hero canvas.
    pub canvas_id: String,
    /// Number of frames in the sequence (N).
    pub frame_count: usize,
    /// Logical updates per second, independent of the display refresh rate.
    pub target_fps: f64,
    /// Fraction of a frame the position moves per accepted tick.
    pub step: f64,
    /// Cross-fade the next frame over the base frame.
    pub blend: bool,
    /// Fractional progress below which no blend layer is drawn.
    pub blend_epsilon: f64,
    /// Batch split points; `[30, 80]` loads `[0,30)`, `[30,80)`, `[80,N)`.
    pub batch_boundaries: Vec<usize>,
    /// Pause between a batch resolving and the next one starting.
    pub batch_delay_ms: f64,
    /// Resolved frames needed before playback starts.
    pub ready_threshold: usize,
    pub assets: AssetPathTemplate,
    pub trail: TrailConfig,
}

impl PlayerConfig {
    /// 60 updates/s, quarter-frame steps, cross-fade blending.
    pub fn smooth() -> Self {
        Self::default()
    }

    /// The earlier hero: 18 updates/s, one whole frame per tick, no blending.
    pub fn classic() -> Self {
        Self {
            target_fps: 18.0,
            step: 1.0,
            blend: false,
            ..Self::default()
        }
    }

    /// Index of the last frame (N-1).
    pub fn last_index(&self) -> usize {
        self.frame_count.saturating_sub(1)
    }

    pub fn validate(&self) -> PulseResult<()> {
        if self.canvas_id.trim().is_empty() {
            return Err(PulseError::config("canvas_id must not be empty"));
        }
        if self.frame_count == 0 {
            return Err(PulseError::config("frame_count must be at least 1"));
        }
        if !(self.target_fps.is_finite() && self.target_fps > 0.0) {
            return Err(PulseError::config("target_fps must be a positive number"));
        }
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(PulseError::config("step must be a positive number"));
        }
        if !(0.0..1.0).contains(&self.blend_epsilon) {
            return Err(PulseError::config("blend_epsilon must be in [0, 1)"));
        }
        if self.batch_boundaries.windows(2).any(|w| w[0] >= w[1]) {
            return Err(PulseError::config(
                "batch_boundaries must be strictly increasing",
            ));
        }
        if self.batch_boundaries.first() == Some(&0) {
            return Err(PulseError::config("batch_boundaries must not contain 0"));
        }
        if !(self.batch_delay_ms.is_finite() && self.batch_delay_ms >= 0.0) {
            return Err(PulseError::config("batch_delay_ms must be non-negative"));
        }
        if self.ready_threshold == 0 {
            return Err(PulseError::config("ready_threshold must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.trail.alpha) {
            return Err(PulseError::config("trail.alpha must be in [0, 1]"));
        }
        self.trail.color()?;
        Ok(())
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            canvas_id: "hero-canvas".to_string(),
            frame_count: 140,
            target_fps: 60.0,
            step: 0.25,
            blend: true,
            blend_epsilon: 0.02,
            batch_boundaries: vec![30, 80],
            batch_delay_ms: 300.0,
            ready_threshold: 30,
            assets: AssetPathTemplate::default(),
            trail: TrailConfig::default(),
        }
    }
}

/// Element ids and tunables of the landing page's promo widgets.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PromoConfig {
    pub countdown_minutes: u32,
    pub deadline_storage_key: String,
    pub countdown_ids: [String; 3], // hours, minutes, seconds
    pub stock_min: u32,
    pub stock_max: u32,
    pub stock_ids: Vec<String>,
    pub sticky_cta_id: String,
    pub sticky_threshold_px: f64,
    /// Links that scroll smoothly to their in-page target.
    pub anchor_selector: String,
    /// Elements that fade up the first time they scroll into view.
    pub reveal_selectors: Vec<String>,
    /// Visible fraction of an element that triggers its reveal.
    pub reveal_threshold: f64,
    pub reveal_class: String,
    pub visible_class: String,
}

impl Default for PromoConfig {
    fn default() -> Self {
        Self {
            countdown_minutes: 2 * 60 + 30,
            deadline_storage_key: "pulse_deadline".to_string(),
            countdown_ids: [
                "c-hours".to_string(),
                "c-minutes".to_string(),
                "c-seconds".to_string(),
            ],
            stock_min: 5,
            stock_max: 9,
            stock_ids: vec!["stock-count".to_string(), "stock-count-2".to_string()],
            sticky_cta_id: "sticky-cta".to_string(),
            sticky_threshold_px: 600.0,
            anchor_selector: "a[href^=\"#\"]".to_string(),
            reveal_selectors: [
                ".feature-card",
                ".pain__card",
                ".testimonial-card",
                ".anchor-card",
                ".faq__item",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            reveal_threshold: 0.1,
            reveal_class: "anim-fadeup".to_string(),
            visible_class: "visible".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct PulseConfig {
    #[serde(default)]
    pub hero: PlayerConfig,
    #[serde(default)]
    pub promo: PromoConfig,
}

impl PulseConfig {
    pub fn from_toml_str(contents: &str) -> PulseResult<Self> {
        let config: PulseConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(contents: &str) -> PulseResult<Self> {
        let config: PulseConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &std::path::Path) -> PulseResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> PulseResult<()> {
        self.hero.validate()?;
        if self.promo.stock_min > self.promo.stock_max {
            return Err(PulseError::config("promo.stock_min exceeds promo.stock_max"));
        }
        if !(0.0..=1.0).contains(&self.promo.reveal_threshold) {
            return Err(PulseError::config("promo.reveal_threshold must be in [0, 1]"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_path_zero_padded() {
        let t = AssetPathTemplate::default();
        assert_eq!(t.path_for(0), "Gif-Images/Gif_000.jpg");
        assert_eq!(t.path_for(7), "Gif-Images/Gif_007.jpg");
        assert_eq!(t.path_for(139), "Gif-Images/Gif_139.jpg");
    }

    #[test]
    fn test_asset_path_first_number_and_width() {
        let t = AssetPathTemplate {
            prefix: "frames/f".into(),
            pad_width: 4,
            extension: ".webp".into(),
            first_number: 1,
        };
        assert_eq!(t.path_for(0), "frames/f0001.webp");
    }

    #[test]
    fn test_defaults_validate() {
        PlayerConfig::smooth().validate().unwrap();
        PlayerConfig::classic().validate().unwrap();
        assert_eq!(PlayerConfig::default().last_index(), 139);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            PlayerConfig { frame_count: 0, ..Default::default() },
            PlayerConfig { step: 0.0, ..Default::default() },
            PlayerConfig { target_fps: f64::NAN, ..Default::default() },
            PlayerConfig { blend_epsilon: 1.0, ..Default::default() },
            PlayerConfig { batch_boundaries: vec![80, 30], ..Default::default() },
            PlayerConfig { batch_boundaries: vec![0, 30], ..Default::default() },
            PlayerConfig { ready_threshold: 0, ..Default::default() },
            PlayerConfig {
                trail: TrailConfig { color: "#zz".into(), alpha: 0.15 },
                ..Default::default()
            },
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(PulseError::InvalidConfig(_))),
                "{:?} should be rejected",
                config
            );
        }
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PulseConfig::from_toml_str(
            r#"
            [hero]
            frame_count = 60
            target_fps = 18.0

            [hero.assets]
            prefix = "hero/"
            "#,
        )
        .unwrap();
        assert_eq!(config.hero.frame_count, 60);
        assert_eq!(config.hero.step, 0.25);
        assert_eq!(config.hero.assets.path_for(3), "hero/003.jpg");
        assert_eq!(config.promo.sticky_threshold_px, 600.0);
    }

    #[test]
    fn test_promo_reveal_defaults_and_bounds() {
        let promo = PromoConfig::default();
        assert_eq!(promo.anchor_selector, "a[href^=\"#\"]");
        assert_eq!(promo.reveal_selectors.len(), 5);
        assert_eq!(promo.reveal_threshold, 0.1);

        let config = PulseConfig {
            promo: PromoConfig {
                reveal_threshold: 1.5,
                ..PromoConfig::default()
            },
            ..PulseConfig::default()
        };
        assert!(matches!(config.validate(), Err(PulseError::InvalidConfig(_))));
    }

    #[test]
    fn test_json_config() {
        let config = PulseConfig::from_json_str(r#"{"hero": {"blend": false}}"#).unwrap();
        assert!(!config.hero.blend);
        assert!(PulseConfig::from_json_str(r#"{"hero": {"step": -1}}"#).is_err());
    }
}
