//! Reveal-on-scroll and pointer effects.
//!
//! [`EffectsProfile::Basic`] only fades elements in the first time they
//! intersect the viewport. [`EffectsProfile::Enhanced`] adds staggered reveal
//! delays, card tilt, hero parallax and button ripples.

use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::dom::{Dom, Selector};
use crate::error::{Error, Result};

/// Root-element attribute naming the page's [`EffectsProfile`].
pub const EFFECTS_ATTRIBUTE: &str = "data-effects";
pub const FADE_IN_CLASS: &str = "fade-in";
pub const RIPPLE_DURATION: Duration = Duration::from_millis(600);

const ANIM_DELAY_ATTRIBUTE: &str = "data-anim-delay";
/// Delay step used when an element carries no explicit delay.
const BATCH_STEP: f64 = 0.1;
const TILT_DAMPING: f64 = 20.0;
const PARALLAX_RATE: f64 = 0.3;
const RIPPLE_CLASS: &str = "ripple";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EffectsProfile {
    #[default]
    Basic,
    Enhanced,
}

impl EffectsProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Enhanced => "enhanced",
        }
    }

    pub fn is_enhanced(self) -> bool {
        self == Self::Enhanced
    }
}

impl FromStr for EffectsProfile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "basic" => Ok(Self::Basic),
            "enhanced" => Ok(Self::Enhanced),
            other => Err(Error::InvalidProfile(other.to_string())),
        }
    }
}

/// The profile the page asks for. Missing or unknown values mean
/// [`EffectsProfile::Basic`].
pub fn page_profile<D: Dom>(dom: &D) -> EffectsProfile {
    match dom.attribute(&dom.root(), EFFECTS_ATTRIBUTE) {
        Some(value) => value.parse().unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to basic effects");
            EffectsProfile::Basic
        }),
        None => EffectsProfile::Basic,
    }
}

/// Elements revealed on scroll, with their per-position stagger in seconds.
const REVEAL_GROUPS: &[(&str, f64)] = &[
    ("chapter-card", 0.08),
    ("about-card", 0.15),
    ("feature-item", 0.1),
];

/// Cards that tilt under the pointer.
pub fn tilt_targets() -> Selector {
    Selector::AnyOf(vec![
        Selector::Class("chapter-card"),
        Selector::Class("about-card"),
    ])
}

pub fn ripple_targets() -> Selector {
    Selector::Class("btn")
}

/// Collects the elements to observe for reveal. With the enhanced profile
/// each gets its group stagger and starts transparent.
pub fn prepare_reveal<D: Dom>(dom: &D, profile: EffectsProfile) -> Vec<D::Node> {
    let mut observed = Vec::new();
    for &(class, step) in REVEAL_GROUPS {
        for (idx, node) in dom.find_all(&Selector::Class(class)).into_iter().enumerate() {
            if profile.is_enhanced() {
                dom.set_attribute(&node, ANIM_DELAY_ATTRIBUTE, &format_seconds(idx as f64 * step));
                dom.set_style(&node, "opacity", "0");
            }
            observed.push(node);
        }
    }
    observed
}

/// Reveals an element that just intersected. `batch_index` is its position
/// in the current intersection batch, used when it has no assigned delay.
pub fn reveal<D: Dom>(dom: &D, node: &D::Node, batch_index: usize, profile: EffectsProfile) {
    dom.add_class(node, FADE_IN_CLASS);
    if profile.is_enhanced() {
        let delay = dom
            .attribute(node, ANIM_DELAY_ATTRIBUTE)
            .and_then(|d| d.parse::<f64>().ok())
            .unwrap_or(batch_index as f64 * BATCH_STEP);
        dom.set_style(node, "animation-delay", &format!("{}s", format_seconds(delay)));
    }
}

/// 3D tilt for a pointer at (`x`, `y`) within a `width` × `height` card.
pub fn tilt_transform(width: f64, height: f64, x: f64, y: f64) -> String {
    let rotate_x = (y - height / 2.0) / TILT_DAMPING;
    let rotate_y = (width / 2.0 - x) / TILT_DAMPING;
    format!("perspective(1000px) rotateX({rotate_x}deg) rotateY({rotate_y}deg) scale(1.02)")
}

pub fn apply_tilt<D: Dom>(dom: &D, card: &D::Node, x: f64, y: f64) {
    let (width, height) = dom.client_size(card);
    dom.set_style(card, "transform", &tilt_transform(width, height, x, y));
}

pub fn reset_tilt<D: Dom>(dom: &D, card: &D::Node) {
    dom.set_style(card, "transform", "");
}

/// Hero content offset and fade for the current scroll position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parallax {
    pub translate_y: f64,
    pub opacity: f64,
}

/// `None` once the hero has scrolled out of view.
pub fn parallax(scrolled: f64, hero_height: f64) -> Option<Parallax> {
    if scrolled >= hero_height {
        return None;
    }
    Some(Parallax {
        translate_y: scrolled * PARALLAX_RATE,
        opacity: 1.0 - (scrolled / hero_height) * 0.5,
    })
}

pub fn apply_parallax<D: Dom>(dom: &D, scrolled: f64) -> Option<Parallax> {
    let hero = dom.find(&Selector::Class("hero"))?;
    let content = dom.query(&hero, &Selector::Class("hero-content"))?;
    let effect = parallax(scrolled, dom.offset_height(&hero))?;
    dom.set_style(&content, "transform", &format!("translateY({}px)", effect.translate_y));
    dom.set_style(&content, "opacity", &effect.opacity.to_string());
    Some(effect)
}

/// Size and placement of a click ripple, relative to its button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub diameter: f64,
    pub left: f64,
    pub top: f64,
}

/// Ripple centered on a click at (`x`, `y`) inside a `width` × `height` button.
pub fn ripple_geometry(width: f64, height: f64, x: f64, y: f64) -> Ripple {
    let diameter = width.max(height);
    let radius = diameter / 2.0;
    Ripple {
        diameter,
        left: x - radius,
        top: y - radius,
    }
}

/// Appends a ripple to `button`. The caller removes it after
/// [`RIPPLE_DURATION`].
pub fn spawn_ripple<D: Dom>(dom: &D, button: &D::Node, x: f64, y: f64) -> Result<D::Node> {
    let (width, height) = dom.client_size(button);
    let ripple = ripple_geometry(width, height, x, y);

    let circle = dom.create_element("span")?;
    dom.set_attribute(&circle, "class", RIPPLE_CLASS);
    dom.set_style(&circle, "width", &format!("{}px", ripple.diameter));
    dom.set_style(&circle, "height", &format!("{}px", ripple.diameter));
    dom.set_style(&circle, "left", &format!("{}px", ripple.left));
    dom.set_style(&circle, "top", &format!("{}px", ripple.top));
    dom.append_child(button, &circle)?;
    Ok(circle)
}

/// Seconds rounded to milliseconds, so staggered delays read `0.24`
/// rather than `0.24000000000000002`.
fn format_seconds(seconds: f64) -> String {
    let millis = (seconds * 1000.0).round() / 1000.0;
    millis.to_string()
}
