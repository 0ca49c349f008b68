//! Keyword classifier mapping free text to a disaster [`Category`].
//!
//! Case-insensitive substring match over a fixed, ordered keyword table. The
//! first category with a matching phrase wins, so more specific categories
//! sit ahead of the ones whose keywords they overlap (`wildfire` before
//! `fire`).

use crate::category::Category;

/// Ordered keyword table. Order is priority.
pub const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Earthquake,
        &["earthquake", "quake", "tremor", "seismic", "shaking", "aftershock"],
    ),
    (
        Category::Flood,
        &["flood", "flooding", "water rising", "overflow", "inundation", "flash flood"],
    ),
    (
        Category::Wildfire,
        &["wildfire", "forest fire", "brush fire", "bushfire"],
    ),
    (
        Category::Fire,
        &["fire", "burning", "smoke", "flames", "blaze"],
    ),
    (
        Category::Hurricane,
        &["hurricane", "cyclone", "typhoon", "tropical storm"],
    ),
    (Category::Tornado, &["tornado", "twister", "funnel cloud"]),
    (
        Category::WinterStorm,
        &[
            "winter storm",
            "blizzard",
            "ice storm",
            "snow storm",
            "freezing",
            "frostbite",
            "hypothermia",
        ],
    ),
    (Category::Tsunami, &["tsunami", "tidal wave", "sea wave"]),
    (
        Category::HeatWave,
        &["heat wave", "extreme heat", "heat stroke", "hot weather"],
    ),
];

/// Classify a message. Total: returns `GeneralDisaster` when nothing matches.
pub fn classify(message: &str) -> Category {
    let lower = message.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| contains_any(&lower, keywords))
        .map(|(category, _)| *category)
        .unwrap_or(Category::GeneralDisaster)
}

/// True if `haystack` contains any of `needles`. Callers lower-case first.
pub(crate) fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
