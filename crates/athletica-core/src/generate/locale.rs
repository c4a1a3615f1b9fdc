//! # Locale Pool
//!
//! A generation call draws its records from a pool of locales, sized by the
//! `variability` parameter in `[0, 1]`. Each record then picks one locale from
//! the pool uniformly, so higher variability mixes more scripts and naming
//! conventions into the same table.

use rand::rngs::StdRng;

/// A locale tag the value providers can be bound to.
///
/// `en_US` and `en_GB` share the same underlying `fake` data set; they exist
/// as distinct tags so the pool-sizing arithmetic matches the catalog the
/// rest of the pipeline documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    EnUs,
    EnGb,
    FrFr,
    PtBr,
    ArSa,
    JaJp,
    ZhCn,
    ZhTw,
}

/// The fixed locale catalog. The first entry is the deterministic fallback
/// used when variability is zero.
pub const CATALOG: [Locale; 8] = [
    Locale::EnUs,
    Locale::EnGb,
    Locale::FrFr,
    Locale::PtBr,
    Locale::ArSa,
    Locale::JaJp,
    Locale::ZhCn,
    Locale::ZhTw,
];

impl Locale {
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::EnUs => "en_US",
            Locale::EnGb => "en_GB",
            Locale::FrFr => "fr_FR",
            Locale::PtBr => "pt_BR",
            Locale::ArSa => "ar_SA",
            Locale::JaJp => "ja_JP",
            Locale::ZhCn => "zh_CN",
            Locale::ZhTw => "zh_TW",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Select the locale pool for one generation call.
///
/// `variability <= 0` always yields exactly the first catalog locale, with no
/// rng consumption, so zero-variability runs are trivially reproducible. Any
/// positive value selects `clamp(ceil(variability * total), 1, total)` locales
/// by uniform sampling without replacement.
pub fn select_pool(variability: f64, rng: &mut StdRng) -> Vec<Locale> {
    let total = CATALOG.len();
    if variability <= 0.0 {
        return vec![CATALOG[0]];
    }
    let count = ((variability * total as f64).ceil() as usize).clamp(1, total);
    rand::seq::index::sample(rng, total, count)
        .into_iter()
        .map(|i| CATALOG[i])
        .collect()
}
