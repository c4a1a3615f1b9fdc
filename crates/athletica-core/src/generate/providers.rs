//! # Value Provider Registry
//!
//! Maps provider names to the `fake` crate's locale-aware generators. All
//! randomness flows through the caller's `StdRng`, so a seed fixes every
//! generated byte. Temporal providers are anchored to a fixed base date for
//! the same reason: regenerating with the same seed next week must produce
//! identical dumps.

use std::borrow::Cow;

use chrono::{Days, NaiveDate};
use fake::faker::address::raw::{CityName, CountryName};
use fake::faker::company::raw::{CompanyName, Profession};
use fake::faker::internet::raw::{Password, SafeEmail, Username};
use fake::faker::lorem::raw::{Sentence, Word, Words};
use fake::faker::name::raw::{FirstName, LastName, Name};
use fake::faker::phone_number::raw::PhoneNumber;
use fake::locales::{AR_SA, EN, FR_FR, JA_JP, PT_BR, ZH_CN, ZH_TW};
use fake::Fake;
use rand::rngs::StdRng;
use rand::Rng;
use serde_json::Map;

use crate::error::{Result, SeedError};
use crate::generate::locale::Locale;
use crate::generate::value::Value;
use crate::table::ProviderSpec;

/// Anchor for every temporal provider. Pinned (rather than `now()`) so that
/// two runs with the same seed are byte-identical regardless of wall clock.
fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

/// Invoke a locale-bound `fake` generator, dispatching on the locale tag.
/// en_US and en_GB share the EN data set.
macro_rules! localized {
    ($locale:expr, $rng:expr, $faker:ident $(, $arg:expr)* $(,)?) => {
        localized!(@typed String, $locale, $rng, $faker $(, $arg)*)
    };
    (@typed $ty:ty, $locale:expr, $rng:expr, $faker:ident $(, $arg:expr)* $(,)?) => {
        match $locale {
            Locale::EnUs | Locale::EnGb => $faker(EN $(, $arg)*).fake_with_rng::<$ty, _>($rng),
            Locale::FrFr => $faker(FR_FR $(, $arg)*).fake_with_rng::<$ty, _>($rng),
            Locale::PtBr => $faker(PT_BR $(, $arg)*).fake_with_rng::<$ty, _>($rng),
            Locale::ArSa => $faker(AR_SA $(, $arg)*).fake_with_rng::<$ty, _>($rng),
            Locale::JaJp => $faker(JA_JP $(, $arg)*).fake_with_rng::<$ty, _>($rng),
            Locale::ZhCn => $faker(ZH_CN $(, $arg)*).fake_with_rng::<$ty, _>($rng),
            Locale::ZhTw => $faker(ZH_TW $(, $arg)*).fake_with_rng::<$ty, _>($rng),
        }
    };
}

/// Wrap a dynamically generated String into a Value::String.
#[inline]
fn owned(s: String) -> Value {
    Value::String(Cow::Owned(s))
}

/// Resolve one provider spec to a value for the given locale.
pub fn resolve(spec: &ProviderSpec, locale: Locale, rng: &mut StdRng) -> Result<Value> {
    match spec {
        ProviderSpec::Named(name) => invoke_named(name, locale, rng),
        ProviderSpec::Parameterized { method, params } => {
            invoke_with_params(method, params, locale, rng)
        }
        ProviderSpec::Custom(f) => Ok(f(locale, rng)),
    }
}

/// Dispatch a named generator with its defaults.
pub fn invoke_named(name: &str, locale: Locale, rng: &mut StdRng) -> Result<Value> {
    let value = match name {
        "first_name" => owned(localized!(locale, rng, FirstName)),
        "last_name" => owned(localized!(locale, rng, LastName)),
        "name" => owned(localized!(locale, rng, Name)),
        "user_name" => owned(localized!(locale, rng, Username)),
        "password" => owned(localized!(locale, rng, Password, 12..13)),
        "email" => owned(localized!(locale, rng, SafeEmail)),
        "phone_number" => owned(localized!(locale, rng, PhoneNumber)),
        "company" => owned(localized!(locale, rng, CompanyName)),
        "job" => owned(localized!(locale, rng, Profession)),
        "city" => owned(localized!(locale, rng, CityName)),
        "country" => owned(localized!(locale, rng, CountryName)),
        "word" => owned(localized!(locale, rng, Word)),
        "sentence" => owned(localized!(locale, rng, Sentence, 4..9)),
        "catch_phrase" => owned(catch_phrase(locale, rng)),
        "date_of_birth" => date_of_birth(rng),
        "date_this_year" => date_this_year(rng),
        "date_this_decade" => date_this_decade(rng),
        "date_time_this_year" => date_time_this_year(rng),
        "random_int" => Value::Int(rng.random_range(0..=9999)),
        "boolean" => Value::Bool(rng.random_bool(0.5)),
        _ => {
            return Err(SeedError::UnknownProvider {
                name: name.to_string(),
            })
        }
    };
    Ok(value)
}

/// Dispatch a parameterized generator. Unknown methods fail the same way an
/// unknown name does; malformed parameters are a configuration error.
pub fn invoke_with_params(
    method: &str,
    params: &Map<String, serde_json::Value>,
    locale: Locale,
    rng: &mut StdRng,
) -> Result<Value> {
    match method {
        "random_element" => {
            let elements = param_string_list(params, "elements", method)?;
            if elements.is_empty() {
                return Err(SeedError::config(
                    "random_element requires a non-empty 'elements' list",
                ));
            }
            let idx = rng.random_range(0..elements.len());
            Ok(owned(elements[idx].clone()))
        }
        "random_int" => {
            let min = param_i64(params, "min", method)?.unwrap_or(0);
            let max = param_i64(params, "max", method)?.unwrap_or(9999);
            if min > max {
                return Err(SeedError::config(format!(
                    "random_int: min {} exceeds max {}",
                    min, max
                )));
            }
            Ok(Value::Int(rng.random_range(min..=max)))
        }
        "password" => {
            let length = param_i64(params, "length", method)?.unwrap_or(12);
            if length < 1 {
                return Err(SeedError::config("password: length must be positive"));
            }
            let length = length as usize;
            Ok(owned(localized!(locale, rng, Password, length..length + 1)))
        }
        "sentence" => {
            let words = param_i64(params, "nb_words", method)?.unwrap_or(6);
            if words < 1 {
                return Err(SeedError::config("sentence: nb_words must be positive"));
            }
            let words = words as usize;
            Ok(owned(localized!(locale, rng, Sentence, words..words + 1)))
        }
        _ => Err(SeedError::UnknownProvider {
            name: method.to_string(),
        }),
    }
}

/// Three capitalized lorem words, in the spirit of Faker's catch phrases.
fn catch_phrase(locale: Locale, rng: &mut StdRng) -> String {
    let words: Vec<String> = localized!(@typed Vec<String>, locale, rng, Words, 3..4);
    let phrase = words.join(" ");
    let mut chars = phrase.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().to_string() + chars.as_str(),
    }
}

/// A birth date for an adult athlete: 18 to 80 years before the base date.
fn date_of_birth(rng: &mut StdRng) -> Value {
    let days = rng.random_range(18 * 365..=80 * 365);
    sub_days(days)
}

fn date_this_year(rng: &mut StdRng) -> Value {
    sub_days(rng.random_range(0..365))
}

fn date_this_decade(rng: &mut StdRng) -> Value {
    sub_days(rng.random_range(0..3650))
}

fn date_time_this_year(rng: &mut StdRng) -> Value {
    let days = rng.random_range(0..365);
    let seconds = rng.random_range(0..86_400);
    let date = base_date()
        .checked_sub_days(Days::new(days))
        .unwrap_or_else(base_date);
    match date.and_hms_opt(seconds / 3600, (seconds / 60) % 60, seconds % 60) {
        Some(ts) => Value::Timestamp(ts),
        None => Value::Null,
    }
}

fn sub_days(days: u64) -> Value {
    match base_date().checked_sub_days(Days::new(days)) {
        Some(d) => Value::Date(d),
        None => Value::Date(base_date()),
    }
}

fn param_i64(
    params: &Map<String, serde_json::Value>,
    key: &str,
    method: &str,
) -> Result<Option<i64>> {
    match params.get(key) {
        None => Ok(None),
        Some(v) => v.as_i64().map(Some).ok_or_else(|| {
            SeedError::config(format!("{}: parameter '{}' must be an integer", method, key))
        }),
    }
}

fn param_string_list(
    params: &Map<String, serde_json::Value>,
    key: &str,
    method: &str,
) -> Result<Vec<String>> {
    let raw = params.get(key).ok_or_else(|| {
        SeedError::config(format!("{}: missing required parameter '{}'", method, key))
    })?;
    let arr = raw.as_array().ok_or_else(|| {
        SeedError::config(format!("{}: parameter '{}' must be a list", method, key))
    })?;
    arr.iter()
        .map(|v| {
            v.as_str().map(str::to_string).ok_or_else(|| {
                SeedError::config(format!(
                    "{}: parameter '{}' must contain only strings",
                    method, key
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use serde_json::json;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = invoke_named("not_a_provider", Locale::EnUs, &mut rng()).unwrap_err();
        assert!(matches!(err, SeedError::UnknownProvider { name } if name == "not_a_provider"));
    }

    #[test]
    fn unknown_parameterized_method_is_rejected() {
        let err =
            invoke_with_params("bogus", &Map::new(), Locale::EnUs, &mut rng()).unwrap_err();
        assert!(matches!(err, SeedError::UnknownProvider { .. }));
    }

    #[test]
    fn named_providers_cover_the_registry() {
        let names = [
            "first_name",
            "last_name",
            "name",
            "user_name",
            "password",
            "email",
            "phone_number",
            "company",
            "job",
            "city",
            "country",
            "word",
            "sentence",
            "catch_phrase",
            "date_of_birth",
            "date_this_year",
            "date_this_decade",
            "date_time_this_year",
            "random_int",
            "boolean",
        ];
        let mut r = rng();
        for name in names {
            for locale in crate::generate::locale::CATALOG {
                invoke_named(name, locale, &mut r).unwrap();
            }
        }
    }

    #[test]
    fn random_element_draws_from_the_list() {
        let mut params = Map::new();
        params.insert("elements".into(), json!(["Male", "Female", "Other"]));
        let mut r = rng();
        for _ in 0..50 {
            let v = invoke_with_params("random_element", &params, Locale::EnUs, &mut r).unwrap();
            let s = v.as_str().unwrap().to_string();
            assert!(["Male", "Female", "Other"].contains(&s.as_str()));
        }
    }

    #[test]
    fn random_element_requires_elements() {
        let err =
            invoke_with_params("random_element", &Map::new(), Locale::EnUs, &mut rng())
                .unwrap_err();
        assert!(matches!(err, SeedError::Config { .. }));
    }

    #[test]
    fn random_int_honors_bounds() {
        let mut params = Map::new();
        params.insert("min".into(), json!(30));
        params.insert("max".into(), json!(180));
        let mut r = rng();
        for _ in 0..100 {
            let v = invoke_with_params("random_int", &params, Locale::EnUs, &mut r).unwrap();
            let i = v.as_int().unwrap();
            assert!((30..=180).contains(&i));
        }
    }

    #[test]
    fn random_int_rejects_inverted_bounds() {
        let mut params = Map::new();
        params.insert("min".into(), json!(10));
        params.insert("max".into(), json!(1));
        let err =
            invoke_with_params("random_int", &params, Locale::EnUs, &mut rng()).unwrap_err();
        assert!(matches!(err, SeedError::Config { .. }));
    }

    #[test]
    fn password_length_parameter() {
        let mut params = Map::new();
        params.insert("length".into(), json!(20));
        let v = invoke_with_params("password", &params, Locale::EnUs, &mut rng()).unwrap();
        assert_eq!(v.as_str().unwrap().chars().count(), 20);
    }

    #[test]
    fn dates_are_anchored_not_wall_clock() {
        let mut a = rng();
        let mut b = rng();
        assert_eq!(
            invoke_named("date_of_birth", Locale::EnUs, &mut a).unwrap(),
            invoke_named("date_of_birth", Locale::EnUs, &mut b).unwrap()
        );
    }
}
