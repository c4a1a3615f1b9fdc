//! # Athletica Table Catalog
//!
//! The twelve tables of the `olympus` schema, declared in foreign-key
//! dependency order. Foreign-key candidates are the serial ids `1..=records` of the
//! referenced table, so every table's candidate set is known before any
//! generation starts and the tables can be generated in any order.

use athletica_core::{GenerationJob, ProviderSpec, TableDef, Value};
use indexmap::IndexMap;

const SCHEMA: &str = "olympus";

/// Dependency-ordered table names, as accepted by `preview --table`.
pub const TABLE_NAMES: [&str; 12] = [
    "nationalities",
    "categories",
    "clubs",
    "disciplines",
    "events",
    "coaches",
    "athletes",
    "injuries",
    "medical_history",
    "participations",
    "trainings",
    "users",
];

fn cols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Serial-id candidates for a table seeded with `records` rows.
fn ids(records: usize) -> Vec<Value> {
    (1..=records as i64).map(Value::Int).collect()
}

fn fks(columns: &[&str], records: usize) -> IndexMap<String, Vec<Value>> {
    columns
        .iter()
        .map(|c| (c.to_string(), ids(records)))
        .collect()
}

/// Build the definition of one table. `records` sizes the candidate sets of
/// every referenced table (all tables are seeded with the same row count).
pub fn table_def(name: &str, records: usize) -> athletica_core::Result<TableDef> {
    match name {
        "nationalities" => TableDef::new(
            SCHEMA,
            "nationalities",
            cols(&["name"]),
            vec![ProviderSpec::named("country")],
            IndexMap::new(),
        ),
        "categories" => TableDef::new(
            SCHEMA,
            "categories",
            cols(&["name", "min_age", "max_age"]),
            vec![
                ProviderSpec::named("word"),
                ProviderSpec::random_int(5, 17),
                ProviderSpec::random_int(18, 40),
            ],
            IndexMap::new(),
        ),
        "clubs" => TableDef::new(
            SCHEMA,
            "clubs",
            cols(&["name", "city", "country"]),
            vec![
                ProviderSpec::named("company"),
                ProviderSpec::named("city"),
                ProviderSpec::named("country"),
            ],
            IndexMap::new(),
        ),
        "disciplines" => TableDef::new(
            SCHEMA,
            "disciplines",
            cols(&["name", "description"]),
            vec![ProviderSpec::named("word"), ProviderSpec::named("sentence")],
            IndexMap::new(),
        ),
        "events" => TableDef::new(
            SCHEMA,
            "events",
            cols(&["name", "date", "location"]),
            vec![
                ProviderSpec::named("catch_phrase"),
                ProviderSpec::named("date_this_decade"),
                ProviderSpec::named("city"),
            ],
            IndexMap::new(),
        ),
        "coaches" => TableDef::new(
            SCHEMA,
            "coaches",
            cols(&["name", "specialty"]),
            vec![ProviderSpec::named("name"), ProviderSpec::named("job")],
            IndexMap::new(),
        ),
        "athletes" => TableDef::new(
            SCHEMA,
            "athletes",
            cols(&[
                "name",
                "birth_date",
                "gender",
                "nationality_id",
                "category_id",
                "club_id",
            ]),
            vec![
                ProviderSpec::named("name"),
                ProviderSpec::named("date_of_birth"),
                ProviderSpec::random_element(["Male", "Female", "Other"]),
                ProviderSpec::named("nationality_id"),
                ProviderSpec::named("category_id"),
                ProviderSpec::named("club_id"),
            ],
            fks(&["nationality_id", "category_id", "club_id"], records),
        ),
        "injuries" => TableDef::new(
            SCHEMA,
            "injuries",
            cols(&["athlete_id", "injury_type", "date", "severity", "description"]),
            vec![
                ProviderSpec::named("athlete_id"),
                ProviderSpec::named("word"),
                ProviderSpec::named("date_this_year"),
                ProviderSpec::random_element(["Minor", "Moderate", "Severe"]),
                ProviderSpec::named("sentence"),
            ],
            fks(&["athlete_id"], records),
        ),
        "medical_history" => TableDef::new(
            SCHEMA,
            "medical_history",
            cols(&["athlete_id", "record_date", "diagnosis", "treatment"]),
            vec![
                ProviderSpec::named("athlete_id"),
                ProviderSpec::named("date_this_year"),
                ProviderSpec::named("sentence"),
                ProviderSpec::named("sentence"),
            ],
            fks(&["athlete_id"], records),
        ),
        "participations" => TableDef::new(
            SCHEMA,
            "participations",
            cols(&[
                "athlete_id",
                "event_id",
                "discipline_id",
                "result",
                "position",
            ]),
            vec![
                ProviderSpec::named("athlete_id"),
                ProviderSpec::named("event_id"),
                ProviderSpec::named("discipline_id"),
                ProviderSpec::named("sentence"),
                ProviderSpec::random_int(1, 100),
            ],
            fks(&["athlete_id", "event_id", "discipline_id"], records),
        ),
        "trainings" => TableDef::new(
            SCHEMA,
            "trainings",
            cols(&[
                "athlete_id",
                "coach_id",
                "date",
                "duration_minutes",
                "training_type",
            ]),
            vec![
                ProviderSpec::named("athlete_id"),
                ProviderSpec::named("coach_id"),
                ProviderSpec::named("date_this_year"),
                ProviderSpec::random_int(30, 180),
                ProviderSpec::named("word"),
            ],
            fks(&["athlete_id", "coach_id"], records),
        ),
        "users" => TableDef::new(
            SCHEMA,
            "users",
            cols(&["username", "password", "role", "athlete_id", "coach_id"]),
            vec![
                ProviderSpec::named("user_name"),
                ProviderSpec::named("password"),
                ProviderSpec::random_element(["admin", "coach", "athlete"]),
                ProviderSpec::named("athlete_id"),
                ProviderSpec::named("coach_id"),
            ],
            fks(&["athlete_id", "coach_id"], records),
        ),
        other => Err(athletica_core::SeedError::config(format!(
            "unknown table '{}'; expected one of: {}",
            other,
            TABLE_NAMES.join(", ")
        ))),
    }
}

/// All tables as generation jobs, numbered from `first_prefix` in dependency
/// order so a lexicographic load replays them correctly.
pub fn jobs(records: usize, first_prefix: u32) -> athletica_core::Result<Vec<GenerationJob>> {
    TABLE_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let prefix = format!("{:02}", first_prefix + i as u32);
            Ok(GenerationJob::new(*name, prefix, table_def(name, records)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_catalog_table_builds() {
        for name in TABLE_NAMES {
            table_def(name, 10).unwrap();
        }
    }

    #[test]
    fn unknown_table_is_rejected_with_the_catalog_list() {
        let err = table_def("medals", 10).unwrap_err();
        assert!(err.to_string().contains("athletes"));
    }

    #[test]
    fn jobs_are_numbered_in_dependency_order() {
        let jobs = jobs(10, 1).unwrap();
        assert_eq!(jobs.len(), TABLE_NAMES.len());
        assert_eq!(jobs[0].name, "nationalities");
        assert_eq!(jobs[0].prefix, "01");
        assert_eq!(jobs[6].name, "athletes");
        assert_eq!(jobs[6].prefix, "07");
        assert_eq!(jobs[11].prefix, "12");
    }

    #[test]
    fn athlete_history_tables_sit_between_athletes_and_participations() {
        let athletes = TABLE_NAMES.iter().position(|n| *n == "athletes").unwrap();
        let injuries = TABLE_NAMES.iter().position(|n| *n == "injuries").unwrap();
        let medical = TABLE_NAMES
            .iter()
            .position(|n| *n == "medical_history")
            .unwrap();
        let participations = TABLE_NAMES
            .iter()
            .position(|n| *n == "participations")
            .unwrap();
        assert!(athletes < injuries);
        assert!(injuries < medical);
        assert!(medical < participations);

        for name in ["injuries", "medical_history"] {
            let table = table_def(name, 4).unwrap();
            assert_eq!(
                table.fk_candidates("athlete_id").unwrap().len(),
                4,
                "{} references athletes",
                name
            );
        }
    }

    #[test]
    fn fk_candidates_cover_the_serial_range() {
        let table = table_def("users", 3).unwrap();
        assert_eq!(
            table.fk_candidates("athlete_id").unwrap(),
            &[Value::Int(1), Value::Int(2), Value::Int(3)]
        );
    }
}
