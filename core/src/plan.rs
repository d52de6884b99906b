//! Record plans: a PlanConfig turned into named randomizers that share
//! one source and emit flat JSON records.
//!
//! RULE: Fields are built and drawn in the order the config lists them.
//! Reordering fields changes every record that follows for a given seed.

use crate::{
    config::{FieldKind, FieldConfig, PlanConfig},
    error::{RandomizerError, RandomizerResult},
    optional::OptionalRandomizer,
    randomizer::Randomizer,
    range::{RangeRandomizer, RangeValue},
    rng::{RandomSource, SharedSource},
    uuid_randomizer::UuidRandomizer,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::marker::PhantomData;

/// Conversion of a generated value into its JSON form.
pub trait IntoJson {
    fn into_json(self) -> Value;
}

macro_rules! numeric_into_json {
    ($($t:ty),*) => {$(
        impl IntoJson for $t {
            fn into_json(self) -> Value { Value::from(self) }
        }
    )*};
}

numeric_into_json!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl IntoJson for NaiveDate {
    fn into_json(self) -> Value {
        Value::String(self.format("%Y-%m-%d").to_string())
    }
}

impl IntoJson for NaiveDateTime {
    fn into_json(self) -> Value {
        Value::String(self.format("%Y-%m-%dT%H:%M:%S").to_string())
    }
}

impl IntoJson for uuid::Uuid {
    fn into_json(self) -> Value {
        Value::String(self.to_string())
    }
}

impl<T: IntoJson> IntoJson for Option<T> {
    fn into_json(self) -> Value {
        self.map_or(Value::Null, IntoJson::into_json)
    }
}

/// Adapts a typed randomizer to emit JSON values.
struct JsonRandomizer<T, R> {
    inner:  R,
    _value: PhantomData<fn() -> T>,
}

impl<T, R> JsonRandomizer<T, R> {
    fn new(inner: R) -> Self {
        Self { inner, _value: PhantomData }
    }
}

impl<T: IntoJson, R: Randomizer<T>> Randomizer<Value> for JsonRandomizer<T, R> {
    fn random_value(&self) -> Value {
        self.inner.random_value().into_json()
    }
}

pub struct RecordPlan {
    source: SharedSource,
    fields: Vec<(String, Box<dyn Randomizer<Value>>)>,
}

impl RecordPlan {
    /// Build with seed precedence: `explicit_seed`, then the config's seed,
    /// then RANDBEANS_SEED, then entropy.
    pub fn from_config(config: &PlanConfig, explicit_seed: Option<u64>) -> RandomizerResult<Self> {
        let source = RandomSource::resolve(explicit_seed.or(config.seed))?.into_shared();
        Self::build(config, &source)
    }

    /// Build every field against an existing source.
    pub fn build(config: &PlanConfig, source: &SharedSource) -> RandomizerResult<Self> {
        config.validate()?;
        let fields = config
            .fields
            .iter()
            .map(|field| Ok((field.name.clone(), build_field(field, source)?)))
            .collect::<RandomizerResult<Vec<_>>>()?;
        log::info!("Record plan ready: {} fields, seed {}", fields.len(), source.seed());
        Ok(Self { source: source.clone(), fields })
    }

    pub fn seed(&self) -> u64 {
        self.source.seed()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Draw one record; fields are drawn in plan order.
    pub fn next_record(&self) -> Value {
        let mut record = Map::new();
        for (name, randomizer) in &self.fields {
            record.insert(name.clone(), randomizer.random_value());
        }
        Value::Object(record)
    }

    pub fn records(&self, count: usize) -> Vec<Value> {
        (0..count).map(|_| self.next_record()).collect()
    }
}

impl Randomizer<Value> for RecordPlan {
    fn random_value(&self) -> Value {
        self.next_record()
    }
}

fn build_field(field: &FieldConfig, source: &SharedSource) -> RandomizerResult<Box<dyn Randomizer<Value>>> {
    match field.kind {
        FieldKind::I8       => ranged::<i8>(field, source),
        FieldKind::I16      => ranged::<i16>(field, source),
        FieldKind::I32      => ranged::<i32>(field, source),
        FieldKind::I64      => ranged::<i64>(field, source),
        FieldKind::U8       => ranged::<u8>(field, source),
        FieldKind::U16      => ranged::<u16>(field, source),
        FieldKind::U32      => ranged::<u32>(field, source),
        FieldKind::U64      => ranged::<u64>(field, source),
        FieldKind::F32      => ranged::<f32>(field, source),
        FieldKind::F64      => ranged::<f64>(field, source),
        FieldKind::Date     => ranged::<NaiveDate>(field, source),
        FieldKind::DateTime => ranged::<NaiveDateTime>(field, source),
        FieldKind::Uuid     => Ok(maybe_optional::<uuid::Uuid, _>(field, source, UuidRandomizer::new(source))),
    }
}

fn ranged<T>(field: &FieldConfig, source: &SharedSource) -> RandomizerResult<Box<dyn Randomizer<Value>>>
where
    T: RangeValue + DeserializeOwned + IntoJson + 'static,
{
    let min = parse_bound::<T>(field, field.min.as_ref(), "min")?;
    let max = parse_bound::<T>(field, field.max.as_ref(), "max")?;
    let range = RangeRandomizer::new(source, min, max).map_err(|e| RandomizerError::Config {
        field:  field.name.clone(),
        reason: e.to_string(),
    })?;
    Ok(maybe_optional::<T, _>(field, source, range))
}

fn maybe_optional<T, R>(field: &FieldConfig, source: &SharedSource, inner: R) -> Box<dyn Randomizer<Value>>
where
    T: IntoJson + 'static,
    R: Randomizer<T> + 'static,
{
    match field.optional_percent {
        Some(percent) => {
            let optional = OptionalRandomizer::new(source, inner, percent).with_rule(field.inclusion_rule);
            Box::new(JsonRandomizer::<Option<T>, _>::new(optional))
        }
        None => Box::new(JsonRandomizer::<T, _>::new(inner)),
    }
}

fn parse_bound<T: DeserializeOwned>(
    field: &FieldConfig,
    raw: Option<&Value>,
    which: &str,
) -> RandomizerResult<Option<T>> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone()).map(Some).map_err(|e| {
            RandomizerError::Config {
                field:  field.name.clone(),
                reason: format!("{which} {value} is not a valid {:?}: {e}", field.kind),
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(json: &str, seed: u64) -> RecordPlan {
        let config = PlanConfig::from_json(json).unwrap();
        RecordPlan::build(&config, &SharedSource::from_seed(seed)).unwrap()
    }

    #[test]
    fn record_has_every_field() {
        let p = plan(
            r#"{ "fields": [
                { "name": "age", "kind": "u8", "min": 18, "max": 65 },
                { "name": "id", "kind": "uuid" },
                { "name": "joined", "kind": "date", "min": "2020-01-01", "max": "2020-01-31" }
            ] }"#,
            1,
        );
        let record = p.next_record();
        let age = record["age"].as_u64().unwrap();
        assert!((18..=65).contains(&age));
        assert_eq!(record["id"].as_str().unwrap().len(), 36);
        assert!(record["joined"].as_str().unwrap().starts_with("2020-01-"));
        assert_eq!(p.field_names().collect::<Vec<_>>(), ["age", "id", "joined"]);
    }

    #[test]
    fn optional_field_emits_null_when_absent() {
        let p = plan(
            r#"{ "fields": [
                { "name": "nickname_len", "kind": "u8", "min": 1, "max": 3,
                  "optional_percent": 0, "inclusion_rule": "exclusive" }
            ] }"#,
            2,
        );
        assert!(p.records(50).iter().all(|r| r["nickname_len"].is_null()));
    }

    #[test]
    fn inverted_bounds_name_the_field() {
        let config = PlanConfig::from_json(
            r#"{ "fields": [ { "name": "score", "kind": "i32", "min": 10, "max": 1 } ] }"#,
        )
        .unwrap();
        let err = RecordPlan::build(&config, &SharedSource::from_seed(0)).err().unwrap();
        let text = err.to_string();
        assert!(text.contains("score") && text.contains("min must be before or equal to max"), "{text}");
    }

    #[test]
    fn bound_of_wrong_type_is_rejected() {
        let config = PlanConfig::from_json(
            r#"{ "fields": [ { "name": "when", "kind": "date", "min": 12 } ] }"#,
        )
        .unwrap();
        assert!(RecordPlan::build(&config, &SharedSource::from_seed(0)).is_err());
    }

    #[test]
    fn explicit_seed_beats_config_seed() {
        let config = PlanConfig::from_json(r#"{ "seed": 5, "fields": [ { "name": "n", "kind": "i64" } ] }"#)
            .unwrap();
        assert_eq!(RecordPlan::from_config(&config, Some(9)).unwrap().seed(), 9);
        assert_eq!(RecordPlan::from_config(&config, None).unwrap().seed(), 5);
    }
}
