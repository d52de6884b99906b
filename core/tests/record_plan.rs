//! Record plan tests: loading a plan file and replaying it from a seed.

use randbeans_core::{config::PlanConfig, plan::RecordPlan, SharedSource};
use std::path::PathBuf;

fn sample_plan_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../data/sample_plan.json")
}

#[test]
fn sample_plan_loads_and_generates() {
    let _ = env_logger::builder().is_test(true).try_init();

    let config = PlanConfig::load(sample_plan_path()).expect("load sample plan");
    let plan = RecordPlan::build(&config, &SharedSource::from_seed(42)).expect("build plan");

    for record in plan.records(200) {
        let age = record["age"].as_u64().expect("age is always present");
        assert!((18..=90).contains(&age), "age {age} out of range");

        let score = &record["credit_score"];
        if !score.is_null() {
            let score = score.as_i64().unwrap();
            assert!((300..=850).contains(&score), "credit_score {score} out of range");
        }

        let balance = record["balance"].as_f64().unwrap();
        assert!((-500.0..=25_000.0).contains(&balance));
    }
}

#[test]
fn same_seed_replays_the_same_records() {
    let config = PlanConfig::load(sample_plan_path()).unwrap();
    let a = RecordPlan::build(&config, &SharedSource::from_seed(0xABCD)).unwrap();
    let b = RecordPlan::build(&config, &SharedSource::from_seed(0xABCD)).unwrap();
    assert_eq!(a.records(100), b.records(100));
}
