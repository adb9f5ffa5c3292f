//! Tests for the engine's per-year reductions

use super::*;

fn rec(year: &str, value: f64) -> ParsedRecord {
    ParsedRecord {
        year: YearKey::parse(year).unwrap(),
        value,
    }
}

fn as_pairs(totals: &YearlyTotals) -> Vec<(String, f64)> {
    totals
        .iter()
        .map(|(year, value)| (year.to_string(), value))
        .collect()
}

#[test]
fn test_museum_totals_are_summed_per_year() {
    let engine = Engine::new(2).unwrap();
    let records = vec![
        rec("2015", 30.0),
        rec("2014", 5.0),
        rec("2015", 12.5),
        rec("2014", 0.0),
    ];

    let totals = engine.aggregate(DatasetKind::Museum, &records).unwrap();

    assert_eq!(totals.dataset(), DatasetKind::Museum);
    assert_eq!(
        as_pairs(&totals),
        vec![("2014".to_string(), 5.0), ("2015".to_string(), 42.5)]
    );
}

#[test]
fn test_crime_totals_count_rows_not_values() {
    let engine = Engine::new(2).unwrap();
    // Values are deliberately not 1.0 to show they are ignored
    let records = vec![rec("2015", 7.0), rec("2015", 3.0), rec("2016", 9.0)];

    let totals = engine.aggregate(DatasetKind::Crime, &records).unwrap();

    assert_eq!(
        as_pairs(&totals),
        vec![("2015".to_string(), 2.0), ("2016".to_string(), 1.0)]
    );
}

#[test]
fn test_totals_do_not_depend_on_row_order() {
    let engine = Engine::new(4).unwrap();
    let records: Vec<ParsedRecord> = (0..200)
        .map(|i| rec(["2014", "2015", "2016"][i % 3], (i % 17) as f64))
        .collect();
    let mut shuffled = records.clone();
    shuffled.reverse();
    shuffled.rotate_left(37);

    let forward = engine.aggregate(DatasetKind::Museum, &records).unwrap();
    let backward = engine.aggregate(DatasetKind::Museum, &shuffled).unwrap();

    assert_eq!(forward, backward);
    let expected: f64 = records.iter().map(|r| r.value).sum();
    assert_eq!(forward.grand_total(), expected);
}

#[test]
fn test_empty_records_give_empty_totals() {
    let engine = Engine::new(1).unwrap();
    let totals = engine.aggregate(DatasetKind::Crime, &[]).unwrap();
    assert!(totals.is_empty());
}

#[test]
fn test_load_dataset_filters_then_counts() {
    let engine = Engine::new(2).unwrap();
    let text = "DR,Reported,Occurred\n\
                1,x,01/02/2010\n\
                2,x,05/03/2015\n\
                3,x,06/01/2015\n\
                4,x,01/01/2019\n";

    let (parsed, totals) = engine
        .load_dataset(text, &RecordSchema::crime(), 20)
        .unwrap();

    assert_eq!(parsed.stats.out_of_range, 2);
    assert_eq!(as_pairs(&totals), vec![("2015".to_string(), 2.0)]);
    engine.shutdown();
}

#[test]
fn test_zero_workers_uses_cpu_count() {
    let engine = Engine::new(0).unwrap();
    assert_eq!(engine.workers(), num_cpus::get());
}
