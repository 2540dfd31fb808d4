//! Tests for patient identity reconstruction and readmission windowing

use chrono::NaiveDate;
use readmit_study::flag_readmissions;
use readmit_study::models::Admission;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn admission(adm: NaiveDate, dis: NaiveDate, cep: &str, birth: NaiveDate) -> Admission {
    Admission {
        age: 52.0,
        admission_date: adm,
        discharge_date: dis,
        birth_date: birth,
        postal_code: cep.to_string(),
        procedure: Some("Artrotomia".to_string()),
        length_of_stay: Some((dis - adm).num_days() as f64),
    }
}

#[test]
fn boundary_gap_is_inclusive() {
    let birth = date(1968, 11, 2);
    let exactly_thirty = vec![
        admission(date(2019, 6, 1), date(2019, 6, 8), "04038-001", birth),
        admission(date(2019, 7, 8), date(2019, 7, 15), "04038-001", birth),
    ];
    let flagged = flag_readmissions(exactly_thirty, 30);
    assert!(flagged[0].readmitted);

    let thirty_one = vec![
        admission(date(2019, 6, 1), date(2019, 6, 8), "04038-001", birth),
        admission(date(2019, 7, 9), date(2019, 7, 15), "04038-001", birth),
    ];
    let flagged = flag_readmissions(thirty_one, 30);
    assert!(!flagged[0].readmitted);
}

#[test]
fn patient_key_joins_postal_code_and_birth_date() {
    let birth = date(1968, 11, 2);
    let admissions = vec![admission(
        date(2019, 6, 1),
        date(2019, 6, 8),
        "04038-001",
        birth,
    )];
    let flagged = flag_readmissions(admissions, 30);
    assert_eq!(flagged[0].patient_key, "04038-001_1968-11-02");
}

#[test]
fn same_key_merges_records_into_one_patient_history() {
    // The key is a heuristic: two records agreeing on postal code and
    // birth date are treated as the same person.
    let birth = date(1968, 11, 2);
    let admissions = vec![
        admission(date(2019, 6, 1), date(2019, 6, 8), "04038-001", birth),
        admission(date(2019, 6, 20), date(2019, 6, 25), "04038-001", birth),
    ];
    let flagged = flag_readmissions(admissions, 30);
    assert!(flagged[0].readmitted);
    assert_eq!(flagged[0].days_to_next, Some(12));
}

#[test]
fn differing_birth_dates_split_the_key() {
    let admissions = vec![
        admission(date(2019, 6, 1), date(2019, 6, 8), "04038-001", date(1968, 11, 2)),
        admission(date(2019, 6, 20), date(2019, 6, 25), "04038-001", date(1971, 1, 9)),
    ];
    let flagged = flag_readmissions(admissions, 30);
    assert!(flagged.iter().all(|f| !f.readmitted));
}

#[test]
fn only_the_immediate_next_admission_defines_the_gap() {
    let birth = date(1968, 11, 2);
    let admissions = vec![
        admission(date(2019, 1, 1), date(2019, 1, 5), "04038-001", birth),
        admission(date(2019, 4, 1), date(2019, 4, 5), "04038-001", birth),
        admission(date(2019, 4, 20), date(2019, 4, 25), "04038-001", birth),
    ];
    let flagged = flag_readmissions(admissions, 30);
    // first gap is 86 days, second is 15
    assert!(!flagged[0].readmitted);
    assert!(flagged[1].readmitted);
    assert!(!flagged[2].readmitted);
}
