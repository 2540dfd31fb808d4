//! Patient identity and readmission derivation
//!
//! Admissions are grouped by the derived patient key, ordered
//! chronologically, and flagged as readmissions when the gap from
//! discharge to the patient's next admission is within the configured
//! window. The last admission of a patient has no next admission and is
//! never flagged.

use rustc_hash::FxHashSet;

use crate::models::{Admission, FlaggedAdmission};

/// Sort admissions and derive the per-admission readmission flag
///
/// The output is ordered by (patient key, admission date); admissions with
/// equal dates keep their input order, so the derivation is deterministic
/// for a given input file.
#[must_use]
pub fn flag_readmissions(admissions: Vec<Admission>, window_days: i64) -> Vec<FlaggedAdmission> {
    let mut keyed: Vec<(String, Admission)> = admissions
        .into_iter()
        .map(|a| (a.patient_key(), a))
        .collect();
    keyed.sort_by(|(ka, aa), (kb, ab)| {
        ka.cmp(kb).then(aa.admission_date.cmp(&ab.admission_date))
    });

    let mut flagged = Vec::with_capacity(keyed.len());
    for i in 0..keyed.len() {
        let (key, admission) = &keyed[i];
        let days_to_next = keyed.get(i + 1).and_then(|(next_key, next)| {
            (next_key == key)
                .then(|| (next.admission_date - admission.discharge_date).num_days())
        });
        flagged.push(FlaggedAdmission {
            admission: admission.clone(),
            patient_key: key.clone(),
            days_to_next,
            readmitted: days_to_next.is_some_and(|gap| gap <= window_days),
        });
    }
    flagged
}

/// Number of distinct patient keys in the cohort
#[must_use]
pub fn distinct_patients(records: &[FlaggedAdmission]) -> usize {
    records
        .iter()
        .map(|r| r.patient_key.as_str())
        .collect::<FxHashSet<_>>()
        .len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn admission(adm: (i32, u32, u32), dis: (i32, u32, u32), cep: &str) -> Admission {
        Admission {
            age: 50.0,
            admission_date: NaiveDate::from_ymd_opt(adm.0, adm.1, adm.2).unwrap(),
            discharge_date: NaiveDate::from_ymd_opt(dis.0, dis.1, dis.2).unwrap(),
            birth_date: NaiveDate::from_ymd_opt(1970, 6, 1).unwrap(),
            postal_code: cep.to_string(),
            procedure: None,
            length_of_stay: None,
        }
    }

    #[test]
    fn gap_of_exactly_thirty_days_flags_readmission() {
        let admissions = vec![
            admission((2020, 1, 1), (2020, 1, 10), "01000"),
            admission((2020, 2, 9), (2020, 2, 15), "01000"),
        ];
        let flagged = flag_readmissions(admissions, 30);
        assert_eq!(flagged[0].days_to_next, Some(30));
        assert!(flagged[0].readmitted);
        assert!(!flagged[1].readmitted);
    }

    #[test]
    fn gap_of_thirty_one_days_does_not_flag() {
        let admissions = vec![
            admission((2020, 1, 1), (2020, 1, 10), "01000"),
            admission((2020, 2, 10), (2020, 2, 15), "01000"),
        ];
        let flagged = flag_readmissions(admissions, 30);
        assert_eq!(flagged[0].days_to_next, Some(31));
        assert!(!flagged[0].readmitted);
    }

    #[test]
    fn last_admission_of_patient_is_never_flagged() {
        let admissions = vec![admission((2020, 1, 1), (2020, 1, 10), "01000")];
        let flagged = flag_readmissions(admissions, 30);
        assert_eq!(flagged[0].days_to_next, None);
        assert!(!flagged[0].readmitted);
    }

    #[test]
    fn different_patients_are_windowed_independently() {
        let admissions = vec![
            admission((2020, 1, 1), (2020, 1, 10), "01000"),
            admission((2020, 1, 12), (2020, 1, 20), "02000"),
        ];
        let flagged = flag_readmissions(admissions, 30);
        assert!(flagged.iter().all(|f| !f.readmitted));
        assert!(flagged.iter().all(|f| f.days_to_next.is_none()));
        assert_eq!(distinct_patients(&flagged), 2);
    }

    #[test]
    fn admissions_are_sorted_chronologically_within_patient() {
        let admissions = vec![
            admission((2020, 3, 1), (2020, 3, 5), "01000"),
            admission((2020, 1, 1), (2020, 1, 10), "01000"),
        ];
        let flagged = flag_readmissions(admissions, 30);
        assert_eq!(
            flagged[0].admission.admission_date,
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
        );
        // Jan 10 discharge to Mar 1 admission is 51 days
        assert_eq!(flagged[0].days_to_next, Some(51));
        assert!(!flagged[0].readmitted);
    }

    #[test]
    fn overlapping_stays_count_toward_the_window() {
        // The source data does not guarantee discharge >= next admission;
        // a negative gap still falls inside the window.
        let admissions = vec![
            admission((2020, 1, 1), (2020, 1, 20), "01000"),
            admission((2020, 1, 15), (2020, 1, 25), "01000"),
        ];
        let flagged = flag_readmissions(admissions, 30);
        assert_eq!(flagged[0].days_to_next, Some(-5));
        assert!(flagged[0].readmitted);
    }
}
