use super::common::*;
use crate::assistant::applications::domain::{
    ApplicationId, NewApplication, ValidationError, INITIAL_STATUS,
};
use crate::assistant::applications::service::{ApplicationService, ApplicationServiceError};
use crate::assistant::applications::store::StoreError;
use crate::assistant::testing::{AlwaysConflictStore, UnavailableStore};
use regex::Regex;
use std::sync::Arc;

#[test]
fn create_then_get_yields_received_with_one_progress_entry() {
    let service = build_service();

    let created = service.create(submission()).expect("application creates");
    let fetched = service.get(&created.app_id).expect("record exists");

    assert_eq!(fetched.status, INITIAL_STATUS);
    assert_eq!(fetched.progress.len(), 1);
    assert!(fetched.progress[0].message.contains("Acme Logistics"));
    assert_eq!(fetched.details.power_kw, Some(150));
    assert_eq!(fetched.details.connectors, vec!["CCS", "Type 2"]);
}

#[test]
fn generated_ids_use_the_canonical_form() {
    let service = build_service();
    let id_shape = Regex::new(r"^APP-\d{6}$").expect("pattern compiles");

    for _ in 0..5 {
        let record = service.create(submission()).expect("application creates");
        assert!(
            id_shape.is_match(record.app_id.as_str()),
            "unexpected id {}",
            record.app_id
        );
    }
}

#[test]
fn update_status_appends_a_progress_entry() {
    let service = build_service();
    let created = service.create(submission()).expect("application creates");

    service
        .update_status(&created.app_id, "Approved")
        .expect("status updates");

    let fetched = service.get(&created.app_id).expect("record exists");
    assert_eq!(fetched.status, "Approved");
    assert_eq!(fetched.progress.len(), 2);
    assert_eq!(fetched.progress[1].message, "Status changed to Approved");
    assert_eq!(
        service.status_of(&created.app_id).expect("status reads"),
        "Approved"
    );
}

#[test]
fn update_status_on_unknown_id_is_not_found() {
    let service = build_service();
    match service.update_status(&ApplicationId("APP-000000".to_string()), "Approved") {
        Err(ApplicationServiceError::Store(StoreError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn add_progress_on_unknown_id_leaves_storage_untouched() {
    let service = build_service();
    let created = service.create(submission()).expect("application creates");

    match service.add_progress(&ApplicationId("APP-000000".to_string()), "ghost note") {
        Err(ApplicationServiceError::Store(StoreError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }

    let fetched = service.get(&created.app_id).expect("record exists");
    assert_eq!(fetched.progress.len(), 1, "no entry may leak in");
    assert!(service.list().expect("list succeeds").len() == 1);
}

#[test]
fn add_progress_appends_in_order() {
    let service = build_service();
    let created = service.create(submission()).expect("application creates");

    service
        .add_progress(&created.app_id, "permit filed")
        .expect("first note");
    service
        .add_progress(&created.app_id, "contractor selected")
        .expect("second note");

    let fetched = service.get(&created.app_id).expect("record exists");
    let messages: Vec<&str> = fetched
        .progress
        .iter()
        .map(|entry| entry.message.as_str())
        .collect();
    assert_eq!(
        messages,
        vec![
            "Submitted by Acme Logistics",
            "permit filed",
            "contractor selected"
        ]
    );
}

#[test]
fn find_by_applicant_matches_case_insensitively() {
    let service = build_service();
    service.create(submission()).expect("first applicant");
    service
        .create(NewApplication {
            applicant: "Harbor Transit".to_string(),
            ..NewApplication::default()
        })
        .expect("second applicant");

    let matches = service.find_by_applicant("acme").expect("search succeeds");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].applicant, "Acme Logistics");

    let all = service.find_by_applicant("").expect("search succeeds");
    assert_eq!(all.len(), 2);

    assert!(service
        .find_by_applicant("nobody")
        .expect("search succeeds")
        .is_empty());
}

#[test]
fn create_rejects_short_applicant_names() {
    let service = build_service();
    let result = service.create(NewApplication {
        applicant: "A".to_string(),
        ..NewApplication::default()
    });
    match result {
        Err(ApplicationServiceError::Validation(ValidationError::ApplicantTooShort { .. })) => {}
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn create_rejects_power_outside_bounds() {
    let service = build_service();
    for power_kw in [0, 1001] {
        let result = service.create(NewApplication {
            applicant: "Acme Logistics".to_string(),
            power_kw: Some(power_kw),
            ..NewApplication::default()
        });
        match result {
            Err(ApplicationServiceError::Validation(ValidationError::PowerOutOfRange {
                given,
            })) => assert_eq!(given, power_kw),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}

#[test]
fn exhausted_id_generation_is_fatal() {
    let service = ApplicationService::new(Arc::new(AlwaysConflictStore));
    match service.create(submission()) {
        Err(ApplicationServiceError::IdSpaceExhausted) => {}
        other => panic!("expected exhaustion, got {other:?}"),
    }
}

#[test]
fn store_unavailability_propagates() {
    let service = ApplicationService::new(Arc::new(UnavailableStore));
    match service.get(&ApplicationId("APP-123456".to_string())) {
        Err(ApplicationServiceError::Store(StoreError::Unavailable(_))) => {}
        other => panic!("expected unavailable, got {other:?}"),
    }
}
