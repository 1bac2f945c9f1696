use chrono::NaiveDate;
use civic_insights::analytics::ServiceResult;
use civic_insights::ingest::ServiceRecordImporter;

const SAMPLE_EXPORT: &str = "\
Service ID,Start Date,End Date,Division,Ward,Estimated Cost,Result,Notes
1001,2025-01-06,2025-01-20,Transportation Services,4,\"$1,250.00\",pass,Resurfaced the eastbound curb lane
1002,2025-01-08,,Parks & Forestry,66,480,FAIL,
1003,01/15/2025,2025-02-01,Water Services,9,not-a-number,deferred,Meter audit pending
1004,,,,,,,
";

#[test]
fn importer_maps_headers_and_normalizes_fields() {
    let records = ServiceRecordImporter::from_reader(SAMPLE_EXPORT.as_bytes())
        .expect("well-formed export parses");
    assert_eq!(records.len(), 4);

    let first = &records[0];
    assert_eq!(first.id, 1001);
    assert_eq!(first.start_date, NaiveDate::from_ymd_opt(2025, 1, 6));
    assert_eq!(first.end_date, NaiveDate::from_ymd_opt(2025, 1, 20));
    assert_eq!(first.division_owner.as_deref(), Some("Transportation Services"));
    assert_eq!(first.ward, Some(4));
    assert_eq!(first.estimated_cost, Some(1250.0));
    assert_eq!(first.result, ServiceResult::Pass);
}

#[test]
fn malformed_fields_degrade_to_absent_instead_of_failing() {
    let records = ServiceRecordImporter::from_reader(SAMPLE_EXPORT.as_bytes())
        .expect("well-formed export parses");

    let third = &records[2];
    // US-style date still parses; the cost cell does not and becomes absent.
    assert_eq!(third.start_date, NaiveDate::from_ymd_opt(2025, 1, 15));
    assert_eq!(third.estimated_cost, None);
    assert_eq!(
        third.result,
        ServiceResult::Unrecognized("deferred".to_string())
    );

    let bare = &records[3];
    assert_eq!(bare.id, 1004);
    assert!(bare.start_date.is_none());
    assert!(bare.division_owner.is_none());
    assert_eq!(bare.result, ServiceResult::Unknown);
}

#[test]
fn sentinel_wards_survive_the_import() {
    let records = ServiceRecordImporter::from_reader(SAMPLE_EXPORT.as_bytes())
        .expect("well-formed export parses");
    assert_eq!(records[1].ward, Some(66));
    assert_eq!(records[1].result, ServiceResult::Fail);
}

#[test]
fn structurally_broken_csv_raises_an_import_error() {
    // Second row has more cells than the header declares.
    let broken = "Service ID,Result\n1,pass,extra,cells\n";
    let result = ServiceRecordImporter::from_reader(broken.as_bytes());
    assert!(result.is_err());
}
