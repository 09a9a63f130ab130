mod common;

use common::CadenceTest;

#[test]
fn test_member_add_and_ls() {
    let test = CadenceTest::initialized();
    let id = test.add_member("Ana", "40");
    assert!(id.starts_with("m-"), "unexpected id: {id}");

    test.run_json(&["member", "add", "Ben", "--role", "Designer", "--hours", "35"]);

    let json = test.run_json(&["member", "ls"]);
    let members = json["members"].as_array().unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[1]["weekly_hours"].as_f64().unwrap(), 35.0);
}

#[test]
fn test_member_rm() {
    let test = CadenceTest::initialized();
    let id = test.add_member("Ana", "40");
    test.run_success(&["member", "rm", &id]);

    let json = test.run_json(&["member", "ls"]);
    assert!(json["members"].as_array().unwrap().is_empty());

    let stderr = test.run_failure(&["member", "rm", &id]);
    assert!(stderr.contains("not found"), "unexpected error: {stderr}");
}

#[test]
fn test_member_add_rejects_negative_hours() {
    let test = CadenceTest::initialized();
    let stderr = test.run_failure(&["member", "add", "Ana", "--hours", "-10"]);
    assert!(stderr.contains("non-negative"), "unexpected error: {stderr}");
}

#[test]
fn test_leave_toggle_and_conflicts() {
    let test = CadenceTest::initialized();
    let ana = test.add_member("Ana", "40");
    let ben = test.add_member("Ben", "40");

    let json = test.run_json(&["leave", &ana, "2024-12-25"]);
    assert_eq!(json["on_leave"].as_bool().unwrap(), true);
    test.run_json(&["leave", &ben, "2024-12-25"]);
    test.run_json(&["leave", &ana, "2024-12-02"]);

    let json = test.run_json(&["conflicts", "--month", "2024-12"]);
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 3);

    let on_christmas: Vec<_> = entries
        .iter()
        .filter(|e| e["date"] == "2024-12-25")
        .collect();
    assert_eq!(on_christmas.len(), 2);
    assert!(on_christmas.iter().all(|e| e["has_conflict"] == true));

    let lone = entries.iter().find(|e| e["date"] == "2024-12-02").unwrap();
    assert_eq!(lone["has_conflict"], false);

    // Toggle back off: the entry disappears.
    let json = test.run_json(&["leave", &ana, "2024-12-25"]);
    assert_eq!(json["on_leave"].as_bool().unwrap(), false);
    let json = test.run_json(&["conflicts", "--month", "2024-12"]);
    let entries = json["entries"].as_array().unwrap();
    assert!(entries.iter().all(|e| e["has_conflict"] == false));
}

#[test]
fn test_leave_rejects_bad_date() {
    let test = CadenceTest::initialized();
    let ana = test.add_member("Ana", "40");
    let stderr = test.run_failure(&["leave", &ana, "next tuesday"]);
    assert!(stderr.contains("invalid date"), "unexpected error: {stderr}");
}
