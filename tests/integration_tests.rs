use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{init_db_with_settings, rti, setup_test_db};

#[test]
fn test_init_creates_database() {
    let db_path = setup_test_db("cli_init");

    rti()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(std::path::Path::new(&db_path).exists());
}

#[test]
fn test_init_seeds_starter_rosters_once() {
    let db_path = setup_test_db("cli_init_defaults");

    rti()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Movement Room: 5 teachers and 9 class types added"));

    rti()
        .args(["--db", &db_path, "teacher", "list", "movement"])
        .assert()
        .success()
        .stdout(contains("Zeena"))
        .stdout(contains("Vicktoria"))
        .stdout(contains("Tina").not());

    rti()
        .args(["--db", &db_path, "class", "list", "reformer"])
        .assert()
        .success()
        .stdout(contains("Skulpt Vertical: Tower"))
        .stdout(contains("Advanced"));

    // a rename survives a second init
    rti()
        .args(["--db", &db_path, "teacher", "rename", "movement", "Ann", "Anne"])
        .assert()
        .success();
    rti()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("teachers and").not());
    rti()
        .args(["--db", &db_path, "teacher", "list", "movement"])
        .assert()
        .success()
        .stdout(contains("Anne"));

    rti()
        .args([
            "--db", &db_path, "add", "reformer", "Sunday", "7:00 AM", "--class",
            "Strong Start (Beginner)", "--teacher", "Nadeen H",
        ])
        .assert()
        .success();
}

#[test]
fn test_init_without_defaults_starts_empty() {
    let db_path = setup_test_db("cli_init_empty");

    rti()
        .args(["--db", &db_path, "--test", "init", "--no-defaults"])
        .assert()
        .success();

    rti()
        .args(["--db", &db_path, "teacher", "list", "reformer"])
        .assert()
        .success()
        .stdout(contains("No teachers yet"));
}

#[test]
fn test_add_and_show_week() {
    let db_path = setup_test_db("cli_add_show");
    init_db_with_settings(&db_path);

    rti()
        .args([
            "--db", &db_path, "add", "movement", "Monday", "9:00 AM", "--class", "Flow",
            "--teacher", "Ana",
        ])
        .assert()
        .success()
        .stdout(contains("added on Monday at 9:00 AM"));

    rti()
        .args(["--db", &db_path, "show", "m"])
        .assert()
        .success()
        .stdout(contains("Movement Room"))
        .stdout(contains("9:00 AM"))
        .stdout(contains("Flow (Ana) 45m"))
        .stdout(contains("9:15 AM"))
        .stdout(contains("9:45 AM").not())
        .stdout(contains("Reformer Room").not());
}

#[test]
fn test_show_day_details() {
    let db_path = setup_test_db("cli_show_day");
    init_db_with_settings(&db_path);

    rti()
        .args([
            "--db", &db_path, "add", "movement", "wed", "18:30", "--class", "Power",
            "--teacher", "Ben", "--type", "Ladies Only", "--duration", "60",
        ])
        .assert()
        .success();

    rti()
        .args(["--db", &db_path, "show", "movement", "--day", "Wednesday"])
        .assert()
        .success()
        .stdout(contains("6:30 PM"))
        .stdout(contains("Ladies Only"))
        .stdout(contains("Intermediate"))
        .stdout(contains("60 min"));
}

#[test]
fn test_overlap_is_rejected() {
    let db_path = setup_test_db("cli_overlap");
    init_db_with_settings(&db_path);

    rti()
        .args([
            "--db", &db_path, "add", "movement", "Monday", "9:00 AM", "--class", "Flow",
            "--teacher", "Ana", "--duration", "45",
        ])
        .assert()
        .success();

    rti()
        .args([
            "--db", &db_path, "add", "movement", "Monday", "9:30 AM", "--class", "Power",
            "--teacher", "Ben",
        ])
        .assert()
        .failure()
        .stderr(contains("overlap"));

    rti()
        .args([
            "--db", &db_path, "add", "movement", "Monday", "9:45 AM", "--class", "Power",
            "--teacher", "Ben", "--duration", "30",
        ])
        .assert()
        .success();
}

#[test]
fn test_add_rejects_bad_input() {
    let db_path = setup_test_db("cli_bad_input");
    init_db_with_settings(&db_path);

    rti()
        .args([
            "--db", &db_path, "add", "gym", "Monday", "9:00 AM", "--class", "Flow", "--teacher",
            "Ana",
        ])
        .assert()
        .failure()
        .stderr(contains("Invalid room"));

    rti()
        .args([
            "--db", &db_path, "add", "movement", "Someday", "9:00 AM", "--class", "Flow",
            "--teacher", "Ana",
        ])
        .assert()
        .failure()
        .stderr(contains("Invalid day"));

    rti()
        .args([
            "--db", &db_path, "add", "movement", "Monday", "11:00 PM", "--class", "Flow",
            "--teacher", "Ana",
        ])
        .assert()
        .failure()
        .stderr(contains("outside the schedule"));

    rti()
        .args([
            "--db", &db_path, "add", "movement", "Monday", "9:00 AM", "--class", "Flow",
            "--teacher", "Zoe",
        ])
        .assert()
        .failure()
        .stderr(contains("roster"));

    rti()
        .args([
            "--db", &db_path, "add", "movement", "Monday", "9:00 AM", "--class", "Flow",
            "--teacher", "Ana", "--duration", "20",
        ])
        .assert()
        .failure()
        .stderr(contains("multiple of 15"));

    rti()
        .args([
            "--db", &db_path, "add", "movement", "Monday", "9:00 AM", "--class", "Flow",
            "--teacher", "Ana", "--start", "next week",
        ])
        .assert()
        .failure()
        .stderr(contains("Invalid date"));
}

#[test]
fn test_future_class_hidden_unless_all() {
    let db_path = setup_test_db("cli_future");
    init_db_with_settings(&db_path);

    rti()
        .args([
            "--db", &db_path, "add", "movement", "Friday", "7:00 AM", "--class", "Flow",
            "--teacher", "Ana", "--start", "2099-01-01",
        ])
        .assert()
        .success();

    rti()
        .args(["--db", &db_path, "show", "movement"])
        .assert()
        .success()
        .stdout(contains("No classes scheduled"));

    rti()
        .args(["--db", &db_path, "show", "movement", "--all"])
        .assert()
        .success()
        .stdout(contains("Flow (Ana)"));

    // still blocks the slot
    rti()
        .args([
            "--db", &db_path, "add", "movement", "Friday", "7:15 AM", "--class", "Power",
            "--teacher", "Ben",
        ])
        .assert()
        .failure()
        .stderr(contains("overlap"));
}

#[test]
fn test_del_class() {
    let db_path = setup_test_db("cli_del");
    init_db_with_settings(&db_path);

    rti()
        .args([
            "--db", &db_path, "add", "movement", "Monday", "6:00 AM", "--class", "Flow",
            "--teacher", "Ana",
        ])
        .assert()
        .success();

    rti()
        .args(["--db", &db_path, "del", "movement", "Monday", "6:15 AM"])
        .assert()
        .failure()
        .stderr(contains("Not found"));

    rti()
        .args(["--db", &db_path, "del", "movement", "Monday", "6:00 AM"])
        .assert()
        .success()
        .stdout(contains("Removed 'Flow' with Ana"));

    rti()
        .args(["--db", &db_path, "show", "movement"])
        .assert()
        .success()
        .stdout(contains("No classes scheduled"));
}

#[test]
fn test_teacher_rename_propagates() {
    let db_path = setup_test_db("cli_teacher_rename");
    init_db_with_settings(&db_path);

    rti()
        .args([
            "--db", &db_path, "add", "movement", "Tuesday", "8:00 AM", "--class", "Flow",
            "--teacher", "Ana",
        ])
        .assert()
        .success();

    rti()
        .args(["--db", &db_path, "teacher", "rename", "movement", "Ana", "Anna"])
        .assert()
        .success()
        .stdout(contains("1 classes updated"));

    rti()
        .args(["--db", &db_path, "teacher", "list", "movement"])
        .assert()
        .success()
        .stdout(contains("Anna"))
        .stdout(contains("Ben"));

    rti()
        .args(["--db", &db_path, "show", "movement", "--day", "tue"])
        .assert()
        .success()
        .stdout(contains("Anna"));
}

#[test]
fn test_teacher_delete_with_reassign_and_yes() {
    let db_path = setup_test_db("cli_teacher_delete");
    init_db_with_settings(&db_path);

    for (day, teacher) in [("Monday", "Ana"), ("Tuesday", "Ana"), ("Thursday", "Ben")] {
        rti()
            .args([
                "--db", &db_path, "add", "movement", day, "7:00 AM", "--class", "Flow",
                "--teacher", teacher,
            ])
            .assert()
            .success();
    }

    rti()
        .args([
            "--db", &db_path, "teacher", "delete", "movement", "Ana", "--reassign", "Ben",
        ])
        .assert()
        .success()
        .stdout(contains("2 classes reassigned to 'Ben'"));

    rti()
        .args(["--db", &db_path, "teacher", "delete", "movement", "Ben", "--yes"])
        .assert()
        .success()
        .stdout(contains("3 classes removed"));

    rti()
        .args(["--db", &db_path, "teacher", "list", "movement"])
        .assert()
        .success()
        .stdout(contains("No teachers yet"));
}

#[test]
fn test_teacher_delete_cancelled_without_confirmation() {
    let db_path = setup_test_db("cli_teacher_cancel");
    init_db_with_settings(&db_path);

    rti()
        .args([
            "--db", &db_path, "add", "movement", "Monday", "7:00 AM", "--class", "Flow",
            "--teacher", "Ana",
        ])
        .assert()
        .success();

    rti()
        .args(["--db", &db_path, "teacher", "delete", "movement", "Ana"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(contains("Operation cancelled"));

    rti()
        .args(["--db", &db_path, "teacher", "list", "movement"])
        .assert()
        .success()
        .stdout(contains("Ana"));
}

#[test]
fn test_class_type_management() {
    let db_path = setup_test_db("cli_class_types");
    init_db_with_settings(&db_path);

    rti()
        .args(["--db", &db_path, "class", "list", "movement"])
        .assert()
        .success()
        .stdout(contains("Flow"))
        .stdout(contains("Beginner"))
        .stdout(contains("Power"))
        .stdout(contains("Intermediate"));

    rti()
        .args(["--db", &db_path, "class", "add", "movement", "Flow"])
        .assert()
        .failure()
        .stderr(contains("already exists"));

    rti()
        .args([
            "--db", &db_path, "add", "movement", "Saturday", "10:00 AM", "--class", "Power",
            "--teacher", "Ben",
        ])
        .assert()
        .success();

    rti()
        .args(["--db", &db_path, "class", "rename", "movement", "Power", "Power Hour"])
        .assert()
        .success()
        .stdout(contains("1 classes updated"));

    rti()
        .args(["--db", &db_path, "class", "delete", "movement", "Power Hour", "-y"])
        .assert()
        .success()
        .stdout(contains("1 classes removed"));

    rti()
        .args(["--db", &db_path, "class", "list", "movement"])
        .assert()
        .success()
        .stdout(contains("Power").not());
}

#[test]
fn test_rooms_are_independent() {
    let db_path = setup_test_db("cli_rooms");
    init_db_with_settings(&db_path);

    rti()
        .args([
            "--db", &db_path, "add", "reformer", "Monday", "9:00 AM", "--class", "Flow",
            "--teacher", "Ana",
        ])
        .assert()
        .failure()
        .stderr(contains("roster"));

    rti()
        .args(["--db", &db_path, "teacher", "list", "reformer"])
        .assert()
        .success()
        .stdout(contains("No teachers yet"));
}

#[test]
fn test_stats_output() {
    let db_path = setup_test_db("cli_stats");
    init_db_with_settings(&db_path);

    for (day, teacher) in [("Monday", "Ben"), ("Tuesday", "Ben"), ("Monday", "Ana")] {
        let time = if teacher == "Ana" { "6:00 PM" } else { "7:00 AM" };
        rti()
            .args([
                "--db", &db_path, "add", "movement", day, time, "--class", "Flow", "--teacher",
                teacher,
            ])
            .assert()
            .success();
    }

    rti()
        .args(["--db", &db_path, "stats"])
        .assert()
        .success()
        .stdout(contains("whole studio"))
        .stdout(contains("Total classes   : 3"))
        .stdout(contains("Active teachers : 2"))
        .stdout(contains("Movement Room"))
        .stdout(contains("Beginner"));

    rti()
        .args(["--db", &db_path, "stats", "reformer"])
        .assert()
        .success()
        .stdout(contains("Total classes   : 0"));
}

#[test]
fn test_status_reports_local_mode() {
    let db_path = setup_test_db("cli_status");
    init_db_with_settings(&db_path);

    rti()
        .args(["--db", &db_path, "status"])
        .assert()
        .success()
        .stdout(contains("local"))
        .stdout(contains("5:00 AM to 9:00 PM (65 slots)"))
        .stdout(contains("2 teachers, 2 class types, 0 scheduled classes"));
}

#[test]
fn test_sync_requires_remote() {
    let db_path = setup_test_db("cli_sync");
    init_db_with_settings(&db_path);

    rti()
        .args(["--db", &db_path, "sync"])
        .assert()
        .failure()
        .stderr(contains("Remote backend unavailable"));
}

#[test]
fn test_log_print_lists_operations() {
    let db_path = setup_test_db("cli_log");
    init_db_with_settings(&db_path);

    rti()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("init"))
        .stdout(contains("teacher_add"))
        .stdout(contains("class_add"));
}

#[test]
fn test_config_print() {
    rti()
        .args(["config", "--print"])
        .assert()
        .success()
        .stdout(contains("start_hour"))
        .stdout(contains("max_duration"))
        .stdout(contains("use_remote"));
}
