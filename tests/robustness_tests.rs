use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;

#[test]
fn test_malformed_csv_handling() {
    let mut csv = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv, "op, owner, amount, currency, description, reference").unwrap();
    writeln!(csv, "create, u1, , , ,").unwrap();
    // Valid credit
    writeln!(csv, "credit, u1, 1.0, , ,").unwrap();
    // Unknown op
    writeln!(csv, "transfer, u1, 1.0, , ,").unwrap();
    // Not a number
    writeln!(csv, "credit, u1, abc, , ,").unwrap();
    // Missing amount
    writeln!(csv, "credit, u1, , , ,").unwrap();
    // Valid credit again
    writeln!(csv, "credit, u1, 2.0, , ,").unwrap();

    let mut cmd = Command::new(cargo_bin!("wallet-engine"));
    cmd.arg(csv.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading command"))
        .stderr(predicate::str::contains("Error processing command"))
        .stdout(predicate::str::contains("u1,3,USD,2")); // 1.0 + 2.0 = 3.0
}

#[test]
fn test_invalid_amounts_rejected() {
    let mut csv = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv, "op, owner, amount, currency, description, reference").unwrap();
    writeln!(csv, "create, u1, , , ,").unwrap();
    writeln!(csv, "credit, u1, 0, , ,").unwrap();
    writeln!(csv, "credit, u1, -5, , ,").unwrap();
    writeln!(csv, "debit, u1, -1, , ,").unwrap();

    let mut cmd = Command::new(cargo_bin!("wallet-engine"));
    cmd.arg(csv.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Validation error"))
        .stdout(predicate::str::contains("u1,0,USD,0"));
}

#[test]
fn test_commands_for_unknown_owner() {
    let mut csv = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv, "op, owner, amount, currency, description, reference").unwrap();
    writeln!(csv, "credit, ghost, 1.0, , ,").unwrap();
    writeln!(csv, "update, ghost, , EUR, ,").unwrap();
    writeln!(csv, "delete, ghost, , , ,").unwrap();

    let mut cmd = Command::new(cargo_bin!("wallet-engine"));
    cmd.arg(csv.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Wallet not found"))
        .stdout(predicate::eq("owner,balance,currency,entries\n"));
}

#[test]
fn test_duplicate_create_and_update() {
    let mut csv = tempfile::NamedTempFile::new().unwrap();
    writeln!(csv, "op, owner, amount, currency, description, reference").unwrap();
    writeln!(csv, "create, u1, , EUR, ,").unwrap();
    writeln!(csv, "credit, u1, 5, , ,").unwrap();
    writeln!(csv, "create, u1, , GBP, ,").unwrap();
    writeln!(csv, "update, u1, , jpy, ,").unwrap();

    let mut cmd = Command::new(cargo_bin!("wallet-engine"));
    cmd.arg(csv.path());

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("already exists"))
        .stdout(predicate::str::contains("u1,5,JPY,1"));
}
