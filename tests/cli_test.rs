// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! End-to-end tests running the `expense-ledger` binary on fixture files.

use std::process::Command;

fn run(fixture: &str, args: &[&str]) -> (String, String, bool) {
    let path = format!("tests/fixtures/{fixture}");
    let output = Command::new(env!("CARGO_BIN_EXE_expense-ledger"))
        .arg(&path)
        .args(args)
        .env("RUST_LOG", "warn")
        .env_remove("EXPENSE_LEDGER_PARTICIPANTS")
        .output()
        .expect("failed to run binary");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn balances_report() {
    let (stdout, stderr, success) = run("valid.csv", &[]);

    assert!(success);
    assert!(stderr.is_empty());
    assert_eq!(
        stdout,
        "participant,balance\nJuan,50.00\nMaría,-10.00\nPedro,-40.00\n"
    );
}

#[test]
fn settlements_report() {
    let (stdout, _, success) = run("valid.csv", &["--report", "settlements"]);

    assert!(success);
    assert_eq!(
        stdout,
        "from,to,amount\nPedro,Juan,40.00\nMaría,Juan,10.00\n"
    );
}

#[test]
fn summary_report() {
    let (stdout, _, success) = run("valid.csv", &["-r", "summary"]);

    assert!(success);
    assert_eq!(
        stdout,
        "participant,paid,balance\nJuan,90.00,50.00\nMaría,30.00,-10.00\nPedro,0.00,-40.00\n\
         total,average,expenses\n120.00,40.00,2\n"
    );
}

#[test]
fn errors_warn_but_do_not_block() {
    let (stdout, stderr, success) = run("with_errors.csv", &[]);

    assert!(success);
    assert!(stderr.contains("malformed amount"));
    assert!(stderr.contains("finer than one cent"));
    assert!(stderr.contains("has no participants"));

    assert_eq!(
        stdout,
        "participant,balance\nJuan,60.00\nMaría,-30.00\nPedro,-30.00\n"
    );
}

#[test]
fn json_store_settles() {
    let (stdout, _, success) = run("store.json", &["-r", "settlements"]);

    assert!(success);
    assert_eq!(stdout, "from,to,amount\nB,A,30.00\nC,A,30.00\n");
}

#[test]
fn explicit_participants_include_idle_members() {
    let (stdout, _, success) = run("store.json", &["-p", "A,B,C,D"]);

    assert!(success);
    assert_eq!(
        stdout,
        "participant,balance\nA,60.00\nB,-30.00\nC,-30.00\nD,0.00\n"
    );
}

#[test]
fn explicit_participants_skip_strangers() {
    let (stdout, stderr, success) = run("store.json", &["-p", "A", "-p", "B"]);

    assert!(success);
    assert!(stderr.contains("unknown participant C"));
    assert_eq!(stdout, "participant,balance\nA,0.00\nB,0.00\n");
}

#[test]
fn bad_store_records_are_skipped() {
    let (stdout, stderr, success) = run("partial.json", &["-r", "settlements"]);

    assert!(success);
    assert!(stderr.contains("skipping malformed record"));
    assert_eq!(stdout, "from,to,amount\nB,A,30.00\nC,A,30.00\n");
}

#[test]
fn corrupt_store_reads_as_empty() {
    let (stdout, stderr, success) = run("corrupt.json", &[]);

    assert!(success);
    assert!(stderr.contains("treating as empty"));
    assert_eq!(stdout, "participant,balance\n");
}

#[test]
fn missing_file_fails() {
    let (stdout, stderr, success) = run("does_not_exist.csv", &[]);

    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Error opening file"));
}
