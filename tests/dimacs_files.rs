use dpll_sat::sat::dimacs::{parse_file, parse_str};
use dpll_sat::sat::error::{Error, MalformedKind};
use dpll_sat::sat::solver::{SearchResult, SolverOptions, solve};
use dpll_sat::sat::validate::validate;
use std::path::PathBuf;

fn data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

#[test]
fn pigeonhole_is_unsatisfiable() {
    let cnf = parse_file(data("php_3_2.cnf")).unwrap();
    assert_eq!(cnf.num_vars(), 6);
    assert_eq!(cnf.len(), 9);
    assert_eq!(solve(&cnf, SolverOptions::default()), SearchResult::Unsatisfiable);
}

#[test]
fn implication_chain_is_forced() {
    let cnf = parse_file(data("chain_sat.cnf")).unwrap();
    let result = solve(&cnf, SolverOptions::default());
    let model = result.model().unwrap();
    assert_eq!(model.solutions().to_i32s(), vec![1, 2, 3, 4, 5]);
}

#[test]
fn packed_lines_and_end_marker() {
    let cnf = parse_file(data("packed_lines.cnf")).unwrap();
    assert_eq!(cnf.len(), 5);
    assert_eq!(cnf.num_vars(), 4);
    assert_eq!(cnf[3].to_string(), "-1 4 0");
    let result = solve(&cnf, SolverOptions::default());
    assert!(validate(&cnf, result.model().unwrap()));
}

#[test]
fn empty_clause_is_rejected() {
    let err = parse_file(data("empty_clause.cnf")).unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedInput {
            line: 3,
            kind: MalformedKind::EmptyClause
        }
    ));
}

#[test]
fn bad_header_is_rejected() {
    let err = parse_file(data("bad_header.cnf")).unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedInput {
            line: 1,
            kind: MalformedKind::BadHeader(_)
        }
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    assert!(matches!(
        parse_file(data("does_not_exist.cnf")),
        Err(Error::Io(_))
    ));
}

#[test]
fn rendering_parses_back() {
    for name in ["php_3_2.cnf", "chain_sat.cnf", "packed_lines.cnf"] {
        let cnf = parse_file(data(name)).unwrap();
        let again = parse_str(&cnf.to_string()).unwrap();
        assert_eq!(cnf, again, "{name}");
    }
}
