//! Reading DIMACS instances and coloring them

use cliquecol_rs::graph::dimacs;
use cliquecol_rs::{ColoringError, Options, Solver};

const MYCIEL3: &str = "c Mycielski graph of C5
p edge 11 20
e 1 2
e 1 4
e 1 7
e 1 9
e 2 3
e 2 6
e 2 8
e 3 5
e 3 7
e 3 10
e 4 5
e 4 6
e 4 10
e 5 8
e 5 9
e 6 11
e 7 11
e 8 11
e 9 11
e 10 11
";

#[test]
fn read_and_color_myciel3() {
    let graph = dimacs::read(MYCIEL3.as_bytes()).unwrap();
    assert_eq!(graph.num_vertices(), 11);
    assert_eq!(graph.num_edges(), 20);

    let options = Options {
        timeout: None,
        ..Options::default()
    };
    let solution = Solver::new(options).solve(&graph).unwrap();
    assert_eq!(solution.lower_bound(), 2);
    assert_eq!(solution.upper_bound(), 4);
    assert!(solution.is_optimal());
}

#[test]
fn both_orientations_count_once() {
    let text = "p col 3 4\ne 1 2\ne 2 1\ne 2 3\ne 3 2\n";
    let graph = dimacs::read(text.as_bytes()).unwrap();
    assert_eq!(graph.num_edges(), 2);
}

#[test]
fn round_trip_through_a_file() {
    let graph = dimacs::read(MYCIEL3.as_bytes()).unwrap();
    let path = std::env::temp_dir().join(format!("cliquecol-dimacs-{}.col", std::process::id()));
    let mut out = Vec::new();
    dimacs::write(&graph, &mut out).unwrap();
    std::fs::write(&path, &out).unwrap();
    let back = dimacs::read_file(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(back.edges().collect::<Vec<_>>(), graph.edges().collect::<Vec<_>>());
}

#[test]
fn missing_file_is_an_io_error() {
    let err = dimacs::read_file("/nonexistent/graph.col").err();
    assert!(matches!(err, Some(ColoringError::Io(_))));
}

fn error_line(text: &str) -> Option<usize> {
    match dimacs::read(text.as_bytes()) {
        Err(ColoringError::InputFormat { line, .. }) => Some(line),
        _ => None,
    }
}

#[test]
fn errors_carry_line_numbers() {
    assert_eq!(error_line("c only comments\n"), Some(0));
    assert_eq!(error_line("c header\ne 1 2\n"), Some(2));
    assert_eq!(error_line("p edge 3 1\n\ne 1 4\n"), Some(3));
    assert_eq!(error_line("p edge 3 1\ne 0 1\n"), Some(2));
    assert_eq!(error_line("p edge x 1\n"), Some(1));
    assert_eq!(error_line("p cnf 3 1\n"), Some(1));
    assert_eq!(error_line("p edge 3 1\np edge 3 1\n"), Some(2));
    assert_eq!(error_line("p edge 3 1\ne 1\n"), Some(2));
    assert_eq!(error_line("p edge 3 1\nq 1 2\n"), Some(2));
}

#[test]
fn self_loops_are_skipped() {
    let graph = dimacs::read("p edge 2 2\ne 1 1\ne 1 2\n".as_bytes()).unwrap();
    assert_eq!(graph.num_edges(), 1);
}
