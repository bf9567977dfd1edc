//! DIMACS graph reader
//!
//! Accepts the ASCII edge format used by the coloring and clique benchmarks:
//!
//! ```text
//! c comment
//! p edge <n> <m>        (also "p col")
//! e <u> <v>             (1-based endpoints)
//! ```

use super::Graph;
use crate::error::{ColoringError, Result};
use log::warn;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Reads a DIMACS graph from a file
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Graph> {
    let file = File::open(path)?;
    read(file)
}

/// Reads a DIMACS graph from any reader
///
/// # Errors
/// Returns `InputFormat` for a missing or malformed problem line, malformed
/// edge lines, or endpoints outside `1..=n`.
pub fn read<R: Read>(reader: R) -> Result<Graph> {
    let mut graph: Option<Graph> = None;
    let mut declared_edges = 0usize;

    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        let mut tokens = line.split_whitespace();
        let Some(tag) = tokens.next() else {
            continue;
        };

        match tag {
            "c" => {}
            "p" => {
                if graph.is_some() {
                    return Err(format_error(line_no, "duplicate problem line"));
                }
                let format = tokens
                    .next()
                    .ok_or_else(|| format_error(line_no, "missing problem format"))?;
                if format != "edge" && format != "col" {
                    return Err(format_error(
                        line_no,
                        &format!("unsupported problem format '{format}'"),
                    ));
                }
                let n = parse_number(tokens.next(), line_no, "vertex count")?;
                declared_edges = parse_number(tokens.next(), line_no, "edge count")?;
                graph = Some(Graph::new(n));
            }
            "e" => {
                let g = graph
                    .as_mut()
                    .ok_or_else(|| format_error(line_no, "edge before problem line"))?;
                let u = parse_number(tokens.next(), line_no, "edge endpoint")?;
                let v = parse_number(tokens.next(), line_no, "edge endpoint")?;
                let n = g.num_vertices();
                if u == 0 || v == 0 || u > n || v > n {
                    return Err(format_error(
                        line_no,
                        &format!("edge ({u}, {v}) is outside 1..={n}"),
                    ));
                }
                if u == v {
                    warn!("line {line_no}: skipping self-loop on vertex {u}");
                    continue;
                }
                g.add_edge(u - 1, v - 1);
            }
            // node weights and other annotations carry no coloring information
            "n" | "x" | "d" | "v" => {}
            other => {
                return Err(format_error(line_no, &format!("unknown line type '{other}'")));
            }
        }
    }

    let graph = graph.ok_or_else(|| format_error(0, "missing problem line"))?;
    if graph.num_edges() != declared_edges {
        // instances commonly list both orientations of every edge
        warn!(
            "problem line declares {} edges, read {} distinct edges",
            declared_edges,
            graph.num_edges()
        );
    }
    Ok(graph)
}

/// Writes `graph` in DIMACS edge format
pub fn write<W: std::io::Write>(graph: &Graph, mut writer: W) -> Result<()> {
    writeln!(writer, "p edge {} {}", graph.num_vertices(), graph.num_edges())?;
    for (u, v) in graph.edges() {
        writeln!(writer, "e {} {}", u + 1, v + 1)?;
    }
    Ok(())
}

fn parse_number(token: Option<&str>, line: usize, what: &str) -> Result<usize> {
    let token = token.ok_or_else(|| format_error(line, &format!("missing {what}")))?;
    token
        .parse()
        .map_err(|_| format_error(line, &format!("invalid {what} '{token}'")))
}

fn format_error(line: usize, message: &str) -> ColoringError {
    ColoringError::InputFormat {
        line,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_edge_format() {
        let text = "c a triangle\np edge 3 3\ne 1 2\ne 2 3\ne 1 3\n";
        let g = read(text.as_bytes()).unwrap();
        assert_eq!(g.num_vertices(), 3);
        assert_eq!(g.num_edges(), 3);
        assert!(g.has_edge(0, 2));
    }

    #[test]
    fn reads_col_format_with_duplicates() {
        let text = "p col 2 2\ne 1 2\ne 2 1\n";
        let g = read(text.as_bytes()).unwrap();
        assert_eq!(g.num_edges(), 1);
    }

    #[test]
    fn rejects_malformed_input() {
        let cases = [
            "e 1 2\n",
            "p edge 2\n",
            "p edge x 1\n",
            "p edge 2 1\ne 1 3\n",
            "p edge 2 1\ne 1\n",
            "p matrix 2 1\n",
            "p edge 2 1\nq 1 2\n",
            "",
        ];
        for text in cases {
            let err = read(text.as_bytes()).unwrap_err();
            assert!(
                matches!(err, ColoringError::InputFormat { .. }),
                "expected format error for {text:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn reports_line_numbers() {
        let text = "c header\np edge 3 1\ne 1 9\n";
        match read(text.as_bytes()) {
            Err(ColoringError::InputFormat { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn write_then_read() {
        let g = Graph::from_edges(4, &[(0, 1), (2, 3), (1, 3)]).unwrap();
        let mut buffer = Vec::new();
        write(&g, &mut buffer).unwrap();
        let back = read(buffer.as_slice()).unwrap();
        assert_eq!(back, g);
    }
}
