//! All-different filtering
//!
//! Two filters beyond value elimination:
//! - bounds consistency through Hall intervals over the domain bounds
//! - domain consistency through a maximum matching in the variable/value
//!   graph, keeping only edges that lie in some maximum matching

use super::space::{Conflict, Space};

const NONE: usize = usize::MAX;

/// Removes the value of every assigned variable from the others
///
/// Runs until no new assignment appears.
pub(crate) fn eliminate_values(vars: &[usize], space: &mut Space) -> Result<(), Conflict> {
    let mut done = vec![false; vars.len()];
    loop {
        let mut progress = false;
        for i in 0..vars.len() {
            if done[i] {
                continue;
            }
            let Some(value) = space.domain(vars[i]).value() else {
                continue;
            };
            done[i] = true;
            progress = true;
            for (j, &y) in vars.iter().enumerate() {
                if j != i {
                    space.remove(y, value)?;
                }
            }
        }
        if !progress {
            return Ok(());
        }
    }
}

/// Hall-interval bounds filtering
///
/// For every interval `[a, b]` spanned by a domain minimum and a domain
/// maximum, counts the variables whose bounds lie inside it. More variables
/// than values is a conflict; exactly as many makes the interval a Hall
/// interval and pushes the bounds of every other variable out of it.
pub(crate) fn filter_bounds(vars: &[usize], space: &mut Space) -> Result<(), Conflict> {
    'restart: loop {
        let bounds: Vec<(usize, usize)> = vars
            .iter()
            .map(|&x| {
                let d = space.domain(x);
                (d.min().unwrap_or(0), d.max().unwrap_or(0))
            })
            .collect();

        let mut lows: Vec<usize> = bounds.iter().map(|b| b.0).collect();
        let mut highs: Vec<usize> = bounds.iter().map(|b| b.1).collect();
        lows.sort_unstable();
        lows.dedup();
        highs.sort_unstable();
        highs.dedup();

        for &a in &lows {
            for &b in highs.iter().filter(|&&b| b >= a) {
                let inside = bounds.iter().filter(|&&(lo, hi)| lo >= a && hi <= b).count();
                let width = b - a + 1;
                if inside > width {
                    return Err(Conflict);
                }
                if inside < width {
                    continue;
                }

                let mut changed = false;
                for (i, &(lo, hi)) in bounds.iter().enumerate() {
                    if lo >= a && hi <= b {
                        continue;
                    }
                    if (a..=b).contains(&lo) {
                        changed |= space.restrict_min(vars[i], b + 1)?;
                    }
                    if (a..=b).contains(&hi) {
                        let below = a.checked_sub(1).ok_or(Conflict)?;
                        changed |= space.restrict_max(vars[i], below)?;
                    }
                }
                if changed {
                    continue 'restart;
                }
            }
        }
        return Ok(());
    }
}

/// Matching-based domain filtering
///
/// Finds a maximum matching of variables to values. If it does not cover
/// every variable the constraint is infeasible. Otherwise an edge `x = v`
/// outside the matching survives only if it lies on an alternating cycle
/// (same strongly connected component) or on an even alternating path that
/// starts at a free value.
pub(crate) fn filter_domain(vars: &[usize], space: &mut Space) -> Result<(), Conflict> {
    let m = vars.len();
    if m == 0 {
        return Ok(());
    }
    let k = space.domain(vars[0]).colors();

    let mut var_match = vec![NONE; m];
    let mut value_owner = vec![NONE; k];
    let mut seen = vec![false; k];
    for i in 0..m {
        seen.iter_mut().for_each(|s| *s = false);
        if !augment(i, vars, space, &mut var_match, &mut value_owner, &mut seen) {
            return Err(Conflict);
        }
    }

    // nodes 0..m are variables, m..m+k are values; matched edges point from
    // variable to value, the others from value to variable
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); m + k];
    let mut in_some_domain = vec![false; k];
    for (i, &x) in vars.iter().enumerate() {
        adjacency[i].push(m + var_match[i]);
        for v in space.domain(x).iter() {
            in_some_domain[v] = true;
            if v != var_match[i] {
                adjacency[m + v].push(i);
            }
        }
    }

    let mut reachable = vec![false; m + k];
    let mut frontier: Vec<usize> = (0..k)
        .filter(|&v| in_some_domain[v] && value_owner[v] == NONE)
        .map(|v| m + v)
        .collect();
    for &node in &frontier {
        reachable[node] = true;
    }
    while let Some(node) = frontier.pop() {
        for &next in &adjacency[node] {
            if !reachable[next] {
                reachable[next] = true;
                frontier.push(next);
            }
        }
    }

    let component = strongly_connected_components(&adjacency);

    for (i, &x) in vars.iter().enumerate() {
        let doomed: Vec<usize> = space
            .domain(x)
            .iter()
            .filter(|&v| v != var_match[i])
            .filter(|&v| !reachable[m + v] && component[m + v] != component[i])
            .collect();
        for v in doomed {
            space.remove(x, v)?;
        }
    }
    Ok(())
}

fn augment(
    i: usize,
    vars: &[usize],
    space: &Space,
    var_match: &mut [usize],
    value_owner: &mut [usize],
    seen: &mut [bool],
) -> bool {
    for v in space.domain(vars[i]).iter() {
        if seen[v] {
            continue;
        }
        seen[v] = true;
        let owner = value_owner[v];
        if owner == NONE || augment(owner, vars, space, var_match, value_owner, seen) {
            value_owner[v] = i;
            var_match[i] = v;
            return true;
        }
    }
    false
}

/// Tarjan's algorithm with an explicit call stack; returns a component id
/// per node
fn strongly_connected_components(adjacency: &[Vec<usize>]) -> Vec<usize> {
    let n = adjacency.len();
    let mut index = vec![NONE; n];
    let mut low = vec![0; n];
    let mut on_stack = vec![false; n];
    let mut stack = Vec::new();
    let mut component = vec![NONE; n];
    let mut next_index = 0;
    let mut next_component = 0;

    for start in 0..n {
        if index[start] != NONE {
            continue;
        }
        index[start] = next_index;
        low[start] = next_index;
        next_index += 1;
        stack.push(start);
        on_stack[start] = true;
        let mut calls = vec![(start, 0usize)];

        while let Some(&(v, pos)) = calls.last() {
            if pos < adjacency[v].len() {
                if let Some(top) = calls.last_mut() {
                    top.1 += 1;
                }
                let w = adjacency[v][pos];
                if index[w] == NONE {
                    index[w] = next_index;
                    low[w] = next_index;
                    next_index += 1;
                    stack.push(w);
                    on_stack[w] = true;
                    calls.push((w, 0));
                } else if on_stack[w] {
                    low[v] = low[v].min(index[w]);
                }
                continue;
            }

            calls.pop();
            if let Some(&(parent, _)) = calls.last() {
                low[parent] = low[parent].min(low[v]);
            }
            if low[v] == index[v] {
                while let Some(w) = stack.pop() {
                    on_stack[w] = false;
                    component[w] = next_component;
                    if w == v {
                        break;
                    }
                }
                next_component += 1;
            }
        }
    }
    component
}
