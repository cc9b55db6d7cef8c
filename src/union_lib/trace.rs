// src/union_lib/trace.rs

use std::collections::HashMap;
use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::geometry::Point2;
use crate::union_lib::classify::BoundaryEdge;

fn direction_angle(vertices: &[Point2], from: usize, to: usize) -> f64 {
    let d = vertices[to].to_vec() - vertices[from].to_vec();
    d.y.atan2(d.x)
}

/// Walks the boundary edges into closed vertex cycles. At every vertex the walk
/// continues with the first outgoing edge found turning clockwise from the
/// reversed incoming edge, which keeps the covered side on the left and closes
/// each face as tightly as possible.
pub fn trace_rings(vertices: &[Point2], edges: &[BoundaryEdge]) -> Result<Vec<Vec<usize>>> {
    let angles: Vec<f64> = edges
        .iter()
        .map(|e| direction_angle(vertices, e.from, e.to))
        .collect();

    let mut outgoing: HashMap<usize, Vec<usize>> = HashMap::new();
    for (k, edge) in edges.iter().enumerate() {
        outgoing.entry(edge.from).or_default().push(k);
    }

    let next_edge = |incoming: usize| -> Result<usize> {
        let vertex = edges[incoming].to;
        let back = angles[incoming] + std::f64::consts::PI;
        let candidates = outgoing.get(&vertex).ok_or_else(|| {
            GeometryError::consistency(format!(
                "dangling boundary edge ends at ({}, {})",
                vertices[vertex].x, vertices[vertex].y
            ))
        })?;
        candidates
            .iter()
            .copied()
            .filter(|&k| edges[k].to != edges[incoming].from)
            .min_by(|&a, &b| {
                let turn_a = (back - angles[a]).rem_euclid(TAU);
                let turn_b = (back - angles[b]).rem_euclid(TAU);
                turn_a.total_cmp(&turn_b)
            })
            .ok_or_else(|| {
                GeometryError::consistency(format!(
                    "boundary doubles back at ({}, {})",
                    vertices[vertex].x, vertices[vertex].y
                ))
            })
    };

    let mut used = vec![false; edges.len()];
    let mut walks = Vec::new();
    for start in 0..edges.len() {
        if used[start] {
            continue;
        }
        let mut walk = Vec::new();
        let mut current = start;
        loop {
            used[current] = true;
            walk.push(edges[current].from);
            let next = next_edge(current)?;
            if next == start {
                break;
            }
            if used[next] {
                return Err(GeometryError::consistency(format!(
                    "boundary walk from ({}, {}) re-entered a consumed edge",
                    vertices[edges[start].from].x, vertices[edges[start].from].y
                )));
            }
            current = next;
        }
        walks.extend(split_at_repeated_vertices(walk)?);
    }
    log::debug!("traced {} rings from {} boundary edges", walks.len(), edges.len());
    Ok(walks)
}

/// A face walk that passes through a vertex twice (two boundaries pinched at
/// one point) is cut there into separate simple cycles.
fn split_at_repeated_vertices(walk: Vec<usize>) -> Result<Vec<Vec<usize>>> {
    let mut cycles = Vec::new();
    let mut stack: Vec<usize> = Vec::with_capacity(walk.len());
    let mut position: HashMap<usize, usize> = HashMap::new();
    for vertex in walk {
        if let Some(&at) = position.get(&vertex) {
            let cycle = stack.split_off(at);
            for v in &cycle {
                position.remove(v);
            }
            cycles.push(cycle);
        }
        position.insert(vertex, stack.len());
        stack.push(vertex);
    }
    cycles.push(stack);

    if let Some(short) = cycles.iter().find(|c| c.len() < 3) {
        return Err(GeometryError::consistency(format!(
            "traced ring with only {} vertices",
            short.len()
        )));
    }
    Ok(cycles)
}
