use crate::graph::Graph;
use std::collections::HashSet;
use std::io::{self, Write};
use tracing::debug;

pub const INDENT_UNIT: &str = "    -> ";
pub const CYCLE_MARKER: &str = "<cycle...>";

/// Display only. A vertex reached a second time, by any path, prints the
/// cycle marker instead of its children.
pub fn render<G, W>(graph: &G, roots: &[G::Vertex], out: &mut W) -> io::Result<()>
where
    G: Graph + ?Sized,
    W: Write + ?Sized,
{
    let mut shown: HashSet<G::Vertex> = HashSet::new();
    let mut pending: Vec<(G::Vertex, usize)> = Vec::new();

    for &root in roots {
        pending.push((root, 0));

        while let Some((vertex, depth)) = pending.pop() {
            for _ in 0..depth {
                out.write_all(INDENT_UNIT.as_bytes())?;
            }

            let label = graph.type_label(vertex);
            if !shown.insert(vertex) {
                writeln!(out, "{label}: {CYCLE_MARKER}")?;
                continue;
            }
            writeln!(out, "{label}:")?;

            // Reversed so the first edge is popped first.
            let children = graph.outs(vertex);
            pending.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
        }
    }

    debug!("Rendered {} vertices from {} roots", shown.len(), roots.len());
    Ok(())
}

pub fn render_graph<G, W>(graph: &G, out: &mut W) -> io::Result<()>
where
    G: Graph + ?Sized,
    W: Write + ?Sized,
{
    render(graph, &graph.roots(), out)
}

pub fn render_to_string<G>(graph: &G, roots: &[G::Vertex]) -> io::Result<String>
where
    G: Graph + ?Sized,
{
    let mut buf = Vec::new();
    render(graph, roots, &mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
