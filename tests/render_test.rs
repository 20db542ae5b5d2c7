use blueprint_eval::graph::{Graph, ResourceGraph, ResourceNode};
use blueprint_eval::render::{render, render_graph, render_to_string};
use pretty_assertions::assert_eq;
use std::io::{self, Write};

/// Adjacency-list graph whose vertices are indices into `labels`.
struct TestGraph {
    labels: Vec<String>,
    edges: Vec<Vec<usize>>,
    roots: Vec<usize>,
}

impl TestGraph {
    fn new(labels: &[&str], edges: &[(usize, usize)], roots: &[usize]) -> Self {
        let mut adjacency = vec![Vec::new(); labels.len()];
        for &(from, to) in edges {
            adjacency[from].push(to);
        }
        Self {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            edges: adjacency,
            roots: roots.to_vec(),
        }
    }
}

impl Graph for TestGraph {
    type Vertex = usize;

    fn roots(&self) -> Vec<usize> {
        self.roots.clone()
    }

    fn type_label(&self, vertex: usize) -> &str {
        &self.labels[vertex]
    }

    fn outs(&self, vertex: usize) -> Vec<usize> {
        self.edges[vertex].clone()
    }
}

#[test]
fn test_empty_roots_render_nothing() {
    let graph = TestGraph::new(&["A", "B"], &[(0, 1)], &[]);
    assert_eq!(render_to_string(&graph, &[]).unwrap(), "");
}

#[test]
fn test_tree_is_rendered_in_edge_order() {
    let graph = TestGraph::new(
        &["app", "db", "net", "disk"],
        &[(0, 1), (0, 2), (1, 3)],
        &[0],
    );

    assert_eq!(
        render_to_string(&graph, &graph.roots()).unwrap(),
        "app:\n\
         \x20   -> db:\n\
         \x20   ->     -> disk:\n\
         \x20   -> net:\n"
    );
}

#[test]
fn test_cycle_terminates_with_marker() {
    let graph = TestGraph::new(&["A", "B", "C"], &[(0, 1), (1, 2), (2, 0)], &[0]);

    assert_eq!(
        render_to_string(&graph, &[0]).unwrap(),
        "A:\n\
         \x20   -> B:\n\
         \x20   ->     -> C:\n\
         \x20   ->     ->     -> A: <cycle...>\n"
    );
}

#[test]
fn test_self_loop() {
    let graph = TestGraph::new(&["A"], &[(0, 0)], &[0]);

    assert_eq!(
        render_to_string(&graph, &[0]).unwrap(),
        "A:\n    -> A: <cycle...>\n"
    );
}

#[test]
fn test_diamond_collapses_second_reach() {
    let graph = TestGraph::new(
        &["A", "B", "C", "D"],
        &[(0, 1), (0, 2), (1, 3), (2, 3)],
        &[0],
    );

    assert_eq!(
        render_to_string(&graph, &[0]).unwrap(),
        "A:\n\
         \x20   -> B:\n\
         \x20   ->     -> D:\n\
         \x20   -> C:\n\
         \x20   ->     -> D: <cycle...>\n"
    );
}

#[test]
fn test_visited_set_spans_all_roots() {
    let graph = TestGraph::new(&["A", "B", "shared"], &[(0, 2), (1, 2)], &[0, 1]);

    assert_eq!(
        render_to_string(&graph, &graph.roots()).unwrap(),
        "A:\n\
         \x20   -> shared:\n\
         B:\n\
         \x20   -> shared: <cycle...>\n"
    );
}

#[test]
fn test_same_label_distinct_vertices() {
    let graph = TestGraph::new(&["vm", "vm"], &[(0, 1)], &[0]);

    assert_eq!(
        render_to_string(&graph, &[0]).unwrap(),
        "vm:\n    -> vm:\n"
    );
}

#[test]
fn test_rendering_is_deterministic() {
    let graph = TestGraph::new(
        &["A", "B", "C", "D", "E"],
        &[(0, 1), (0, 2), (1, 3), (2, 3), (3, 4), (4, 1)],
        &[0, 2],
    );

    let first = render_to_string(&graph, &graph.roots()).unwrap();
    let second = render_to_string(&graph, &graph.roots()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_fresh_visited_set_per_call() {
    let graph = TestGraph::new(&["A", "B"], &[(0, 1)], &[0]);

    let mut out = Vec::new();
    render(&graph, &[0], &mut out).unwrap();
    render(&graph, &[0], &mut out).unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "A:\n    -> B:\nA:\n    -> B:\n");
}

/// Counts lines and remembers the last one without keeping the whole output.
#[derive(Default)]
struct LineCounter {
    lines: usize,
    current: Vec<u8>,
    last: Vec<u8>,
}

impl Write for LineCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for &byte in buf {
            if byte == b'\n' {
                self.lines += 1;
                self.last = std::mem::take(&mut self.current);
            } else {
                self.current.push(byte);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_deep_chain_renders_on_a_small_stack() {
    let depth = 3_000;
    let labels: Vec<String> = (0..depth).map(|i| format!("n{i}")).collect();
    let label_refs: Vec<&str> = labels.iter().map(String::as_str).collect();
    let edges: Vec<(usize, usize)> = (1..depth).map(|i| (i - 1, i)).collect();
    let graph = TestGraph::new(&label_refs, &edges, &[0]);

    // A frame per level would overflow 64 KiB long before the end of the chain.
    let counter = std::thread::Builder::new()
        .stack_size(64 * 1024)
        .spawn(move || {
            let mut counter = LineCounter::default();
            render(&graph, &[0], &mut counter).map(|()| counter)
        })
        .unwrap()
        .join()
        .unwrap()
        .unwrap();

    assert_eq!(counter.lines, depth);
    let last = String::from_utf8(counter.last).unwrap();
    assert!(last.ends_with(&format!("n{}:", depth - 1)));
    assert_eq!(last.matches("-> ").count(), depth - 1);
}

#[test]
fn test_resource_graph_keeps_declaration_order() {
    let mut graph = ResourceGraph::new();
    let app = graph.add_resource(ResourceNode {
        name: "app".to_string(),
        resource_type: "compute:instance".to_string(),
    });
    let net = graph.add_resource(ResourceNode {
        name: "net".to_string(),
        resource_type: "network:vpc".to_string(),
    });
    let disk = graph.add_resource(ResourceNode {
        name: "disk".to_string(),
        resource_type: "storage:volume".to_string(),
    });
    graph.add_dependency(app, net);
    graph.add_dependency(app, disk);
    graph.mark_default_roots();

    assert_eq!(graph.roots(), vec![app]);
    assert_eq!(graph.outs(app), vec![net, disk]);

    let mut out = Vec::new();
    render_graph(&graph, &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "compute:instance:\n\
         \x20   -> network:vpc:\n\
         \x20   -> storage:volume:\n"
    );
}

#[test]
fn test_resource_graph_roots_cover_pure_cycles() {
    let mut graph = ResourceGraph::new();
    let a = graph.add_resource(ResourceNode {
        name: "a".to_string(),
        resource_type: "t:a".to_string(),
    });
    let b = graph.add_resource(ResourceNode {
        name: "b".to_string(),
        resource_type: "t:b".to_string(),
    });
    graph.add_dependency(a, b);
    graph.add_dependency(b, a);
    graph.mark_default_roots();

    assert_eq!(graph.roots(), vec![a]);
    assert_eq!(
        render_to_string(&graph, &graph.roots()).unwrap(),
        "t:a:\n    -> t:b:\n    ->     -> t:a: <cycle...>\n"
    );
}
