//! Dependency graph over cells
//!
//! Edges are discovered statically from declared input and output names: an
//! edge runs from cell A to cell B whenever B declares one of A's outputs as
//! an input. Widget ids are valid inputs but are not cells, so they only
//! appear as roots when computing downstream closures.

use crate::cell::Cell;
use crate::error::{Error, Result};
use crate::widget::WidgetStore;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Acyclic dependency graph with a stable topological order
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    cells: Vec<Cell>,
    index: HashMap<String, usize>,
    /// Output name to producing cell
    producers: HashMap<String, usize>,
    /// Input name (widget id or output name) to consuming cells
    consumers: HashMap<String, Vec<usize>>,
    successors: Vec<Vec<usize>>,
    /// Position of each cell in `order`
    rank: Vec<usize>,
    order: Vec<usize>,
}

impl DependencyGraph {
    /// Build the graph for `cells`, resolving inputs against cell outputs
    /// and the widgets registered in `widgets`
    pub fn build(cells: Vec<Cell>, widgets: &WidgetStore) -> Result<Self> {
        let mut index = HashMap::with_capacity(cells.len());
        for (i, cell) in cells.iter().enumerate() {
            if index.insert(cell.id().to_string(), i).is_some() {
                return Err(Error::DuplicateCell(cell.id().to_string()));
            }
        }

        let mut producers: HashMap<String, usize> = HashMap::new();
        for (i, cell) in cells.iter().enumerate() {
            for output in cell.outputs() {
                if widgets.contains(output) {
                    return Err(Error::DuplicateOutput {
                        name: output.clone(),
                        cell: cell.id().to_string(),
                        existing: format!("widget {output}"),
                    });
                }
                if let Some(&existing) = producers.get(output) {
                    return Err(Error::DuplicateOutput {
                        name: output.clone(),
                        cell: cell.id().to_string(),
                        existing: cells[existing].id().to_string(),
                    });
                }
                producers.insert(output.clone(), i);
            }
        }

        let mut consumers: HashMap<String, Vec<usize>> = HashMap::new();
        let mut successors = vec![Vec::new(); cells.len()];
        let mut predecessors = vec![Vec::new(); cells.len()];
        for (i, cell) in cells.iter().enumerate() {
            for input in cell.inputs() {
                match producers.get(input) {
                    Some(&p) => {
                        if !successors[p].contains(&i) {
                            successors[p].push(i);
                            predecessors[i].push(p);
                        }
                    }
                    None if widgets.contains(input) => {}
                    None => {
                        return Err(Error::UnresolvedInput {
                            cell: cell.id().to_string(),
                            input: input.clone(),
                        })
                    }
                }
                let entry = consumers.entry(input.clone()).or_default();
                if !entry.contains(&i) {
                    entry.push(i);
                }
            }
        }

        let order = topological_order(&successors, &predecessors).map_err(|cycle| Error::Cycle {
            cells: cycle.iter().map(|&i| cells[i].id().to_string()).collect(),
        })?;
        let mut rank = vec![0; cells.len()];
        for (pos, &i) in order.iter().enumerate() {
            rank[i] = pos;
        }

        tracing::debug!(cells = cells.len(), "dependency graph built");
        Ok(Self {
            cells,
            index,
            producers,
            consumers,
            successors,
            rank,
            order,
        })
    }

    /// Cells in declaration order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Look up a cell by identifier
    pub fn cell(&self, id: &str) -> Option<&Cell> {
        self.index.get(id).map(|&i| &self.cells[i])
    }

    /// Cells in topological order
    pub fn topological_order(&self) -> impl Iterator<Item = &Cell> {
        self.order.iter().map(|&i| &self.cells[i])
    }

    /// Cell producing the given output
    pub fn producer_of(&self, output: &str) -> Option<&Cell> {
        self.producers.get(output).map(|&i| &self.cells[i])
    }

    /// Cells declaring `name` as an input
    pub fn consumers_of(&self, name: &str) -> impl Iterator<Item = &Cell> {
        self.consumers
            .get(name)
            .into_iter()
            .flatten()
            .map(|&i| &self.cells[i])
    }

    /// Cells that directly consume an output of `id`
    pub fn dependents_of(&self, id: &str) -> impl Iterator<Item = &Cell> {
        self.index
            .get(id)
            .into_iter()
            .flat_map(|&i| self.successors[i].iter())
            .map(|&i| &self.cells[i])
    }

    /// Every declared output, in declaration order
    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.cells
            .iter()
            .flat_map(|c| c.outputs().iter().map(String::as_str))
    }

    /// Check whether an output is declared by some cell
    pub fn has_output(&self, name: &str) -> bool {
        self.producers.contains_key(name)
    }

    /// Cells transitively dependent on any of `names`, in topological order
    ///
    /// Names may be widget ids or output names. The producer of a dirty
    /// output is not part of the closure, only its consumers are.
    pub fn downstream<'a, I>(&self, names: I) -> Vec<&Cell>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.closure_indices(names)
            .into_iter()
            .map(|i| &self.cells[i])
            .collect()
    }

    pub(crate) fn closure_indices<'a, I>(&self, names: I) -> Vec<usize>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let mut stack: Vec<usize> = names
            .into_iter()
            .filter_map(|n| self.consumers.get(n))
            .flatten()
            .copied()
            .collect();
        while let Some(i) = stack.pop() {
            if seen.insert(i) {
                stack.extend(self.successors[i].iter().copied());
            }
        }
        let mut closure: Vec<usize> = seen.into_iter().collect();
        closure.sort_by_key(|&i| self.rank[i]);
        closure
    }

    pub(crate) fn order_indices(&self) -> &[usize] {
        &self.order
    }

    pub(crate) fn producer_index(&self, output: &str) -> Option<usize> {
        self.producers.get(output).copied()
    }

    pub(crate) fn cell_at(&self, i: usize) -> &Cell {
        &self.cells[i]
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the graph has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Kahn's algorithm with the ready set ordered by declaration index
///
/// On failure returns the cells of one cycle, first cell repeated at the end.
fn topological_order(
    successors: &[Vec<usize>],
    predecessors: &[Vec<usize>],
) -> std::result::Result<Vec<usize>, Vec<usize>> {
    let n = successors.len();
    let mut indegree: Vec<usize> = predecessors.iter().map(Vec::len).collect();
    let mut ready: BTreeSet<usize> = (0..n).filter(|&i| indegree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);

    while let Some(i) = ready.pop_first() {
        order.push(i);
        for &s in &successors[i] {
            indegree[s] -= 1;
            if indegree[s] == 0 {
                ready.insert(s);
            }
        }
    }

    if order.len() == n {
        return Ok(order);
    }

    // Every unordered cell still has an unordered predecessor, so walking
    // predecessors from any of them must revisit a cell.
    let remaining: HashSet<usize> = (0..n).filter(|&i| indegree[i] > 0).collect();
    let start = (0..n).find(|i| remaining.contains(i)).unwrap_or(0);
    let mut path = vec![start];
    let mut current = start;
    loop {
        let Some(&prev) = predecessors[current].iter().find(|&&p| remaining.contains(&p)) else {
            return Err(path);
        };
        if let Some(pos) = path.iter().position(|&p| p == prev) {
            let mut cycle: Vec<usize> = path[pos..].to_vec();
            cycle.reverse();
            cycle.push(cycle[0]);
            return Err(cycle);
        }
        path.push(prev);
        current = prev;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use crate::widget::{Widget, WidgetDomain};

    fn passthrough(id: &str, inputs: &[&str], outputs: &[&str]) -> Cell {
        let n = outputs.len();
        Cell::new(
            id,
            inputs.iter().map(|s| s.to_string()),
            outputs.iter().map(|s| s.to_string()),
            move |_| Ok(vec![Value::Bool(true); n]),
        )
    }

    fn widgets() -> WidgetStore {
        let mut store = WidgetStore::new();
        store
            .register(Widget::new("w", "w", WidgetDomain::int_slider(0, 10), 1).unwrap())
            .unwrap();
        store
    }

    fn ids<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> Vec<&'a str> {
        cells.into_iter().map(Cell::id).collect()
    }

    #[test]
    fn test_topological_order_respects_edges() {
        let cells = vec![
            passthrough("c", &["b_out"], &["c_out"]),
            passthrough("a", &["w"], &["a_out"]),
            passthrough("b", &["a_out"], &["b_out"]),
        ];
        let graph = DependencyGraph::build(cells, &widgets()).unwrap();
        assert_eq!(ids(graph.topological_order()), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ties_broken_by_declaration_order() {
        let cells = vec![
            passthrough("z", &[], &["z_out"]),
            passthrough("y", &["w"], &["y_out"]),
            passthrough("x", &[], &["x_out"]),
        ];
        let graph = DependencyGraph::build(cells, &widgets()).unwrap();
        assert_eq!(ids(graph.topological_order()), vec!["z", "y", "x"]);
    }

    #[test]
    fn test_two_cell_cycle() {
        let cells = vec![
            passthrough("a", &["b_out"], &["a_out"]),
            passthrough("b", &["a_out"], &["b_out"]),
        ];
        let err = DependencyGraph::build(cells, &widgets()).unwrap_err();
        match err {
            Error::Cycle { cells } => {
                assert_eq!(cells.len(), 3);
                assert_eq!(cells.first(), cells.last());
                assert!(cells.contains(&"a".to_string()));
                assert!(cells.contains(&"b".to_string()));
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_cycle_reported_downstream_cells_excluded() {
        let cells = vec![
            passthrough("tail", &["b_out"], &["t_out"]),
            passthrough("a", &["b_out", "w"], &["a_out"]),
            passthrough("b", &["a_out"], &["b_out"]),
        ];
        let err = DependencyGraph::build(cells, &widgets()).unwrap_err();
        let Error::Cycle { cells } = err else {
            panic!("expected cycle");
        };
        assert!(!cells.contains(&"tail".to_string()));
        assert_eq!(cells, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_self_cycle() {
        let cells = vec![passthrough("loop", &["x"], &["x"])];
        assert_eq!(
            DependencyGraph::build(cells, &widgets()).unwrap_err(),
            Error::Cycle {
                cells: vec!["loop".to_string(), "loop".to_string()]
            }
        );
    }

    #[test]
    fn test_unresolved_input() {
        let cells = vec![passthrough("a", &["nowhere"], &["a_out"])];
        assert_eq!(
            DependencyGraph::build(cells, &widgets()).unwrap_err(),
            Error::UnresolvedInput {
                cell: "a".to_string(),
                input: "nowhere".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_outputs_and_cells() {
        let cells = vec![
            passthrough("a", &[], &["out"]),
            passthrough("b", &[], &["out"]),
        ];
        assert!(matches!(
            DependencyGraph::build(cells, &widgets()),
            Err(Error::DuplicateOutput { .. })
        ));

        let cells = vec![passthrough("a", &[], &["w"])];
        assert!(matches!(
            DependencyGraph::build(cells, &widgets()),
            Err(Error::DuplicateOutput { .. })
        ));

        let cells = vec![passthrough("a", &[], &["x"]), passthrough("a", &[], &["y"])];
        assert_eq!(
            DependencyGraph::build(cells, &widgets()).unwrap_err(),
            Error::DuplicateCell("a".to_string())
        );
    }

    #[test]
    fn test_downstream_closure() {
        let cells = vec![
            passthrough("a", &["w"], &["a_out"]),
            passthrough("b", &["a_out"], &["b_out"]),
            passthrough("c", &[], &["c_out"]),
            passthrough("d", &["c_out", "b_out"], &["d_out"]),
        ];
        let graph = DependencyGraph::build(cells, &widgets()).unwrap();
        assert_eq!(ids(graph.downstream(["w"])), vec!["a", "b", "d"]);
        assert_eq!(ids(graph.downstream(["c_out"])), vec!["d"]);
        assert!(graph.downstream(["d_out"]).is_empty());
        assert_eq!(ids(graph.consumers_of("a_out")), vec!["b"]);
        assert_eq!(ids(graph.dependents_of("c")), vec!["d"]);
        assert_eq!(graph.producer_of("b_out").map(Cell::id), Some("b"));
    }
}
