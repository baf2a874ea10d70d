use crate::condition::{Condition, OperandSpace};
use crate::context::{GenerationContext, indent};
use log::debug;
use std::fmt::Write;

// cell bodies sit inside `contract { function { unchecked { if {`
const CELL_LEVEL: usize = 3;
const BODY_LEVEL: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellBody {
    /// the origin, a no-op
    Start,
    /// an always-failing guard without a failure id
    Wall,
    /// nested single-arm guards, the innermost one holding the failure
    /// marker
    Chain { guards: Vec<Condition>, failure: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub x: u32,
    pub y: u32,
    pub body: CellBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    pub dim_x: u32,
    pub dim_y: u32,
    /// row-major, `x` outer and `y` inner
    pub cells: Vec<GridCell>,
}

/// Lays out a `dim_x` by `dim_y` grid. Every cell except the origin draws its
/// own chain depth from `[0, max_depth]`; depths below `min_depth` give a
/// wall, anything else a chain of that many guards ending in a fresh failure
/// id.
pub fn build_maze(
    ctx: &mut GenerationContext,
    space: &OperandSpace<'_>,
    dim_x: u32,
    dim_y: u32,
    min_depth: u32,
    max_depth: u32,
) -> Maze {
    let mut cells = Vec::with_capacity(dim_x as usize * dim_y as usize);
    for x in 0..dim_x {
        for y in 0..dim_y {
            let body = if x == 0 && y == 0 {
                CellBody::Start
            } else {
                let depth = ctx.rng.below(max_depth as usize + 1) as u32;
                if depth < min_depth {
                    debug!("cell ({x}, {y}): wall (depth {depth})");
                    CellBody::Wall
                } else {
                    let guards = (0..depth)
                        .map(|_| space.random_condition(&mut ctx.rng))
                        .collect();
                    let failure = ctx.failures.next_id();
                    debug!("cell ({x}, {y}): chain of {depth}, failure {failure}");
                    CellBody::Chain { guards, failure }
                }
            };
            cells.push(GridCell { x, y, body });
        }
    }
    Maze {
        dim_x,
        dim_y,
        cells,
    }
}

impl GridCell {
    /// the value `step` returns after running this cell
    pub fn index(&self, dim_y: u32) -> u64 {
        self.x as u64 * dim_y as u64 + self.y as u64
    }
}

impl CellBody {
    fn render(&self, out: &mut String) {
        match self {
            CellBody::Start => {
                let _ = writeln!(out, "{}// start", indent(BODY_LEVEL));
            }
            CellBody::Wall => {
                let _ = writeln!(out, "{}require(false);  // wall", indent(BODY_LEVEL));
            }
            CellBody::Chain { guards, failure } => {
                for (i, cond) in guards.iter().enumerate() {
                    let _ = writeln!(out, "{}if ({cond}) {{", indent(BODY_LEVEL + i));
                }
                let _ = writeln!(
                    out,
                    "{}emit AssertionFailed(\"{failure}\"); assert(false);  // bug",
                    indent(BODY_LEVEL + guards.len())
                );
                for i in (0..guards.len()).rev() {
                    let _ = writeln!(out, "{}}}", indent(BODY_LEVEL + i));
                }
            }
        }
    }
}

impl Maze {
    pub fn cell(&self, x: u32, y: u32) -> Option<&GridCell> {
        if x >= self.dim_x || y >= self.dim_y {
            return None;
        }
        self.cells.get(x as usize * self.dim_y as usize + y as usize)
    }

    pub fn cell_count(&self) -> u64 {
        self.cells.len() as u64
    }

    pub fn wall_count(&self) -> u32 {
        self.cells
            .iter()
            .filter(|c| c.body == CellBody::Wall)
            .count() as u32
    }

    /// failure ids in generation order
    pub fn leaves(&self) -> Vec<u32> {
        self.cells
            .iter()
            .filter_map(|c| match &c.body {
                CellBody::Chain { failure, .. } => Some(*failure),
                _ => None,
            })
            .collect()
    }

    /// renders the body of the step dispatcher: one coordinate-guarded block
    /// per cell, in generation order
    pub fn render(&self) -> String {
        let mut out = String::new();
        let ind = indent(CELL_LEVEL);
        for cell in &self.cells {
            let _ = writeln!(out, "{ind}if (x == {} && y == {}) {{", cell.x, cell.y);
            cell.body.render(&mut out);
            let _ = writeln!(
                out,
                "{}return {};",
                indent(BODY_LEVEL),
                cell.index(self.dim_y)
            );
            let _ = writeln!(out, "{ind}}}");
        }
        out
    }
}
