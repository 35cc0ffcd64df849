//! Text circuit diagrams.
//!
//! Drawers push one column per native instruction; the layout pads every
//! column to its widest cell and joins multi-qubit cells with a vertical
//! connector.
//!
//! ```text
//! q0: ──H──@──
//!          │
//! q1: ─────X──
//! ```

use qcat_ir::OperationKind;

/// Characters a diagram is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagramStyle {
    /// Horizontal wire.
    pub wire: char,
    /// Vertical connector between cells of one column.
    pub connector: char,
    /// Wire crossing inside a connector span.
    pub crossing: char,
}

impl DiagramStyle {
    /// Box-drawing characters.
    pub const UNICODE: Self = Self {
        wire: '─',
        connector: '│',
        crossing: '┼',
    };

    /// Plain ASCII.
    pub const ASCII: Self = Self {
        wire: '-',
        connector: '|',
        crossing: '+',
    };
}

impl Default for DiagramStyle {
    fn default() -> Self {
        Self::UNICODE
    }
}

#[derive(Debug, Clone)]
struct Column {
    cells: Vec<(usize, String)>,
    width: usize,
}

impl Column {
    fn cell(&self, row: usize) -> Option<&str> {
        self.cells
            .iter()
            .find(|(r, _)| *r == row)
            .map(|(_, s)| s.as_str())
    }

    fn span(&self) -> Option<(usize, usize)> {
        let rows = self.cells.iter().map(|(r, _)| *r);
        Some((rows.clone().min()?, rows.max()?))
    }
}

/// Column-based text diagram over a fixed set of wires.
#[derive(Debug, Clone)]
pub struct TextDiagram {
    labels: Vec<String>,
    columns: Vec<Column>,
    style: DiagramStyle,
}

impl TextDiagram {
    /// Diagram with one wire per label.
    pub fn new(labels: Vec<String>) -> Self {
        Self {
            labels,
            columns: Vec::new(),
            style: DiagramStyle::default(),
        }
    }

    /// Draw with `style`.
    #[must_use]
    pub fn with_style(mut self, style: DiagramStyle) -> Self {
        self.style = style;
        self
    }

    /// Append a column. Each cell is `(wire, text)`; cells on more than one
    /// wire are joined by a connector. Cells on unknown wires are dropped.
    pub fn push(&mut self, cells: Vec<(usize, String)>) {
        let cells: Vec<_> = cells
            .into_iter()
            .filter(|(row, _)| *row < self.labels.len())
            .collect();
        if cells.is_empty() {
            return;
        }
        let width = cells
            .iter()
            .map(|(_, s)| s.chars().count())
            .max()
            .unwrap_or(1)
            .max(1);
        self.columns.push(Column { cells, width });
    }

    /// Number of columns drawn.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Render to a string, one line per wire with connector lines between.
    pub fn render(&self) -> String {
        let label_width = self
            .labels
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);
        let style = self.style;
        let mut lines = Vec::with_capacity(self.labels.len() * 2);

        for (row, label) in self.labels.iter().enumerate() {
            let mut line = format!("{label:>label_width$}: {}", style.wire);
            for column in &self.columns {
                let inside = column
                    .span()
                    .is_some_and(|(lo, hi)| lo < row && row < hi);
                let text = match column.cell(row) {
                    Some(text) => text.to_string(),
                    None if inside => style.crossing.to_string(),
                    None => String::new(),
                };
                line.push(style.wire);
                line.push_str(&text);
                let pad = column.width + 1 - text.chars().count();
                line.extend(std::iter::repeat_n(style.wire, pad));
            }
            line.push(style.wire);
            lines.push(line);

            if row + 1 < self.labels.len() {
                let mut gap = " ".repeat(label_width + 3);
                let mut any = false;
                for column in &self.columns {
                    let joined = column
                        .span()
                        .is_some_and(|(lo, hi)| lo <= row && row < hi);
                    gap.push(' ');
                    if joined {
                        gap.push(style.connector);
                        any = true;
                    } else {
                        gap.push(' ');
                    }
                    gap.push_str(&" ".repeat(column.width));
                }
                lines.push(if any { gap.trim_end().to_string() } else { String::new() });
            }
        }

        lines.join("\n")
    }
}

/// Number of leading operands of `kind` that are controls.
///
/// `params` are the stored parameters; the multi-controlled kinds carry
/// their control count there.
pub fn leading_controls(kind: OperationKind, params: &[f64]) -> usize {
    use OperationKind as K;
    let stored = |i: usize| params.get(i).map_or(0, |&n| n as usize);
    match kind {
        K::Cx
        | K::Cy
        | K::Cz
        | K::Ch
        | K::Csx
        | K::Crx
        | K::Cry
        | K::Crz
        | K::Cphase
        | K::Cu1
        | K::Cu3
        | K::Cu
        | K::Cswap => 1,
        K::Ccx => 2,
        K::C3x | K::C3sx => 3,
        K::C4x => 4,
        K::Mcx | K::McxGrayCode | K::McxRecursive | K::McxVchain => stored(0),
        K::Mcp => stored(1),
        _ => 0,
    }
}

/// Parameters as `(a, b)` with three decimals, or nothing when empty.
pub fn format_params(params: &[f64]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = params.iter().map(|p| format!("{p:.3}")).collect();
    format!("({})", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_controls() {
        assert_eq!(leading_controls(OperationKind::Cx, &[]), 1);
        assert_eq!(leading_controls(OperationKind::C4x, &[]), 4);
        assert_eq!(leading_controls(OperationKind::Mcx, &[3.0]), 3);
        assert_eq!(leading_controls(OperationKind::Mcp, &[0.5, 2.0]), 2);
        assert_eq!(leading_controls(OperationKind::Rccx, &[]), 0);
        assert_eq!(format_params(&[0.5, -1.0]), "(0.500, -1.000)");
    }

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("q{i}")).collect()
    }

    #[test]
    fn test_single_qubit_column() {
        let mut diagram = TextDiagram::new(labels(1));
        diagram.push(vec![(0, "H".into())]);
        assert_eq!(diagram.render(), "q0: ──H──");
    }

    #[test]
    fn test_connector_between_control_and_target() {
        let mut diagram = TextDiagram::new(labels(3));
        diagram.push(vec![(0, "@".into()), (2, "X".into())]);
        let out = diagram.render();
        let lines: Vec<_> = out.lines().collect();

        assert_eq!(lines[0], "q0: ──@──");
        assert_eq!(lines[1], "      │");
        assert_eq!(lines[2], "q1: ──┼──");
        assert_eq!(lines[4], "q2: ──X──");
    }

    #[test]
    fn test_columns_pad_to_widest_cell() {
        let mut diagram = TextDiagram::new(labels(2)).with_style(DiagramStyle::ASCII);
        diagram.push(vec![(0, "Rz(0.5)".into())]);
        diagram.push(vec![(1, "H".into())]);
        let out = diagram.render();
        let lines: Vec<_> = out.lines().collect();

        assert_eq!(lines[0], "q0: --Rz(0.5)-----");
        assert_eq!(lines[2], "q1: -----------H--");
        assert_eq!(diagram.width(), 2);
    }

    #[test]
    fn test_unknown_wire_dropped() {
        let mut diagram = TextDiagram::new(labels(1));
        diagram.push(vec![(5, "X".into())]);
        assert_eq!(diagram.width(), 0);
        assert_eq!(diagram.render(), "q0: ──");
    }
}
