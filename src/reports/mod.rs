use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use nestforge::genome::Genome;
use nestforge::geometry::{PieceSet, PolygonOracle};
use nestforge::optimizer::OptimizationResult;
use nestforge::scorer::{bounding_box_area, ViolationReport, Violations};
use nestforge::workspace::Workspace;

pub fn print_placement_table(pieces: &PieceSet, genome: &Genome) {
    let placed = pieces.place(genome.genes());

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#"),
        Cell::new("Piece").add_attribute(Attribute::Bold),
        Cell::new("X"),
        Cell::new("Y"),
        Cell::new("Min X"),
        Cell::new("Min Y"),
        Cell::new("Max X"),
        Cell::new("Max Y"),
    ]);

    for (i, (name, outline)) in pieces.names().iter().zip(&placed).enumerate() {
        let (x, y) = genome.placement(i);
        let b = outline.bounds();
        table.add_row(vec![
            Cell::new(i),
            Cell::new(name),
            Cell::new(format!("{:.1}", x)),
            Cell::new(format!("{:.1}", y)),
            Cell::new(format!("{:.1}", b.min.x)),
            Cell::new(format!("{:.1}", b.min.y)),
            Cell::new(format!("{:.1}", b.max.x)),
            Cell::new(format!("{:.1}", b.max.y)),
        ]);
    }

    for i in 2..=7 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    println!("{}", table);
}

/// Prints overlapping pairs and out-of-bounds pieces; returns the counts.
pub fn print_feasibility(pieces: &PieceSet, workspace: &Workspace, genes: &[f64]) -> Violations {
    let report = ViolationReport::inspect(&pieces.place(genes), workspace, &PolygonOracle);
    let names = pieces.names();

    println!("Overlapping pairs: {}", report.overlapping.len());
    if !report.overlapping.is_empty() {
        let mut table = Table::new();
        table.load_preset(ASCII_FULL);
        table.set_header(vec![Cell::new("Piece A"), Cell::new("Piece B")]);
        for (a, b) in &report.overlapping {
            table.add_row(vec![
                Cell::new(&names[*a]).fg(Color::Red),
                Cell::new(&names[*b]).fg(Color::Red),
            ]);
        }
        println!("{}", table);
    }

    println!("Out of bounds: {}", report.out_of_bounds.len());
    for i in &report.out_of_bounds {
        println!("  - {} exceeds {}", names[*i], workspace);
    }

    let v = report.counts();
    println!("Feasible: {}", if v.is_feasible() { "yes" } else { "no" });
    println!("Bounding box area: {:.2}", bounding_box_area(genes));
    v
}

pub fn print_result(result: &OptimizationResult) {
    println!("\n=== FINAL RESULT ===");
    println!("Generations: {}", result.generations);
    println!("Best index: {}", result.best_index);
    println!("Best fitness: {:.4}", result.fitness);
    println!("Fingerprint: {}", result.fingerprint());
}
