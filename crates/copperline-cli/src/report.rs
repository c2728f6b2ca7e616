//! Plain-text summary of a decoded document.

use std::fmt::Write;

use copperline_core::{Document, schematic::SchematicItem};

/// Renders a short human-readable summary of the document contents.
pub fn summarize(document: &Document) -> String {
    // Writes to a String cannot fail, so the results are discarded.
    let mut out = String::new();
    let w = &mut out;

    match document {
        Document::Schematic(sch) => {
            let _ = writeln!(w, "schematic (version {})", sch.version);
            if let Some(generator) = &sch.generator {
                let _ = writeln!(w, "  generator: {generator}");
            }
            if let Some(paper) = &sch.paper {
                let _ = writeln!(w, "  paper: {paper}");
            }
            let _ = writeln!(w, "  library symbols: {}", sch.lib_symbols.len());
            for sym in &sch.lib_symbols {
                let _ = writeln!(
                    w,
                    "    {} ({} pins, {} units)",
                    sym.id,
                    sym.all_pins().count(),
                    sym.units.len()
                );
            }
            let counts = ItemCounts::tally(&sch.items);
            let _ = writeln!(w, "  items: {}", sch.items.len());
            counts.write(w);
            for instance in sch.symbols() {
                let resolved = if sch.find_symbol(&instance.lib_id).is_some() {
                    ""
                } else {
                    "  (unresolved)"
                };
                let _ = writeln!(
                    w,
                    "    symbol {} at ({}, {}){resolved}",
                    instance.lib_id, instance.at.x, instance.at.y
                );
            }
            if !sch.unrecognized.is_empty() {
                let _ = writeln!(w, "  unrecognized: {}", sch.unrecognized.len());
            }
        }
        Document::Board(board) => {
            let _ = writeln!(w, "board (version {})", board.version);
            if let Some(generator) = &board.generator {
                let _ = writeln!(w, "  generator: {generator}");
            }
            let _ = writeln!(w, "  layers: {}", board.layers.len());
            let _ = writeln!(w, "  nets: {}", board.nets.len());
            let _ = writeln!(w, "  footprints: {}", board.footprints.len());
            for fp in &board.footprints {
                let _ = writeln!(
                    w,
                    "    {} on {} ({} pads)",
                    fp.lib_id,
                    fp.layer,
                    fp.pads.len()
                );
            }
            let _ = writeln!(w, "  segments: {}", board.segments.len());
            let _ = writeln!(w, "  vias: {}", board.vias.len());
            let _ = writeln!(w, "  graphics: {}", board.graphics.len());
            if !board.unrecognized.is_empty() {
                let _ = writeln!(w, "  unrecognized: {}", board.unrecognized.len());
            }
        }
    }

    out
}

#[derive(Default)]
struct ItemCounts {
    junctions: usize,
    no_connects: usize,
    wires: usize,
    buses: usize,
    polylines: usize,
    texts: usize,
    labels: usize,
    symbols: usize,
}

impl ItemCounts {
    fn tally(items: &[SchematicItem]) -> Self {
        let mut counts = Self::default();
        for item in items {
            match item {
                SchematicItem::Junction(_) => counts.junctions += 1,
                SchematicItem::NoConnect(_) => counts.no_connects += 1,
                SchematicItem::Wire(_) => counts.wires += 1,
                SchematicItem::Bus(_) => counts.buses += 1,
                SchematicItem::Polyline(_) => counts.polylines += 1,
                SchematicItem::Text(_) => counts.texts += 1,
                SchematicItem::Label(_)
                | SchematicItem::GlobalLabel(_)
                | SchematicItem::HierarchicalLabel(_) => counts.labels += 1,
                SchematicItem::Symbol(_) => counts.symbols += 1,
            }
        }
        counts
    }

    fn write(&self, w: &mut String) {
        let rows = [
            ("wires", self.wires),
            ("buses", self.buses),
            ("junctions", self.junctions),
            ("no-connects", self.no_connects),
            ("polylines", self.polylines),
            ("texts", self.texts),
            ("labels", self.labels),
            ("symbols", self.symbols),
        ];
        for (name, count) in rows {
            if count > 0 {
                let _ = writeln!(w, "    {name}: {count}");
            }
        }
    }
}
