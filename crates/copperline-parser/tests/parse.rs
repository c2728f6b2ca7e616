use copperline_core::Document;
use copperline_core::board::{BoardShape, LayerKind, PadKind, PadShape};
use copperline_core::schematic::{LabelShape, SchematicItem};
use copperline_core::symbol::{GraphicItem, PinElectrical};
use copperline_parser::error::{LexError, ParseError, SchemaError, StructureError};
use copperline_parser::{ParseOptions, Strictness, parse, parse_with};

#[test]
fn test_minimal_schematic() {
    let source = "(kicad_sch (version 9) (junction (at 10 20)))";

    let document = parse(source).expect("Failed to parse");

    assert_eq!(document.kind_name(), "schematic");
    assert_eq!(document.version(), 9);

    let Document::Schematic(sch) = document else {
        panic!("Expected schematic document");
    };
    assert_eq!(sch.items.len(), 1);
    match &sch.items[0] {
        SchematicItem::Junction(j) => {
            assert_eq!(j.at.x, 10.0);
            assert_eq!(j.at.y, 20.0);
            assert_eq!(j.at.rotation, 0.0);
        }
        _ => panic!("Expected junction item"),
    }
}

#[test]
fn test_realistic_schematic() {
    let source = r#"
        (kicad_sch
          (version 20231120)
          (generator "eeschema")
          (uuid "e63e39d7-6ac0-4ffd-8aa3-1841a4541b55")
          (paper "A4")
          (lib_symbols
            (symbol "Device:R"
              (pin_numbers hide)
              (pin_names (offset 0))
              (in_bom yes)
              (on_board yes)
              (property "Reference" "R" (at 2.032 0 90)
                (effects (font (size 1.27 1.27))))
              (property "Value" "R" (at 0 0 90))
              (symbol "R_0_1"
                (rectangle (start -1.016 -2.54) (end 1.016 2.54)
                  (stroke (width 0.254) (type default))
                  (fill (type none))))
              (symbol "R_1_1"
                (pin passive line (at 0 3.81 270) (length 1.27)
                  (name "~" (effects (font (size 1.27 1.27))))
                  (number "1" (effects (font (size 1.27 1.27)))))
                (pin passive line (at 0 -3.81 90) (length 1.27)
                  (name "~")
                  (number "2")))))
          (wire (pts (xy 127 63.5) (xy 133.35 63.5))
            (stroke (width 0) (type default))
            (uuid "0c8e2a5f-3a62-4e5a-9d8e-12f5f8a0c2ce"))
          (junction (at 133.35 63.5) (diameter 0) (color 0 0 0 0))
          (label "SDA" (at 127 63.5 0)
            (effects (font (size 1.27 1.27)) (justify left bottom)))
          (global_label "+3V3" (shape input) (at 133.35 50.8 90))
          (symbol (lib_id "Device:R") (at 133.35 57.15 0) (unit 1)
            (in_bom yes) (on_board yes)
            (uuid "8f4c2a1e-9f13-40a2-8a53-6a5d0e2b91ac")
            (property "Reference" "R1" (at 135.382 56.134 0))
            (property "Value" "4.7k" (at 135.382 58.166 0))))
    "#;

    let Document::Schematic(sch) = parse(source).expect("Failed to parse") else {
        panic!("Expected schematic document");
    };

    assert_eq!(sch.version, 20231120);
    assert_eq!(sch.generator.as_deref(), Some("eeschema"));
    assert_eq!(sch.paper.as_deref(), Some("A4"));

    // Library symbol with units and pins, reachable from the instance.
    let instance = sch.symbols().next().expect("Expected a placed symbol");
    assert_eq!(instance.lib_id, "Device:R");
    let lib = sch.find_symbol(&instance.lib_id).expect("Unresolved lib_id");
    assert!(lib.pin_numbers_hidden);
    assert_eq!(lib.units.len(), 2);
    let pins: Vec<_> = lib.all_pins().collect();
    assert_eq!(pins.len(), 2);
    assert_eq!(pins[0].electrical, PinElectrical::Passive);
    assert_eq!(pins[0].number.text, "1");
    match &lib.units[0].graphics[0] {
        GraphicItem::Rectangle(rect) => assert_eq!(rect.start.x, -1.016),
        _ => panic!("Expected rectangle graphic"),
    }

    // Items decode in source order.
    assert_eq!(sch.items.len(), 5);
    assert!(matches!(sch.items[0], SchematicItem::Wire(_)));
    assert!(matches!(sch.items[1], SchematicItem::Junction(_)));
    match &sch.items[3] {
        SchematicItem::GlobalLabel(label) => {
            assert_eq!(label.text, "+3V3");
            assert_eq!(label.shape, LabelShape::Input);
            assert_eq!(label.at.rotation, 90.0);
        }
        _ => panic!("Expected global label"),
    }

    // Property lookup on the instance.
    let reference = copperline_core::property::find_property(&instance.properties, "Reference");
    assert_eq!(reference.map(|p| p.value.as_str()), Some("R1"));
}

#[test]
fn test_realistic_board() {
    let source = r#"
        (kicad_pcb
          (version 20240108)
          (generator "pcbnew")
          (layers
            (0 "F.Cu" signal)
            (31 "B.Cu" signal)
            (44 "Edge.Cuts" user))
          (net 0 "")
          (net 1 "GND")
          (net 2 "+3V3")
          (footprint "Resistor_SMD:R_0603_1608Metric"
            (layer "F.Cu")
            (uuid "b06dd682-88e2-4de0-8cb9-0cc7a9f93e9f")
            (at 105.5 62.0 90)
            (property "Reference" "R1" (at 0 -1.43 90))
            (fp_line (start -0.24 -0.47) (end 0.24 -0.47)
              (stroke (width 0.12) (type solid)) (layer "F.SilkS"))
            (fp_text reference "R1" (at 0 -1.43 90) (layer "F.SilkS"))
            (pad "1" smd roundrect (at -0.825 0 90) (size 0.8 0.95)
              (layers "F.Cu" "F.Paste" "F.Mask") (net 1 "GND"))
            (pad "2" smd roundrect (at 0.825 0 90) (size 0.8 0.95)
              (layers "F.Cu" "F.Paste" "F.Mask") (net 2 "+3V3")))
          (segment (start 105.5 61.175) (end 105.5 58.0) (width 0.25)
            (layer "F.Cu") (net 2))
          (via (at 105.5 58.0) (size 0.8) (drill 0.4)
            (layers "F.Cu" "B.Cu") (net 2))
          (gr_rect (start 95 50) (end 120 70)
            (stroke (width 0.05) (type solid)) (layer "Edge.Cuts")))
    "#;

    let Document::Board(board) = parse(source).expect("Failed to parse") else {
        panic!("Expected board document");
    };

    assert_eq!(board.version, 20240108);
    assert_eq!(board.layers.len(), 3);
    assert_eq!(board.layers[2].kind, LayerKind::User);
    assert_eq!(board.find_net(2).expect("Missing net").name, "+3V3");

    let fp = &board.footprints[0];
    assert_eq!(fp.layer, "F.Cu");
    assert_eq!(fp.at.rotation, 90.0);
    assert_eq!(fp.pads.len(), 2);
    assert_eq!(fp.pads[0].kind, PadKind::Smd);
    assert_eq!(fp.pads[0].shape, PadShape::RoundRect);
    let pad = fp.find_pad("2").expect("Missing pad");
    assert_eq!(pad.net.as_ref().map(|n| n.number), Some(2));
    assert_eq!(fp.graphics.len(), 2);
    assert!(matches!(fp.graphics[0].shape, BoardShape::Line { .. }));
    assert!(matches!(fp.graphics[1].shape, BoardShape::Text { .. }));

    assert_eq!(board.segments[0].net, 2);
    assert_eq!(board.vias[0].layers, ["F.Cu", "B.Cu"]);
    match &board.graphics[0].shape {
        BoardShape::Rect { start, end } => {
            assert_eq!(start.x, 95.0);
            assert_eq!(end.y, 70.0);
        }
        _ => panic!("Expected rect graphic"),
    }
}

#[test]
fn test_repeated_children_keep_source_order() {
    let source = r#"
        (kicad_pcb (version 9)
          (footprint "X"
            (pad "3" smd rect (at 0 0) (size 1 1))
            (pad "1" smd rect (at 1 0) (size 1 1))
            (pad "2" smd rect (at 2 0) (size 1 1))))
    "#;

    let Document::Board(board) = parse(source).expect("Failed to parse") else {
        panic!("Expected board document");
    };

    let numbers: Vec<_> = board.footprints[0]
        .pads
        .iter()
        .map(|p| p.number.as_str())
        .collect();
    assert_eq!(numbers, ["3", "1", "2"]);
}

#[test]
fn test_unterminated_group_is_structural_error() {
    let err = parse("(a (b)").expect_err("Expected parse failure");
    assert!(matches!(
        err,
        ParseError::Structure(StructureError::UnterminatedGroup { start: 0 })
    ));
}

#[test]
fn test_lex_error_carries_context() {
    let err = parse("(kicad_sch (version 9) (junction @))").expect_err("Expected parse failure");
    match err {
        ParseError::Lex(LexError::UnexpectedChar { ch, context, .. }) => {
            assert_eq!(ch, '@');
            assert!(context.contains("junction"));
        }
        other => panic!("Expected lex error, got {other:?}"),
    }
}

#[test]
fn test_unknown_root_tag() {
    let err = parse("(kicad_wks (version 9))").expect_err("Expected parse failure");
    match err {
        ParseError::Schema(SchemaError::UnknownTag { tag, .. }) => {
            assert_eq!(tag, "kicad_wks");
        }
        other => panic!("Expected schema error, got {other:?}"),
    }
}

#[test]
fn test_unsupported_symbol_graphic_names_the_tag() {
    let source = r#"
        (kicad_sch (version 9)
          (lib_symbols
            (symbol "X"
              (symbol "X_0_1"
                (spline (pts (xy 0 0) (xy 1 1)))))))
    "#;

    let err = parse(source).expect_err("Expected parse failure");
    match err {
        ParseError::Schema(SchemaError::UnsupportedItem { tag, slot, .. }) => {
            assert_eq!(tag, "spline");
            assert_eq!(slot, "symbol drawing list");
        }
        other => panic!("Expected unsupported-item error, got {other:?}"),
    }
}

#[test]
fn test_strictness_modes() {
    let source = "(kicad_sch (version 9) (sheet_instances (path \"/\")))";

    // Permissive: unknown items are dropped.
    let Document::Schematic(sch) = parse(source).expect("Failed to parse") else {
        panic!("Expected schematic document");
    };
    assert!(sch.items.is_empty());
    assert!(sch.unrecognized.is_empty());

    // Capture: unknown items are kept as raw text.
    let options = ParseOptions {
        strictness: Strictness::Capture,
    };
    let Document::Schematic(sch) = parse_with(source, &options).expect("Failed to parse") else {
        panic!("Expected schematic document");
    };
    assert_eq!(sch.unrecognized, vec![r#"(sheet_instances (path "/"))"#.to_string()]);

    // Strict: unknown items fail the parse.
    let options = ParseOptions {
        strictness: Strictness::Strict,
    };
    let err = parse_with(source, &options).expect_err("Expected parse failure");
    assert!(matches!(
        err,
        ParseError::Schema(SchemaError::UnrecognizedChild { .. })
    ));
}

#[test]
fn test_hex_and_signed_atoms_lex_through() {
    // Hex values decode as numbers; rail names that start with a sign
    // stay atoms even though they begin like a number.
    let source = "(kicad_pcb (version 9) (net 1 \"+3V3\") (net 2 \"VBUS\"))";

    let Document::Board(board) = parse(source).expect("Failed to parse") else {
        panic!("Expected board document");
    };
    assert_eq!(board.find_net(1).expect("Missing net").name, "+3V3");
}
