use indent_extractor::extractors::{ExtractionMode, ReportExtractor};
use indent_extractor::{parse_report, ExtractionResult, ParserConfig};

const COLUMNAR_RECORD: [&str; 11] = [
    "03/2024", "01", "DistX", "01", "ProjY", "01", "Sector B", "0012345", "Facility Z", "12.5", "7.0",
];

/// A messy export: metadata, decorations, a header row, data in several
/// shapes and a few lines that should be dropped.
fn mixed_document() -> String {
    [
        "Government of Andhra Pradesh",
        "Women Development and Child Welfare Department",
        "=================================================",
        "Sector AWC Murukulu Balamrutham",
        "Kovur   Anganwadi 1   10   20",
        "Kovur   Anganwadi 2   4.6   1.2",
        "Allur,Centre 7 3 3",
        "Buchi\tMain Road Centre\t8\t9",
        "03/2024\t01\tNellore\t02\tKovur\t03\tIndukurpet\t0012345\tPallipadu\t5\t6",
        "Allur Centre 9 -1 2",
        "Page 1 of 2",
        "-----",
        "Kovur   Anganwadi 3   1   0",
    ]
    .join("\n")
}

fn assert_consistent(result: &ExtractionResult) {
    let sum_a: f64 = result.sectors.iter().map(|s| s.total_quantity_a).sum();
    let sum_b: f64 = result.sectors.iter().map(|s| s.total_quantity_b).sum();
    assert_eq!(result.grand_totals.total_quantity_a, sum_a);
    assert_eq!(result.grand_totals.total_quantity_b, sum_b);
    assert_eq!(
        result.grand_totals.total_items,
        result.grand_totals.total_quantity_a + result.grand_totals.total_quantity_b
    );

    for pair in result.sectors.windows(2) {
        assert!(pair[0].sector_name < pair[1].sector_name, "sectors unsorted or duplicated");
    }

    let breakdown_rows: usize = result.sectors.iter().map(|s| s.breakdown.len()).sum();
    assert_eq!(result.row_count, breakdown_rows);

    for sector in &result.sectors {
        for entry in &sector.breakdown {
            assert!(entry.quantity_a.is_finite() && entry.quantity_a >= 0.0);
            assert!(entry.quantity_b.is_finite() && entry.quantity_b >= 0.0);
            assert!(entry.facility_name.trim().chars().count() >= 2);
        }
        assert!(sector.sector_name.trim().chars().count() >= 2);
    }
}

#[test]
fn wide_gap_rows_aggregate_into_one_sector() {
    let result = parse_report("Sector A   Facility X   10   20\nSector A   Facility Y   5   5");
    assert!(result.success);
    assert_eq!(result.sectors.len(), 1);
    assert_eq!(result.sectors[0].sector_name, "Sector A");
    assert_eq!(result.sectors[0].breakdown.len(), 2);
    assert_eq!(result.sectors[0].total_quantity_a, 15.0);
    assert_eq!(result.sectors[0].total_quantity_b, 25.0);
    assert_consistent(&result);
}

#[test]
fn decoration_and_header_only_yield_empty_success() {
    let result = parse_report("-----\nSector AWC Murukulu Balamrutham");
    assert!(result.success);
    assert!(result.sectors.is_empty());
    assert_eq!(result.row_count, 0);
}

#[test]
fn columnar_record_keeps_decimals() {
    let result = parse_report(&COLUMNAR_RECORD.join("\n"));
    assert_eq!(result.row_count, 1);
    let sector = &result.sectors[0];
    assert_eq!(sector.sector_name, "Sector B");
    assert_eq!(sector.breakdown[0].facility_name, "Facility Z");
    assert_eq!(sector.breakdown[0].quantity_a, 12.5);
    assert_eq!(sector.breakdown[0].quantity_b, 7.0);
}

#[test]
fn negative_quantity_contributes_nothing() {
    let result = parse_report("Sector A Facility X -5 10");
    assert!(result.success);
    assert_eq!(result.row_count, 0);
    assert!(result.sectors.is_empty());
}

#[test]
fn mixed_document_uses_every_fallback_strategy() {
    let result = parse_report(&mixed_document());
    assert!(result.success);
    assert_consistent(&result);

    let names: Vec<&str> = result.sectors.iter().map(|s| s.sector_name.as_str()).collect();
    assert_eq!(names, vec!["Allur", "Buchi", "Indukurpet", "Kovur"]);

    let kovur = &result.sectors[3];
    let facilities: Vec<&str> = kovur.breakdown.iter().map(|e| e.facility_name.as_str()).collect();
    assert_eq!(facilities, vec!["Anganwadi 1", "Anganwadi 2", "Anganwadi 3"]);
    // per-line strategies round to whole units
    assert_eq!(kovur.total_quantity_a, 10.0 + 5.0 + 1.0);
    assert_eq!(kovur.total_quantity_b, 20.0 + 1.0 + 0.0);

    assert_eq!(result.sectors[0].breakdown[0].facility_name, "Centre 7");
    assert_eq!(result.sectors[2].breakdown[0].facility_name, "Pallipadu");
    assert_eq!(result.row_count, 6);
}

#[test]
fn columnar_input_with_interleaved_headers() {
    let mut lines = vec!["Department of Women Development", "Month", "District Code", "District Name"];
    lines.extend_from_slice(&COLUMNAR_RECORD);
    // page break in the middle of a record
    lines.extend_from_slice(&COLUMNAR_RECORD[..4]);
    lines.extend_from_slice(&["-----", "Sector Name", "AWC Name"]);
    let mut second = COLUMNAR_RECORD;
    second[6] = "Sector A";
    second[8] = "Facility Q";
    second[9] = "3.25";
    lines.extend_from_slice(&second);
    lines.push("Sector C   Facility W   1   1");

    let extractor = ReportExtractor::new(ParserConfig::default()).unwrap();
    let (result, diagnostics) = extractor.extract_with_diagnostics(&lines.join("\n"));
    assert_eq!(diagnostics.mode, ExtractionMode::Columnar);
    assert_eq!(result.row_count, 2);
    assert_eq!(result.sectors[0].sector_name, "Sector A");
    assert_eq!(result.sectors[0].total_quantity_a, 3.25);
    assert_eq!(result.grand_totals.total_quantity_a, 15.75);
    assert_consistent(&result);
}

#[test]
fn same_text_gives_identical_results() {
    let text = mixed_document();
    let first = serde_json::to_string(&parse_report(&text)).unwrap();
    let second = serde_json::to_string(&parse_report(&text)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn independent_documents_extract_in_parallel() {
    let extractor = ReportExtractor::new(ParserConfig::default()).unwrap();
    let texts = [mixed_document(), COLUMNAR_RECORD.join("\n"), "Sector A   Facility X   10   20".to_string()];
    let expected: Vec<ExtractionResult> = texts.iter().map(|t| extractor.extract(t)).collect();

    let shared = &extractor;
    std::thread::scope(|scope| {
        let handles: Vec<_> = texts
            .iter()
            .map(|t| scope.spawn(move || shared.extract(t)))
            .collect();
        for (handle, want) in handles.into_iter().zip(&expected) {
            assert_eq!(&handle.join().unwrap(), want);
        }
    });
}

#[test]
fn result_serializes_with_wire_names() {
    let json = serde_json::to_value(parse_report("Sector A   Facility X   10   20")).unwrap();
    for key in ["sectors", "grandTotals", "rowCount", "success", "message"] {
        assert!(json.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(json["sectors"][0]["totalQuantityA"], 10.0);
    assert_eq!(json["grandTotals"]["totalItems"], 30.0);
}
