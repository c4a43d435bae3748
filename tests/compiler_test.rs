use laser_gcode::{
    CompileError, Compiler, CompilerSettings, LineChain, ParseOptions, Point2, Unit,
    parse_svg_file,
};
use std::fs;
use std::path::Path;

fn compile_svg(name: &str, settings: CompilerSettings, fill_areas: bool) -> String {
    let artifacts_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/artifacts");
    let drawing = parse_svg_file(artifacts_dir.join(format!("{}.svg", name)), &ParseOptions::default())
        .unwrap_or_else(|_| panic!("Failed to parse {}.svg", name));

    let mut compiler = Compiler::new(settings).expect("valid settings");
    compiler.append_drawing(&drawing, fill_areas);
    compiler.compile().expect("compile")
}

fn run_conversion_test(name: &str) {
    let artifacts_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/artifacts");
    let expected = fs::read_to_string(artifacts_dir.join(format!("{}.gcode", name)))
        .unwrap_or_else(|_| panic!("Failed to read {}.gcode", name));

    let generated = compile_svg(name, CompilerSettings::default(), false);

    // Save generated G-code for debugging
    let temp_dir = artifacts_dir.join("temp");
    let _ = fs::create_dir_all(&temp_dir);
    let _ = fs::write(temp_dir.join(format!("{}.gcode", name)), &generated);

    assert_eq!(generated.trim_end(), expected.trim_end(), "G-code mismatch for {}", name);
}

fn chain(points: &[(f64, f64)]) -> LineChain {
    LineChain::new(points.iter().map(|&(x, y)| Point2::new(x, y)).collect())
}

/// Feed-rate words in order of appearance
fn feed_rates(gcode: &str) -> Vec<&str> {
    gcode
        .split_whitespace()
        .filter(|w| w.starts_with('F'))
        .collect()
}

#[test]
fn test_square() {
    run_conversion_test("square");
}

#[test]
fn test_every_instruction_is_terminated() {
    let gcode = compile_svg("shapes", CompilerSettings::default(), true);
    for line in gcode.lines() {
        assert!(!line.is_empty());
        assert!(line.starts_with("; ") || line.ends_with(';'), "bad line: {}", line);
    }
}

#[test]
fn test_feed_rate_never_repeats() {
    let gcode = compile_svg("shapes", CompilerSettings::default(), true);
    let rates = feed_rates(&gcode);
    assert!(!rates.is_empty());
    for pair in rates.windows(2) {
        assert_ne!(pair[0], pair[1]);
    }
}

#[test]
fn test_drawing_before_cutting() {
    let gcode = compile_svg("shapes", CompilerSettings::default(), false);
    let draw = gcode.find("; Start drawing").expect("drawing section");
    let cut = gcode.find("; Start cutting").expect("cutting section");
    assert!(draw < cut);

    // Drawing power 0.45 of 1000
    assert!(gcode[draw..cut].contains("M4 S450;"));
    assert!(gcode[draw..cut].contains("F900"));
    assert!(gcode[cut..].contains("M4 S1000;"));
    assert!(gcode.ends_with("M5;"));
}

#[test]
fn test_fill_areas_adds_hatching() {
    let plain = compile_svg("shapes", CompilerSettings::default(), false);
    let filled = compile_svg("shapes", CompilerSettings::default(), true);

    // #808080 over a 10 x 10 square with a 2 mm spot: 2 lines per half, 3 diagonals
    let count = |g: &str| g.matches("M4 S1000;").count();
    assert_eq!(count(&filled) - count(&plain), 3);
}

#[test]
fn test_pass_depth_steps_down() {
    let settings = CompilerSettings {
        cutting_passes: 3,
        pass_depth: 1.0,
        ..Default::default()
    };
    let gcode = compile_svg("square", settings, false);

    assert!(gcode.contains("; Pass 3/3"));
    assert_eq!(gcode.matches("G91;\nG1 Z-1.000;\nG90;").count(), 2);
    // No step after the last pass
    let last_pass = gcode.find("; Pass 3/3").unwrap();
    assert!(!gcode[last_pass..].contains("G91;"));
}

#[test]
fn test_zero_pass_depth_keeps_height() {
    let gcode = compile_svg("square", CompilerSettings::default(), false);
    assert!(!gcode.contains("G91;"));
    assert_eq!(gcode.matches("; Pass").count(), 2);
}

#[test]
fn test_negative_pass_depth_uses_magnitude() {
    let settings = CompilerSettings {
        pass_depth: -2.0,
        ..Default::default()
    };
    let compiler = Compiler::new(settings).unwrap();
    assert_eq!(compiler.settings().pass_depth, 2.0);
}

#[test]
fn test_too_many_passes() {
    let settings = CompilerSettings {
        cutting_passes: 6,
        pass_depth: 1.0,
        cutting_z: 5.0,
        ..Default::default()
    };
    let err = Compiler::new(settings).unwrap_err();
    assert!(matches!(err, CompileError::TooManyPasses { passes: 6, .. }));
    assert!(err.to_string().contains("collide"));
}

#[test]
fn test_header_unit_and_initial_z() {
    let settings = CompilerSettings {
        unit: Some(Unit::Millimeters),
        initial_z: 2.0,
        custom_header: Some(vec!["G28;".to_string(), "G92 X0 Y0 Z0;".to_string()]),
        custom_footer: Some(vec!["M5;".to_string(), "G28;".to_string()]),
        ..Default::default()
    };
    let compiler = Compiler::new(settings).unwrap();
    let gcode = compiler.compile().unwrap();
    assert_eq!(
        gcode,
        "G90;\nG28;\nG92 X0 Y0 Z0;\nG21;\nG1 F1000 Z5.000;\nM5;\nG28;"
    );
}

#[test]
fn test_line_chain_output() {
    let mut compiler = Compiler::new(CompilerSettings::default()).unwrap();
    compiler.append_line_chain(&chain(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)]), false);
    let gcode = compiler.compile().unwrap();

    let body: Vec<&str> = gcode.lines().skip_while(|l| *l != "; Start drawing").collect();
    assert_eq!(
        body,
        vec![
            "; Start drawing",
            "M5;",
            "G1 X0.000 Y0.000;",
            "M4 S450;",
            "G1 F900 X5.000 Y0.000;",
            "G1 X5.000 Y5.000;",
            "M5;",
        ]
    );
}

#[test]
fn test_distant_chains_travel_with_laser_off() {
    let mut compiler = Compiler::new(CompilerSettings::default()).unwrap();
    compiler.append_line_chain(&chain(&[(0.0, 0.0), (5.0, 0.0)]), true);
    compiler.append_line_chain(&chain(&[(10.0, 10.0), (15.0, 10.0)]), true);
    let gcode = compiler.compile().unwrap();

    let first_pass: Vec<&str> = gcode
        .lines()
        .skip_while(|l| *l != "; Pass 1/2")
        .take_while(|l| *l != "; Pass 2/2")
        .collect();
    assert_eq!(
        first_pass,
        vec![
            "; Pass 1/2",
            "M5;",
            "G1 X0.000 Y0.000;",
            "M4 S1000;",
            "G1 F500 X5.000 Y0.000;",
            "M5;",
            "G1 F1000 X10.000 Y10.000;",
            "M4 S1000;",
            "G1 F500 X15.000 Y10.000;",
            "M5;",
        ]
    );
}

#[test]
fn test_point_output() {
    let mut compiler = Compiler::new(CompilerSettings::default()).unwrap();
    compiler.append_point(Point2::new(3.0, 4.0));
    let gcode = compiler.compile().unwrap();
    assert!(gcode.contains("; Start drawing\nM5;\nG1 X3.000 Y4.000;\nM4 S450;\nG4 P20;\nM5;"));
    assert!(!gcode.contains("; Start cutting"));
}

#[test]
fn test_compile_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.gcode");

    let mut compiler = Compiler::new(CompilerSettings::default()).unwrap();
    compiler.append_line_chain(&chain(&[(0.0, 0.0), (1.0, 1.0)]), true);
    let lines = compiler.compile_to_file(&path).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written, compiler.compile().unwrap());
    assert_eq!(written.lines().count(), lines);
}
