//! Integration test: the full rule set driven through the analyzer.

use flint_core::{Analyzer, Config, FileReport, Severity};
use flint_rules::{all_rules, find_rules};
use std::path::Path;

fn analyze_with(config: Config, path: &str, source: &str) -> FileReport {
    let analyzer = Analyzer::builder()
        .rules(all_rules(&config))
        .config(config)
        .build()
        .unwrap();
    analyzer.analyze_source(Path::new(path), source).unwrap()
}

fn analyze(path: &str, source: &str) -> FileReport {
    analyze_with(Config::default(), path, source)
}

fn summary(report: &FileReport) -> Vec<String> {
    report
        .diagnostics
        .iter()
        .map(|d| format!("{} {} {}", d.line, d.code, d.title))
        .collect()
}

#[test]
fn implicit_constructor_is_reported_once() {
    let report = analyze("a.h", "#pragma once\nclass AA { AA(int bad); };");
    assert_eq!(report.errors, 1);
    insta::assert_snapshot!(
        summary(&report).join("\n"),
        @"2 FL008 Single - argument constructor 'AA(int bad)' may inadvertently be used as a type conversion constructor."
    );
}

#[test]
fn const_copy_constructor_is_clean() {
    let report = analyze("a.h", "#pragma once\nclass AA { AA(const AA& ok); };");
    assert!(report.diagnostics.is_empty(), "{:?}", summary(&report));
}

#[test]
fn catch_by_value_versus_reference() {
    assert!(analyze("a.cpp", "void f() { try {} catch (Exception &) {} }")
        .diagnostics
        .is_empty());
    let report = analyze("a.cpp", "void f() { try {} catch (Exception e) {} }");
    assert_eq!(
        summary(&report),
        vec!["1 FL009 Symbol e of type Exception caught by value."]
    );
}

#[test]
fn unmatched_endif() {
    let report = analyze("a.cpp", "#ifndef A\n#endif\n#endif\n");
    assert_eq!(summary(&report), vec!["3 FL003 Unmatched #endif."]);
}

#[test]
fn header_with_several_findings() {
    let source = "\
#pragma once
class Widget {
 public:
  Widget(int size);
  virtual void draw();
};
";
    let report = analyze("widget.h", source);
    assert_eq!(
        summary(&report),
        vec![
            "4 FL008 Single - argument constructor 'Widget(int size)' may inadvertently be used as a type conversion constructor.",
            "2 FL023 Base class Widget has virtual functions but a public non-virtual destructor.",
        ]
    );
    assert_eq!((report.errors, report.warnings, report.advice), (1, 1, 0));
}

#[test]
fn c_mode_skips_cpp_only_rules() {
    let config = Config {
        c_mode: true,
        ..Config::default()
    };
    let report = analyze_with(config, "a.h", "#pragma once\nclass AA { AA(int bad); };\nchar* p = NULL;\n");
    assert!(report.diagnostics.is_empty(), "{:?}", summary(&report));
}

#[test]
fn level_gates_rule_tiers() {
    let source = "char* p = NULL;\nvolatile int v;\nchar* t = strtok(s, \",\");\n";
    let codes = |level: Severity| -> Vec<String> {
        let config = Config {
            min_severity: level,
            ..Config::default()
        };
        analyze_with(config, "a.cpp", source)
            .diagnostics
            .iter()
            .map(|d| d.code.clone())
            .collect()
    };
    assert_eq!(codes(Severity::Error), vec!["FL001"]);
    assert_eq!(codes(Severity::Warning), vec!["FL001", "FL017"]);
    assert_eq!(codes(Severity::Advice), vec!["FL001", "FL017", "FL027"]);
}

#[test]
fn rule_configuration_from_toml() {
    let config = Config::parse(
        r#"
[rules.upcase-null]
enabled = false

[rules.blacklisted-sequences]
severity = "error"
"#,
    )
    .unwrap();
    let report = analyze_with(config, "a.cpp", "char* p = NULL;\nvolatile int v;\n");
    assert_eq!(summary(&report), vec!["2 FL017 'volatile' is not thread-safe."]);
    assert_eq!(report.errors, 1);
}

#[test]
fn selected_rules_only() {
    let config = Config::default();
    let analyzer = Analyzer::builder()
        .rules(find_rules(&config, &["memset"]).unwrap())
        .build()
        .unwrap();
    let report = analyzer
        .analyze_source(
            Path::new("a.cpp"),
            "void f() { memset(&x, sizeof(x), 0); char* p = NULL; }",
        )
        .unwrap();
    assert_eq!(
        summary(&report),
        vec!["1 FL004 Did you mean memset(&x, 0, sizeof(x)) ?"]
    );
}
