//! End-to-end extraction tests, from HTML text to rendered outputs.

use modspec::{
    parse::{dialect, Filters},
    parse_document,
    render::{Dot, DotOptions, Summary, Turtle},
    Config, DialectKind, Document, Generator,
};

const BASE_DOCUMENT: &str = r"<html><body>
<p>Introduction</p>
<table>
  <tr><td>Requirements Class</td><td>/req/core/Base</td></tr>
  <tr><td>Name</td><td>Base</td></tr>
  <tr><td>Target Type</td><td>Class</td></tr>
  <tr><td>Requirement</td><td>/req/core/Base/r1</td></tr>
</table>
<table>
  <tr><td>/req/core/Base/r1</td><td>Must   do
      X</td></tr>
</table>
</body></html>";

fn extract(
    html: &str,
    kind: DialectKind,
    namespace: &str,
    filters: &Filters,
) -> modspec::Extraction {
    let document = Document::from_html(html);
    parse_document(&document, dialect(kind), namespace, filters)
}

fn edge_lines(dot: &str) -> Vec<&str> {
    dot.lines().filter(|line| line.contains(" -> ")).collect()
}

#[test]
fn base_class_scenario() {
    let filters = Filters::default();
    let extraction = extract(BASE_DOCUMENT, DialectKind::Oms, "", &filters);
    let registry = &extraction.registry;

    assert_eq!(registry.requirement_classes().count(), 1);
    let class = registry.requirement_class("/req/core/Base").unwrap();
    assert_eq!(class.ref_count, 1);
    assert_eq!(class.name, "Base");
    assert_eq!(class.target_type, "Class");

    assert_eq!(registry.requirements().count(), 1);
    let requirement = registry.requirement("/req/core/Base/r1").unwrap();
    assert_eq!(requirement.ref_count, 2);
    assert_eq!(requirement.description, "Must do X");

    let view = registry.view();
    let classes_only = Dot::new(&view, DotOptions::classes_only()).to_string();
    assert_eq!(classes_only.matches("[label=<<TABLE>").count(), 1);
    assert!(edge_lines(&classes_only).is_empty());

    let full = Dot::new(&view, DotOptions::full()).to_string();
    assert_eq!(
        edge_lines(&full),
        ["      \"/req/core/Base\" -> \"/req/core/Base/r1\";"]
    );
}

#[test]
fn rerendering_is_byte_identical() {
    let filters = Filters::default();
    let extraction = extract(BASE_DOCUMENT, DialectKind::Oms, "", &filters);
    let registry = &extraction.registry;
    let metadata = modspec::domain::Metadata::default();

    let render = || {
        let view = registry.view();
        (
            Dot::new(&view, DotOptions::full()).to_string(),
            Summary::new(registry).to_string(),
            Turtle::new(registry, &metadata).to_string(),
        )
    };

    assert_eq!(render(), render());
    assert_eq!(
        registry.requirement("/req/core/Base/r1").unwrap().ref_count,
        2
    );
}

#[test]
fn namespaced_definitions_share_keys() {
    let html = r"<html><body>
<table>
  <tr><td>Requirements Class</td><td>http://www.opengis.net/spec/OMS/3.0/req/obs-core</td></tr>
  <tr><td>Imports</td><td>http://www.opengis.net/spec/OMS/3.0/req/core</td></tr>
  <tr><td>Dependency</td><td>ISO 19103:2015 Geographic information - Conceptual schema language</td></tr>
  <tr><td>Dependency</td><td>http://www.opengis.net/spec/iso19156/2011</td></tr>
  <tr><td>Requirement</td><td>/req/obs-core/Observation</td></tr>
</table>
<table>
  <tr><td>Requirements Class</td><td>/req/core</td></tr>
  <tr><td>Requirement</td><td>http://www.opengis.net/spec/OMS/3.0/req/core/Base</td></tr>
</table>
<table>
  <tr><td>Conformance Class</td><td>/conf/obs-core</td></tr>
  <tr><td>Requirements</td><td>/req/obs-core</td></tr>
  <tr><td>Test purpose</td><td>Verify</td><td>A.1</td></tr>
</table>
</body></html>";
    let config = Config {
        ignore_dependencies: vec!["ISO 19103.*".to_string()],
        shortenings: vec![modspec::domain::Shortening {
            start: "http://www.opengis.net/spec/".to_string(),
            replace: "ogc:".to_string(),
        }],
        ..Config::default()
    };
    let filters = Filters::from_config(&config).unwrap();

    let extraction = extract(
        html,
        DialectKind::Oms,
        "http://www.opengis.net/spec/OMS/3.0",
        &filters,
    );
    let registry = &extraction.registry;

    let core = registry.requirement_class("/req/core").unwrap();
    assert_eq!(core.ref_count, 2);
    assert_eq!(core.requirements, ["/req/core/Base"]);

    let obs = registry.requirement_class("/req/obs-core").unwrap();
    assert_eq!(obs.dependencies, ["ogc:iso19156/2011"]);
    assert_eq!(extraction.ignored_dependencies.len(), 1);

    // Linked from an obs class, so the imported class joins the obs image.
    assert!(core.in_image.contains(&modspec::Image::Obs));

    let conf = registry.conformance_class("/conf/obs-core").unwrap();
    assert_eq!(conf.requirement.as_deref(), Some("/req/obs-core"));

    let slice = modspec::domain::slice(registry, "/req/obs-core").unwrap();
    assert!(slice.requirements.contains_key("/req/core/Base"));
}

#[test]
fn offset_dialect_document() {
    let html = r"<html><body>
<table>
  <tr><th>Requirements Class</th></tr>
  <tr><th>http://www.opengis.net/spec/sensorthings/2.0/req/datamodel</th></tr>
  <tr><td>Target type</td><td>Data model</td></tr>
  <tr><td>Dependency</td><td>http://www.opengis.net/spec/sensorthings/2.0/req/datamodel/thing</td></tr>
</table>
<table>
  <tr><th>Req 1: Thing</th></tr>
  <tr><td>Each Thing entity SHALL have the mandatory properties.</td></tr>
  <tr><td>/req/datamodel/thing</td></tr>
</table>
<table><tr><th>Entity type</th><th>Thing</th></tr></table>
</body></html>";
    let filters = Filters::default();

    let extraction = extract(
        html,
        DialectKind::Sta,
        "http://www.opengis.net/spec/sensorthings/2.0",
        &filters,
    );
    let registry = &extraction.registry;

    let class = registry.requirement_class("/req/datamodel").unwrap();
    assert_eq!(class.target_type, "Data model");
    assert_eq!(class.requirements, ["/req/datamodel/thing"]);
    assert!(class.dependencies.is_empty());

    let requirement = registry.requirement("/req/datamodel/thing").unwrap();
    assert_eq!(
        requirement.description,
        "Each Thing entity SHALL have the mandatory properties."
    );
    assert_eq!(requirement.ref_count, 2);
}

#[test]
fn generator_writes_outputs_to_target_prefix() {
    let tmp = tempfile::tempdir().unwrap();
    let source = tmp.path().join("spec.html");
    std::fs::write(&source, BASE_DOCUMENT).unwrap();
    let target = tmp.path().join("output/OMSv3/OMSv3");
    let config = Config {
        source,
        target: target.display().to_string(),
        ..Config::default()
    };

    let (_, written) = Generator::new(config).unwrap().run().unwrap();

    let ttl = std::fs::read_to_string(format!("{}.ttl", target.display())).unwrap();
    assert!(ttl.contains("/conf/core/Base/r1> a spec:ConformanceTest,"));
    let class_diagram = format!("{}__req_core_Base.dot", target.display());
    assert!(written.iter().any(|path| path.display().to_string() == class_diagram));
    assert!(std::path::Path::new(&class_diagram).is_file());
}

#[test]
fn ignore_patterns_apply_to_namespaced_definitions() {
    let html = r"<html><body>
<table>
  <tr><td>Requirements Class</td><td>/req/core</td></tr>
  <tr><td>Requirement</td><td>http://www.opengis.net/spec/OMS/3.0/req/skip/r1</td></tr>
  <tr><td>Imports</td><td>http://www.opengis.net/spec/OMS/3.0/req/skip</td></tr>
</table>
<table>
  <tr><td>Requirements Class</td><td>http://www.opengis.net/spec/OMS/3.0/req/skip</td></tr>
  <tr><td>Requirement</td><td>/req/skip/r2</td></tr>
</table>
</body></html>";
    let filters = Filters::new(&["/req/skip.*"], &[], Vec::new()).unwrap();

    let extraction = extract(
        html,
        DialectKind::Oms,
        "http://www.opengis.net/spec/OMS/3.0",
        &filters,
    );
    let registry = &extraction.registry;

    assert_eq!(registry.requirements().count(), 0);
    let classes: Vec<_> = registry
        .requirement_classes()
        .map(|class| class.definition.as_str())
        .collect();
    assert_eq!(classes, ["/req/core"]);
    assert!(registry.requirement_class("/req/core").unwrap().imports.is_empty());
}
