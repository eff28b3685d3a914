use jem_memento::{
    decode, encode, parse, Decoder, HandlePath, MementoError, Node, NodeKind, RootResolver,
    RootSegment,
};
use pretty_assertions::assert_eq;

#[test]
fn rejects_input_without_a_project() {
    for memento in ["bogus", "", "<p{X.java", "/src"] {
        assert_eq!(parse(memento), None, "{memento}");
    }
}

#[test]
fn unknown_tail_keeps_the_parsed_prefix() {
    let path = parse("=P/src<p{X.java[X~m%weird").expect("prefix decodes");
    assert_eq!(encode(&path), "=P/src<p{X.java[X~m");
    assert_eq!(path.kind(), NodeKind::Method);
}

#[test]
fn incomplete_segments_are_dropped() {
    assert_eq!(
        parse("=P/src<p{X.java[X~m@v!1!2!3").map(|p| encode(&p)),
        Some("=P/src<p{X.java[X~m".to_owned())
    );
    assert_eq!(
        parse("=P/src<p{X.java[X^f)Runnable!1!2").map(|p| encode(&p)),
        Some("=P/src<p{X.java[X^f".to_owned())
    );
}

#[test]
fn repeated_anonymous_types_are_distinct() {
    let first = parse("=P/src<p{X.java[X|1[").unwrap();
    let second = parse("=P/src<p{X.java[X|1[!2").unwrap();
    assert_ne!(first, second);
    assert_eq!(first.leaf().occurrence(), 1);
    assert_eq!(second.leaf().occurrence(), 2);
    assert_eq!(first.parent(), second.parent());
}

#[test]
fn explicit_first_occurrence_is_canonicalized() {
    let path = parse("=P/src<p{X.java[X^f!1").unwrap();
    assert_eq!(encode(&path), "=P/src<p{X.java[X^f");
}

#[test]
fn zero_occurrence_is_malformed() {
    let decoder = Decoder::new(&Everything, &Everything);
    let err = decoder.try_decode("=P/src<p{X.java[X^f!0").unwrap_err();
    assert!(matches!(err, MementoError::InvalidField { .. }), "{err:?}");
}

#[test]
fn reports_why_a_memento_was_rejected() {
    let decoder = Decoder::new(&Everything, &Everything);
    assert_eq!(
        decoder.try_decode("nope").unwrap_err(),
        MementoError::BogusMemento
    );
    assert_eq!(
        decoder.try_decode(r"=P/src\").unwrap_err(),
        MementoError::DanglingEscape
    );
    assert_eq!(
        decoder.try_decode("=P/src<p{X.java[X|one").unwrap_err(),
        MementoError::InvalidField {
            field: "initializer count",
            value: "one".to_owned()
        }
    );
}

/// Knows only project `P` and its `src` root; every other lookup misses.
struct Workspace;

impl RootResolver for Workspace {
    type Element = String;

    fn project(&self, name: &str) -> Option<String> {
        (name == "P").then(|| name.to_owned())
    }

    fn root(&self, project: &String, root: &RootSegment) -> Option<String> {
        (root.path == "src").then(|| format!("{project}/{}", root.path))
    }
}

fn packages(parent: &String, node: &Node) -> Option<String> {
    match node {
        Node::PackageFragment { name } if name == "p" => Some(format!("{parent}<{name}")),
        _ => None,
    }
}

#[test]
fn missing_elements_decode_as_typed_placeholders() {
    let element = decode("=P/src<p{Gone.java[Gone~run", &Workspace, &packages).unwrap();
    assert!(!element.exists());
    assert_eq!(element.kind(), NodeKind::Method);
    assert_eq!(element.memento(), "=P/src<p{Gone.java[Gone~run");

    let live = decode("=P/src<p", &Workspace, &packages).unwrap();
    assert_eq!(live.live().map(String::as_str), Some("P/src<p"));
}

#[test]
fn missing_project_still_yields_the_full_path() {
    let element = decode("=Q/src<p", &Workspace, &packages).unwrap();
    assert!(!element.exists());
    assert_eq!(element.path(), &parse("=Q/src<p").unwrap());
}

#[test]
fn decoded_elements_compare_by_path() {
    let a = decode("=P/src<p", &Workspace, &packages).unwrap();
    let b = decode("=P/src<p", &Workspace, &packages).unwrap();
    assert_eq!(a, b);
    let expected = HandlePath::from_nodes([
        Node::project("P"),
        Node::root("src"),
        Node::package("p"),
    ])
    .unwrap();
    assert_eq!(a.into_path(), expected);
}

struct Everything;

impl RootResolver for Everything {
    type Element = ();

    fn project(&self, _name: &str) -> Option<()> {
        Some(())
    }

    fn root(&self, _project: &(), _root: &RootSegment) -> Option<()> {
        Some(())
    }
}

impl jem_memento::ChildFactory<()> for Everything {
    fn child(&self, _parent: &(), _node: &Node) -> Option<()> {
        Some(())
    }
}
