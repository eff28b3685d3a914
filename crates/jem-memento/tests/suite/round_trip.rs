use jem_memento::{
    encode, parse, HandlePath, LambdaExpression, LambdaMethod, LambdaParameter, LocalVariable,
    Node, RootSegment,
};
use pretty_assertions::assert_eq;

fn source_type() -> HandlePath {
    HandlePath::from_nodes([
        Node::project("P"),
        Node::root("src"),
        Node::package("com.example"),
        Node::compilation_unit("Foo.java"),
        Node::ty("Foo"),
    ])
    .expect("valid path")
}

fn assert_round_trips(path: &HandlePath) {
    let memento = encode(path);
    assert_eq!(parse(&memento).as_ref(), Some(path), "memento: {memento}");
    assert_eq!(parse(&memento).map(|p| encode(&p)), Some(memento));
}

#[test]
fn escaped_project_name() {
    let path = HandlePath::project("P (abc) ~");
    assert_eq!(encode(&path), r"=P \(abc\) \~");
    assert_round_trips(&path);
}

#[test]
fn members_of_a_source_type() {
    let ty = source_type();
    for member in [
        Node::method("bar", ["I", "QString;"]),
        Node::method("baz", Vec::<String>::new()),
        Node::field("count"),
        Node::initializer(2),
        Node::type_parameter("T"),
        Node::annotation("Deprecated"),
        Node::ty("Inner"),
        Node::anonymous().with_occurrence(3),
    ] {
        assert_round_trips(&ty.clone().child(member).unwrap());
    }
}

#[test]
fn compilation_unit_children() {
    let cu = source_type().parent().unwrap();
    assert_round_trips(&cu.clone().child(Node::package_declaration("com.example")).unwrap());
    assert_round_trips(&cu.clone().child(Node::ImportContainer).unwrap());
    assert_round_trips(
        &cu.child(Node::ImportContainer)
            .unwrap()
            .child(Node::import("java.util.List").with_occurrence(2))
            .unwrap(),
    );
}

#[test]
fn binary_and_modular_class_files() {
    let class_file = HandlePath::from_nodes([
        Node::project("P"),
        Node::root("/opt/lib/rt.jar"),
        Node::package("java.lang"),
        Node::class_file("Object.class"),
        Node::ty("Object"),
        Node::method("equals", ["Ljava.lang.Object;"]),
    ])
    .unwrap();
    assert_eq!(
        encode(&class_file),
        r"=P/\/opt\/lib\/rt.jar<java.lang(Object.class[Object~equals~Ljava.lang.Object;"
    );
    assert_round_trips(&class_file);

    let module_info = HandlePath::from_nodes([
        Node::project("P"),
        Node::Root(RootSegment::new("/jdk/lib/jrt-fs.jar").with_module("java.base")),
        Node::package(""),
        Node::ModularClassFile,
        Node::module("java.base"),
    ])
    .unwrap();
    assert_eq!(
        encode(&module_info),
        r"=P/\/jdk\/lib\/jrt-fs.jar`java.base<'`java.base"
    );
    assert_round_trips(&module_info);
}

#[test]
fn classpath_attributes_keep_their_order() {
    let root = RootSegment::new("lib/a.jar")
        .with_attribute("javadoc_location", "file:/docs")
        .with_attribute("test", "true");
    let path = HandlePath::project("P")
        .child(Node::Root(root))
        .unwrap()
        .child(Node::package("a"))
        .unwrap();
    assert_eq!(
        encode(&path),
        r"=P/lib\/a.jar=/javadoc_location=/file:\/docs=/=/test=/true=/<a"
    );
    assert_round_trips(&path);

    let decoded = parse(&encode(&path)).unwrap();
    let Node::Root(root) = &decoded.nodes()[1] else {
        panic!("expected a root segment");
    };
    let names: Vec<_> = root.attributes.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["javadoc_location", "test"]);
    assert_eq!(root.attribute("test"), Some("true"));
}

#[test]
fn local_variable() {
    let var = LocalVariable {
        name: "var".into(),
        declaration_start: 1,
        declaration_end: 2,
        name_start: 3,
        name_end: 4,
        type_signature: "Z".into(),
        annotated_type_signature: None,
        flags: 0,
        is_parameter: true,
        occurrence: 1,
    };
    let path = source_type()
        .child(Node::method("m", Vec::<String>::new()))
        .unwrap()
        .child(Node::LocalVariable(var))
        .unwrap();
    assert_eq!(encode(&path), "=P/src<com.example{Foo.java[Foo~m@var!1!2!3!4!Z!0!true");
    assert_round_trips(&path);
}

#[test]
fn lambda_with_nested_local_variable() {
    let lambda = LambdaExpression {
        interface_name: "Runnable".into(),
        source_start: 5,
        source_end: 20,
        arrow_position: 8,
        method: LambdaMethod {
            selector: "run".into(),
            parameters: vec![],
            return_type: "V".into(),
        },
    };
    let local = LocalVariable {
        name: "x".into(),
        declaration_start: 10,
        declaration_end: 15,
        name_start: 14,
        name_end: 15,
        type_signature: "I".into(),
        annotated_type_signature: Some("@NonNull I".into()),
        flags: 16,
        is_parameter: false,
        occurrence: 1,
    };
    let path = source_type()
        .child(Node::field("task"))
        .unwrap()
        .child(Node::LambdaExpression(lambda))
        .unwrap()
        .child(Node::LocalVariable(local))
        .unwrap();
    assert_eq!(
        encode(&path),
        "=P/src<com.example{Foo.java[Foo^task)Runnable!5!20!8&run!0\"V@x!10!15!14!15!I!16!false"
    );
    assert_round_trips(&path);
}

#[test]
fn lambda_parameters() {
    let lambda = LambdaExpression {
        interface_name: "BiFunction".into(),
        source_start: 0,
        source_end: 40,
        arrow_position: 12,
        method: LambdaMethod {
            selector: "apply".into(),
            parameters: vec![
                LambdaParameter {
                    type_signature: "QString;".into(),
                    name: "a".into(),
                },
                LambdaParameter {
                    type_signature: "[I".into(),
                    name: "b".into(),
                },
            ],
            return_type: "QObject;".into(),
        },
    };
    let path = source_type()
        .child(Node::initializer(1))
        .unwrap()
        .child(Node::LambdaExpression(lambda))
        .unwrap();
    assert_round_trips(&path);
}

#[test]
fn array_parameter_followed_by_local_type() {
    let path = source_type()
        .child(Node::method("m", ["[Local", "[[I"]))
        .and_then(|p| p.child(Node::ty("Local")))
        .expect("valid path");
    assert_eq!(encode(&path), r"=P/src<com.example{Foo.java[Foo~m~\[Local~\[\[I[Local");
    assert_round_trips(&path);
}

#[test]
fn anonymous_types_and_unnamed_roots() {
    let path = HandlePath::from_nodes([
        Node::project(""),
        Node::root(""),
        Node::package(""),
        Node::compilation_unit("Foo.java"),
        Node::anonymous(),
        Node::anonymous().with_occurrence(2),
    ])
    .expect("valid path");
    assert_round_trips(&path);
}
