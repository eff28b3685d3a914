use jem_memento::{
    encode, escape, parse, unescape, HandlePath, LambdaExpression, LambdaMethod, LambdaParameter,
    LocalVariable, MementoTokenizer, Node, NodeKind, PathError, RootSegment,
};
use proptest::prelude::*;

const PROPTEST_CASES: u32 = 256;

fn arb_char() -> impl Strategy<Value = char> {
    // Mostly identifier characters, with every reserved character and a few multi-byte ones
    // mixed in so escaping gets exercised.
    prop_oneof![
        8 => prop::sample::select(vec!['a', 'b', 'X', 'y', '0', '1', '.', '$', ';', ' ']),
        4 => prop::sample::select(vec![
            '=', '/', '<', '{', '(', '\'', '`', '[', '~', '^', '|', '!', '#', '%', '@', ']',
            '}', ')', '&', '"', '\\',
        ]),
        1 => Just('é'),
        1 => Just('中'),
        1 => Just('🦀'),
    ]
}

fn arb_text(min_chars: usize, max_chars: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(arb_char(), min_chars..=max_chars)
        .prop_map(|chars| chars.into_iter().collect())
}

/// Raw material for one segment; which kind it becomes depends on the parent.
#[derive(Debug, Clone)]
struct Step {
    choice: usize,
    name: String,
    text: String,
    number: u32,
    occurrence: u32,
    flag: bool,
}

fn arb_step() -> impl Strategy<Value = Step> {
    (
        any::<usize>(),
        arb_text(0, 6),
        arb_text(0, 6),
        0u32..2000,
        1u32..4,
        any::<bool>(),
    )
        .prop_map(|(choice, name, text, number, occurrence, flag)| Step {
            choice,
            name,
            text,
            number,
            occurrence,
            flag,
        })
}

fn method_parameters(step: &Step) -> Vec<String> {
    [&step.name, &step.text]
        .into_iter()
        .filter(|ty| !ty.is_empty())
        .cloned()
        .collect()
}

/// Builds a node of `kind` from `step`, keeping names possibly empty where that is legal.
fn node_for(kind: NodeKind, step: &Step) -> Node {
    let Step {
        name,
        text,
        number,
        occurrence,
        flag,
        ..
    } = step.clone();
    match kind {
        NodeKind::Project => Node::project(text),
        NodeKind::Root => {
            let mut root = RootSegment::new(text);
            if flag {
                root = root.with_module(name.clone());
            }
            if number % 2 == 0 {
                root = root.with_attribute(name, number.to_string());
            }
            Node::Root(root)
        }
        NodeKind::PackageFragment => Node::package(text),
        NodeKind::CompilationUnit => Node::compilation_unit(name),
        NodeKind::ClassFile => Node::class_file(name),
        NodeKind::ModularClassFile => Node::ModularClassFile,
        NodeKind::Module => Node::module(name),
        NodeKind::Type => Node::ty(text).with_occurrence(occurrence),
        NodeKind::Method => Node::method(name, method_parameters(step)).with_occurrence(occurrence),
        NodeKind::Field => Node::field(name).with_occurrence(occurrence),
        NodeKind::Initializer => Node::initializer(occurrence),
        NodeKind::ImportContainer => Node::ImportContainer,
        NodeKind::ImportDeclaration => Node::import(name).with_occurrence(occurrence),
        NodeKind::PackageDeclaration => Node::package_declaration(name).with_occurrence(occurrence),
        NodeKind::TypeParameter => Node::type_parameter(name).with_occurrence(occurrence),
        NodeKind::Annotation => Node::annotation(name).with_occurrence(occurrence),
        NodeKind::LocalVariable => Node::LocalVariable(LocalVariable {
            name,
            declaration_start: number,
            declaration_end: number + 20,
            name_start: number + 4,
            name_end: number + 5,
            type_signature: text,
            annotated_type_signature: None,
            flags: number % 17,
            is_parameter: flag,
            occurrence,
        }),
        NodeKind::LambdaExpression => {
            let parameters = if flag {
                vec![LambdaParameter {
                    type_signature: text.clone(),
                    name: name.clone(),
                }]
            } else {
                Vec::new()
            };
            Node::LambdaExpression(LambdaExpression {
                interface_name: text.clone(),
                source_start: number,
                source_end: number + 30,
                arrow_position: number + 3,
                method: LambdaMethod {
                    selector: name,
                    parameters,
                    return_type: text,
                },
            })
        }
    }
}

/// Walks the containment table from a project, picking one allowed child kind per step.
///
/// Steps whose payload is illegal for the picked kind are kept as the rejected node, so callers
/// see both accepted and refused pushes.
fn walk(project: &Step, steps: &[Step]) -> (HandlePath, Option<(Node, PathError)>) {
    let mut path = HandlePath::project(project.text.clone());
    for step in steps {
        let children: Vec<NodeKind> = NodeKind::ALL
            .into_iter()
            .filter(|kind| path.kind().can_contain(*kind))
            .collect();
        if children.is_empty() {
            break;
        }
        let node = node_for(children[step.choice % children.len()], step);
        if let Err(err) = path.push(node.clone()) {
            return (path, Some((node, err)));
        }
    }
    (path, None)
}

fn arb_walk() -> impl Strategy<Value = (HandlePath, Option<(Node, PathError)>)> {
    (arb_step(), prop::collection::vec(arb_step(), 0..10))
        .prop_map(|(project, steps)| walk(&project, &steps))
}

fn arb_path() -> impl Strategy<Value = HandlePath> {
    arb_walk().prop_map(|(path, _)| path)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: PROPTEST_CASES, .. ProptestConfig::default() })]

    #[test]
    fn escape_round_trips(text in arb_text(0, 16)) {
        prop_assert_eq!(unescape(&escape(&text)).unwrap(), text);
    }

    #[test]
    fn escaped_text_is_a_single_token(text in arb_text(0, 16)) {
        let memento = format!("={}", escape(&text));
        let tokens: Vec<_> = MementoTokenizer::new(&memento).collect();
        prop_assert_eq!(tokens.len(), 1);
        prop_assert_eq!(tokens[0].unescaped().unwrap(), text);
    }

    #[test]
    fn encoded_paths_decode_to_themselves(path in arb_path()) {
        let memento = encode(&path);
        let decoded = parse(&memento);
        prop_assert_eq!(decoded.as_ref(), Some(&path));
        prop_assert_eq!(decoded.map(|p| encode(&p)), Some(memento));
    }

    #[test]
    fn only_empty_required_names_are_refused((path, refused) in arb_walk()) {
        for node in path.nodes() {
            prop_assert!(!node.kind().requires_name() || node.name() != Some(""), "{:?}", node);
        }
        if let Some((node, err)) = refused {
            match err {
                PathError::EmptyName(kind) => {
                    prop_assert_eq!(kind, node.kind());
                    prop_assert_eq!(node.name(), Some(""));
                }
                other => prop_assert!(false, "unexpected refusal of {:?}: {}", node, other),
            }
        }
    }

    #[test]
    fn decoded_input_re_encodes_to_the_same_path(text in arb_text(0, 32)) {
        if let Some(path) = parse(&text) {
            prop_assert_eq!(parse(&encode(&path)), Some(path));
        }
    }
}
