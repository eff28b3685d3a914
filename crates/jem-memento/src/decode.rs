//! Reconstruction of model elements from mementos.
//!
//! Decoding walks the tokens once and asks the caller's [`RootResolver`] and [`ChildFactory`] for
//! the live element behind every segment. A missing live element is not an error: the decoder
//! records a placeholder and keeps descending, so a memento of a deleted method still yields a
//! typed (non-existing) method element.

use std::iter::Peekable;
use std::str::FromStr;

use crate::error::{MementoError, Result};
use crate::node::{
    ClasspathAttribute, LambdaExpression, LambdaMethod, LambdaParameter, LocalVariable, Node,
    NodeKind, RootSegment,
};
use crate::path::HandlePath;
use crate::sigil::Sigil;
use crate::tokenizer::{MementoTokenizer, Token};

const TRACE_TARGET: &str = "jem.memento";

/// Maps the leading project/root segments to live elements.
///
/// Implementations own everything global that root paths may refer to (classpath variables,
/// containers, runtime images); the decoder never consults ambient state.
pub trait RootResolver {
    type Element;

    fn project(&self, name: &str) -> Option<Self::Element>;

    fn root(&self, project: &Self::Element, root: &RootSegment) -> Option<Self::Element>;
}

/// Produces the live child of `parent` described by `node`, or `None` when there is no such
/// child right now.
pub trait ChildFactory<E> {
    fn child(&self, parent: &E, node: &Node) -> Option<E>;
}

impl<E, F> ChildFactory<E> for F
where
    F: Fn(&E, &Node) -> Option<E>,
{
    fn child(&self, parent: &E, node: &Node) -> Option<E> {
        self(parent, node)
    }
}

/// A decoded element: its handle path plus the live element, if one exists.
#[derive(Debug, Clone)]
pub struct Element<E> {
    path: HandlePath,
    live: Option<E>,
}

impl<E> Element<E> {
    pub fn path(&self) -> &HandlePath {
        &self.path
    }

    pub fn kind(&self) -> NodeKind {
        self.path.kind()
    }

    /// `false` for placeholders of elements that have no live counterpart.
    pub fn exists(&self) -> bool {
        self.live.is_some()
    }

    pub fn live(&self) -> Option<&E> {
        self.live.as_ref()
    }

    pub fn into_live(self) -> Option<E> {
        self.live
    }

    pub fn into_path(self) -> HandlePath {
        self.path
    }

    pub fn memento(&self) -> String {
        self.path.memento()
    }
}

impl<E> PartialEq for Element<E> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl<E> Eq for Element<E> {}

impl<E> std::hash::Hash for Element<E> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

/// Decodes `memento`, returning `None` for bogus or malformed input.
pub fn decode<R, F>(memento: &str, resolver: &R, factory: &F) -> Option<Element<R::Element>>
where
    R: RootResolver,
    F: ChildFactory<R::Element>,
{
    Decoder::new(resolver, factory).decode(memento)
}

/// Decodes the structure of `memento` without consulting any model.
pub fn parse(memento: &str) -> Option<HandlePath> {
    decode(memento, &Structural, &Structural).map(Element::into_path)
}

/// Like [`parse`] but reports why a memento was rejected.
pub fn try_parse(memento: &str) -> Result<HandlePath> {
    Decoder::new(&Structural, &Structural)
        .try_decode(memento)
        .map(Element::into_path)
}

/// Treats every segment as present.
struct Structural;

impl RootResolver for Structural {
    type Element = ();

    fn project(&self, _name: &str) -> Option<()> {
        Some(())
    }

    fn root(&self, _project: &(), _root: &RootSegment) -> Option<()> {
        Some(())
    }
}

impl ChildFactory<()> for Structural {
    fn child(&self, _parent: &(), _node: &Node) -> Option<()> {
        Some(())
    }
}

enum State<'m> {
    ExpectRoot,
    ExpectSegment,
    ExpectSubfields(NodeKind, Token<'m>),
    Done,
    Error(MementoError),
}

struct Cursor<E> {
    path: HandlePath,
    live: Option<E>,
}

pub struct Decoder<'a, R, F> {
    resolver: &'a R,
    factory: &'a F,
}

impl<'a, R, F> Decoder<'a, R, F>
where
    R: RootResolver,
    F: ChildFactory<R::Element>,
{
    pub fn new(resolver: &'a R, factory: &'a F) -> Self {
        Self { resolver, factory }
    }

    pub fn decode(&self, memento: &str) -> Option<Element<R::Element>> {
        match self.try_decode(memento) {
            Ok(element) => Some(element),
            Err(err) => {
                tracing::debug!(target: TRACE_TARGET, memento, error = %err, "rejected memento");
                None
            }
        }
    }

    /// Like [`Decoder::decode`] but reports why a memento was rejected.
    pub fn try_decode(&self, memento: &str) -> Result<Element<R::Element>> {
        let mut tokens = MementoTokenizer::new(memento).peekable();
        let mut cursor: Option<Cursor<R::Element>> = None;
        let mut state = State::ExpectRoot;

        loop {
            state = match state {
                State::ExpectRoot => match tokens.next() {
                    Some(token) if token.is(Sigil::Project) => match token.unescaped() {
                        Ok(name) => {
                            let live = self.resolver.project(&name);
                            cursor = Some(Cursor {
                                path: HandlePath::project(name),
                                live,
                            });
                            State::ExpectSegment
                        }
                        Err(err) => State::Error(err),
                    },
                    _ => State::Error(MementoError::BogusMemento),
                },
                State::ExpectSegment => {
                    let parent = match &cursor {
                        Some(cursor) => cursor.path.kind(),
                        None => NodeKind::Project,
                    };
                    match tokens.peek().copied() {
                        None => State::Done,
                        Some(token) => match segment_kind(parent, &token) {
                            Some(kind) => {
                                tokens.next();
                                State::ExpectSubfields(kind, token)
                            }
                            None => {
                                truncated(memento, token.offset);
                                State::Done
                            }
                        },
                    }
                }
                State::ExpectSubfields(NodeKind::ImportContainer, lead) => {
                    if let Some(cursor) = cursor.as_mut() {
                        self.descend(cursor, Node::ImportContainer);
                    }
                    if lead.raw.is_empty() {
                        State::ExpectSegment
                    } else {
                        State::ExpectSubfields(NodeKind::ImportDeclaration, lead)
                    }
                }
                State::ExpectSubfields(kind, lead) => match read_node(kind, lead, &mut tokens) {
                    Ok(Some(node)) => {
                        if let Some(cursor) = cursor.as_mut() {
                            self.descend(cursor, node);
                        }
                        State::ExpectSegment
                    }
                    Ok(None) => {
                        truncated(memento, lead.offset);
                        State::Done
                    }
                    Err(err) => State::Error(err),
                },
                State::Done => break,
                State::Error(err) => return Err(err),
            };
        }

        let cursor = cursor.ok_or(MementoError::BogusMemento)?;
        Ok(Element {
            path: cursor.path,
            live: cursor.live,
        })
    }

    fn descend(&self, cursor: &mut Cursor<R::Element>, node: Node) {
        let live = match (&cursor.live, &node) {
            (Some(project), Node::Root(root)) => self.resolver.root(project, root),
            (Some(parent), _) => self.factory.child(parent, &node),
            // Below a placeholder everything is a placeholder.
            (None, _) => None,
        };
        tracing::trace!(
            target: TRACE_TARGET,
            kind = ?node.kind(),
            exists = live.is_some(),
            "decoded segment"
        );
        cursor.path.push_unchecked(node);
        cursor.live = live;
    }
}

fn truncated(memento: &str, offset: usize) {
    tracing::debug!(
        target: TRACE_TARGET,
        memento,
        offset,
        "ignoring unparseable memento tail"
    );
}

/// The kind of segment `token` opens below `parent`, if it may appear there.
fn segment_kind(parent: NodeKind, token: &Token<'_>) -> Option<NodeKind> {
    let kind = match token.sigil? {
        Sigil::Import if parent == NodeKind::ImportContainer => NodeKind::ImportDeclaration,
        sigil => sigil.node_kind()?,
    };
    parent.can_contain(kind).then_some(kind)
}

type Tokens<'m> = Peekable<MementoTokenizer<'m>>;

/// Reads the sub-fields of one segment. `Ok(None)` means the segment is incomplete.
fn read_node<'m>(kind: NodeKind, lead: Token<'m>, tokens: &mut Tokens<'m>) -> Result<Option<Node>> {
    let node = match kind {
        NodeKind::Root => return Ok(read_root(lead, tokens)?.map(Node::Root)),
        NodeKind::Method => return read_method(lead, tokens),
        NodeKind::LocalVariable => return read_local_variable(lead, tokens),
        NodeKind::LambdaExpression => return read_lambda(lead, tokens),
        NodeKind::PackageFragment => Node::PackageFragment {
            name: lead.unescaped()?,
        },
        NodeKind::Type => Node::Type {
            name: lead.unescaped()?,
            occurrence: read_occurrence(tokens)?,
        },
        NodeKind::ModularClassFile => {
            if !lead.raw.is_empty() {
                return Ok(None);
            }
            Node::ModularClassFile
        }
        NodeKind::Initializer => {
            if lead.raw.is_empty() {
                return Ok(None);
            }
            Node::Initializer {
                occurrence: parse_occurrence(&lead, "initializer count")?,
            }
        }
        NodeKind::ImportContainer => Node::ImportContainer,
        NodeKind::CompilationUnit | NodeKind::ClassFile | NodeKind::Module => {
            let Some(name) = required(&lead)? else {
                return Ok(None);
            };
            match kind {
                NodeKind::CompilationUnit => Node::CompilationUnit { name },
                NodeKind::ClassFile => Node::ClassFile { name },
                _ => Node::Module { name },
            }
        }
        NodeKind::Field
        | NodeKind::ImportDeclaration
        | NodeKind::PackageDeclaration
        | NodeKind::TypeParameter
        | NodeKind::Annotation => {
            let Some(name) = required(&lead)? else {
                return Ok(None);
            };
            let occurrence = read_occurrence(tokens)?;
            match kind {
                NodeKind::Field => Node::Field { name, occurrence },
                NodeKind::ImportDeclaration => Node::ImportDeclaration { name, occurrence },
                NodeKind::PackageDeclaration => Node::PackageDeclaration { name, occurrence },
                NodeKind::TypeParameter => Node::TypeParameter { name, occurrence },
                _ => Node::Annotation { name, occurrence },
            }
        }
        // Never a child segment.
        NodeKind::Project => return Ok(None),
    };
    Ok(Some(node))
}

fn required(token: &Token<'_>) -> Result<Option<String>> {
    let name = token.unescaped()?;
    Ok((!name.is_empty()).then_some(name))
}

fn parse_field<T: FromStr>(token: &Token<'_>, field: &'static str) -> Result<T> {
    let text = token.unescaped()?;
    text.parse()
        .map_err(|_| MementoError::InvalidField { field, value: text })
}

fn parse_occurrence(token: &Token<'_>, field: &'static str) -> Result<u32> {
    match parse_field::<u32>(token, field)? {
        0 => Err(MementoError::InvalidField {
            field,
            value: "0".to_owned(),
        }),
        n => Ok(n),
    }
}

fn next_field<'m>(tokens: &mut Tokens<'m>, sigil: Sigil) -> Option<Token<'m>> {
    tokens.next_if(|token| token.is(sigil))
}

/// Optional `!N` suffix; an empty `!` counts as the first occurrence.
fn read_occurrence(tokens: &mut Tokens<'_>) -> Result<u32> {
    match next_field(tokens, Sigil::Count) {
        Some(token) if token.raw.is_empty() => Ok(1),
        Some(token) => parse_occurrence(&token, "occurrence count"),
        None => Ok(1),
    }
}

fn read_root<'m>(lead: Token<'m>, tokens: &mut Tokens<'m>) -> Result<Option<RootSegment>> {
    let mut root = RootSegment::new(lead.unescaped()?);
    while let Some(token) = tokens.peek().copied() {
        match token.sigil {
            // Older mementos wrote the separators of root paths unescaped.
            Some(Sigil::Root) => {
                tokens.next();
                root.path.push('/');
                root.path.push_str(&token.unescaped()?);
            }
            Some(Sigil::Module) if root.module.is_none() => {
                tokens.next();
                root.module = Some(token.unescaped()?);
            }
            Some(Sigil::ClasspathAttribute) => {
                tokens.next();
                let name = token.unescaped()?;
                let Some(value) = next_field(tokens, Sigil::ClasspathAttribute) else {
                    return Ok(None);
                };
                match next_field(tokens, Sigil::ClasspathAttribute) {
                    Some(end) if end.raw.is_empty() => {}
                    _ => return Ok(None),
                }
                root.attributes.push(ClasspathAttribute {
                    name,
                    value: value.unescaped()?,
                });
            }
            _ => break,
        }
    }
    Ok(Some(root))
}

fn read_method<'m>(lead: Token<'m>, tokens: &mut Tokens<'m>) -> Result<Option<Node>> {
    let Some(name) = required(&lead)? else {
        return Ok(None);
    };

    let mut parameter_types = Vec::new();
    while let Some(token) = next_field(tokens, Sigil::Method) {
        let mut parameter = token.unescaped()?;
        // Older mementos left array brackets unescaped, splitting `[[I` into `~`, `[`, `[I`.
        if parameter.is_empty() {
            while let Some(dimension) = next_field(tokens, Sigil::Type) {
                parameter.push('[');
                let rest = dimension.unescaped()?;
                if !rest.is_empty() {
                    parameter.push_str(&rest);
                    break;
                }
            }
        }
        if parameter.is_empty() {
            return Ok(None);
        }
        parameter_types.push(parameter);
    }

    Ok(Some(Node::Method {
        name,
        parameter_types,
        occurrence: read_occurrence(tokens)?,
    }))
}

fn read_local_variable<'m>(lead: Token<'m>, tokens: &mut Tokens<'m>) -> Result<Option<Node>> {
    let Some(name) = required(&lead)? else {
        return Ok(None);
    };

    let mut fields = Vec::with_capacity(7);
    for _ in 0..7 {
        match next_field(tokens, Sigil::Count) {
            Some(token) => fields.push(token),
            None => return Ok(None),
        }
    }

    let is_parameter = match fields[6].unescaped()?.as_str() {
        "true" => true,
        "false" => false,
        other => {
            return Err(MementoError::InvalidField {
                field: "parameter flag",
                value: other.to_owned(),
            })
        }
    };

    Ok(Some(Node::LocalVariable(LocalVariable {
        name,
        declaration_start: parse_field(&fields[0], "declaration start")?,
        declaration_end: parse_field(&fields[1], "declaration end")?,
        name_start: parse_field(&fields[2], "name start")?,
        name_end: parse_field(&fields[3], "name end")?,
        type_signature: fields[4].unescaped()?,
        annotated_type_signature: None,
        flags: parse_field(&fields[5], "flags")?,
        is_parameter,
        occurrence: read_occurrence(tokens)?,
    })))
}

fn read_lambda<'m>(lead: Token<'m>, tokens: &mut Tokens<'m>) -> Result<Option<Node>> {
    let interface_name = lead.unescaped()?;

    let mut positions = [0u32; 3];
    for (slot, field) in positions
        .iter_mut()
        .zip(["source start", "source end", "arrow position"])
    {
        let Some(token) = next_field(tokens, Sigil::Count) else {
            return Ok(None);
        };
        *slot = parse_field(&token, field)?;
    }

    let Some(selector) = next_field(tokens, Sigil::LambdaMethod) else {
        return Ok(None);
    };
    let selector = selector.unescaped()?;
    let Some(count) = next_field(tokens, Sigil::Count) else {
        return Ok(None);
    };
    let count: usize = parse_field(&count, "lambda parameter count")?;

    let mut parameters = Vec::with_capacity(count.min(16));
    for _ in 0..count {
        let Some(type_signature) = next_field(tokens, Sigil::String) else {
            return Ok(None);
        };
        let Some(name) = next_field(tokens, Sigil::String) else {
            return Ok(None);
        };
        parameters.push(LambdaParameter {
            type_signature: type_signature.unescaped()?,
            name: name.unescaped()?,
        });
    }
    let Some(return_type) = next_field(tokens, Sigil::String) else {
        return Ok(None);
    };

    let [source_start, source_end, arrow_position] = positions;
    Ok(Some(Node::LambdaExpression(LambdaExpression {
        interface_name,
        source_start,
        source_end,
        arrow_position,
        method: LambdaMethod {
            selector,
            parameters,
            return_type: return_type.unescaped()?,
        },
    })))
}
