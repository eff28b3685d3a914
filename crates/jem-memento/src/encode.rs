//! Canonical serialization of a [`HandlePath`].

use crate::escape::escape_into;
use crate::node::{LambdaExpression, LocalVariable, Node, RootSegment};
use crate::path::HandlePath;
use crate::sigil::Sigil;

/// Encodes `path` as its canonical memento.
///
/// Total for any path built through [`HandlePath`]; every payload is escaped here, so callers
/// pass raw names.
pub fn encode(path: &HandlePath) -> String {
    let mut buf = String::new();
    let nodes = path.nodes();
    for (index, node) in nodes.iter().enumerate() {
        let is_leaf = index + 1 == nodes.len();
        write_node(&mut buf, node, is_leaf);
    }
    buf
}

fn write_node(buf: &mut String, node: &Node, is_leaf: bool) {
    match node {
        Node::Project { name } => segment(buf, Sigil::Project, name),
        Node::Root(root) => write_root(buf, root),
        Node::PackageFragment { name } => segment(buf, Sigil::PackageFragment, name),
        Node::CompilationUnit { name } => segment(buf, Sigil::CompilationUnit, name),
        Node::ClassFile { name } => segment(buf, Sigil::ClassFile, name),
        Node::ModularClassFile => buf.push_str(Sigil::ModularClassFile.as_str()),
        Node::Module { name } => segment(buf, Sigil::Module, name),
        Node::Type { name, occurrence } => {
            segment(buf, Sigil::Type, name);
            occurrence_suffix(buf, *occurrence);
        }
        Node::Method {
            name,
            parameter_types,
            occurrence,
        } => {
            segment(buf, Sigil::Method, name);
            for parameter in parameter_types {
                segment(buf, Sigil::Method, parameter);
            }
            occurrence_suffix(buf, *occurrence);
        }
        Node::Field { name, occurrence } => {
            segment(buf, Sigil::Field, name);
            occurrence_suffix(buf, *occurrence);
        }
        Node::Initializer { occurrence } => {
            debug_assert!(*occurrence >= 1, "initializer occurrence must be 1-based");
            buf.push_str(Sigil::Initializer.as_str());
            buf.push_str(&occurrence.to_string());
        }
        // The container only shows up as `#` when it is the element itself; declarations below
        // it carry the `#` on their own.
        Node::ImportContainer => {
            if is_leaf {
                buf.push_str(Sigil::Import.as_str());
            }
        }
        Node::ImportDeclaration { name, occurrence } => {
            segment(buf, Sigil::Import, name);
            occurrence_suffix(buf, *occurrence);
        }
        Node::PackageDeclaration { name, occurrence } => {
            segment(buf, Sigil::PackageDeclaration, name);
            occurrence_suffix(buf, *occurrence);
        }
        Node::TypeParameter { name, occurrence } => {
            segment(buf, Sigil::TypeParameter, name);
            occurrence_suffix(buf, *occurrence);
        }
        Node::Annotation { name, occurrence } => {
            segment(buf, Sigil::Annotation, name);
            occurrence_suffix(buf, *occurrence);
        }
        Node::LocalVariable(var) => write_local_variable(buf, var),
        Node::LambdaExpression(lambda) => write_lambda(buf, lambda),
    }
}

fn segment(buf: &mut String, sigil: Sigil, raw: &str) {
    buf.push_str(sigil.as_str());
    escape_into(buf, raw);
}

fn count_field(buf: &mut String, value: impl ToString) {
    buf.push_str(Sigil::Count.as_str());
    buf.push_str(&value.to_string());
}

fn occurrence_suffix(buf: &mut String, occurrence: u32) {
    debug_assert!(occurrence >= 1, "occurrence counts are 1-based");
    if occurrence > 1 {
        count_field(buf, occurrence);
    }
}

fn write_root(buf: &mut String, root: &RootSegment) {
    segment(buf, Sigil::Root, &root.path);
    if let Some(module) = &root.module {
        segment(buf, Sigil::Module, module);
    }
    for attribute in &root.attributes {
        segment(buf, Sigil::ClasspathAttribute, &attribute.name);
        segment(buf, Sigil::ClasspathAttribute, &attribute.value);
        buf.push_str(Sigil::ClasspathAttribute.as_str());
    }
}

fn write_local_variable(buf: &mut String, var: &LocalVariable) {
    segment(buf, Sigil::LocalVariable, &var.name);
    count_field(buf, var.declaration_start);
    count_field(buf, var.declaration_end);
    count_field(buf, var.name_start);
    count_field(buf, var.name_end);
    segment(buf, Sigil::Count, &var.type_signature);
    count_field(buf, var.flags);
    count_field(buf, var.is_parameter);
    occurrence_suffix(buf, var.occurrence);
}

fn write_lambda(buf: &mut String, lambda: &LambdaExpression) {
    segment(buf, Sigil::LambdaExpression, &lambda.interface_name);
    count_field(buf, lambda.source_start);
    count_field(buf, lambda.source_end);
    count_field(buf, lambda.arrow_position);

    let method = &lambda.method;
    segment(buf, Sigil::LambdaMethod, &method.selector);
    count_field(buf, method.parameters.len());
    for parameter in &method.parameters {
        segment(buf, Sigil::String, &parameter.type_signature);
        segment(buf, Sigil::String, &parameter.name);
    }
    segment(buf, Sigil::String, &method.return_type);
}
