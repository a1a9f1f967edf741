//! Turns structures into source text through a [`CodeWriter`].

use crate::settings::ManipulationSettings;
use crate::structures::{
    ClassStructure, ConstructorStructure, EnumMemberStructure, EnumStructure, FunctionStructure,
    GetAccessorStructure, ImportStructure, InterfaceStructure, MethodSignatureStructure,
    MethodStructure, ParameterStructure, PropertySignatureStructure, PropertyStructure, Scope,
    SetAccessorStructure, TypeParameterStructure,
};
use crate::writer::CodeWriter;

pub trait StructurePrinter<S: ?Sized> {
    fn print_text(&self, writer: &mut CodeWriter, structure: &S);

    /// Prints `structure` on its own; the text has no leading or trailing newline.
    fn print(&self, settings: ManipulationSettings, structure: &S) -> String {
        let mut writer = CodeWriter::new(settings);
        self.print_text(&mut writer, structure);
        writer.into_text()
    }
}

/// Prints a list with one item per line.
pub struct NewLineFormatting<P>(pub P);

impl<S, P: StructurePrinter<S>> StructurePrinter<[S]> for NewLineFormatting<P> {
    fn print_text(&self, writer: &mut CodeWriter, structures: &[S]) {
        for (index, structure) in structures.iter().enumerate() {
            if index > 0 {
                writer.new_line_if_last_not();
            }
            self.0.print_text(writer, structure);
        }
    }
}

/// Prints a list with an empty line between items.
pub struct BlankLineFormatting<P>(pub P);

impl<S, P: StructurePrinter<S>> StructurePrinter<[S]> for BlankLineFormatting<P> {
    fn print_text(&self, writer: &mut CodeWriter, structures: &[S]) {
        for (index, structure) in structures.iter().enumerate() {
            if index > 0 {
                writer.blank_line();
            }
            self.0.print_text(writer, structure);
        }
    }
}

/// Prints a list separated by `, ` on a single line.
pub struct CommaSeparated<P>(pub P);

impl<S, P: StructurePrinter<S>> StructurePrinter<[S]> for CommaSeparated<P> {
    fn print_text(&self, writer: &mut CodeWriter, structures: &[S]) {
        for (index, structure) in structures.iter().enumerate() {
            if index > 0 {
                writer.write(", ");
            }
            self.0.print_text(writer, structure);
        }
    }
}

pub struct JsDocPrinter;

impl StructurePrinter<[String]> for JsDocPrinter {
    fn print_text(&self, writer: &mut CodeWriter, docs: &[String]) {
        for doc in docs {
            writer.write_line("/**");
            for line in doc.lines() {
                if line.is_empty() {
                    writer.write_line(" *");
                } else {
                    writer.write(" * ").write_line(line);
                }
            }
            writer.write_line(" */");
        }
    }
}

pub struct TypeParameterPrinter;

impl StructurePrinter<TypeParameterStructure> for TypeParameterPrinter {
    fn print_text(&self, writer: &mut CodeWriter, structure: &TypeParameterStructure) {
        writer.write(&structure.name);
        if let Some(constraint) = &structure.constraint {
            writer.write(" extends ").write(constraint);
        }
        if let Some(default) = &structure.default {
            writer.write(" = ").write(default);
        }
    }
}

fn type_parameters(writer: &mut CodeWriter, structures: &[TypeParameterStructure]) {
    if !structures.is_empty() {
        writer.write("<");
        CommaSeparated(TypeParameterPrinter).print_text(writer, structures);
        writer.write(">");
    }
}

pub struct ParameterPrinter;

impl StructurePrinter<ParameterStructure> for ParameterPrinter {
    fn print_text(&self, writer: &mut CodeWriter, structure: &ParameterStructure) {
        if let Some(scope) = structure.scope {
            writer.write(scope.as_str()).space();
        }
        writer.conditional_write(structure.is_readonly, "readonly ");
        writer.conditional_write(structure.is_rest, "...");
        writer.write(&structure.name);
        writer.conditional_write(structure.is_optional, "?");
        type_annotation(writer, structure.type_.as_deref());
        initializer(writer, structure.initializer.as_deref());
    }
}

fn parameters(writer: &mut CodeWriter, structures: &[ParameterStructure]) {
    writer.write("(");
    CommaSeparated(ParameterPrinter).print_text(writer, structures);
    writer.write(")");
}

fn type_annotation(writer: &mut CodeWriter, type_: Option<&str>) {
    if let Some(type_) = type_ {
        writer.write(": ").write(type_);
    }
}

fn initializer(writer: &mut CodeWriter, initializer: Option<&str>) {
    if let Some(initializer) = initializer {
        writer.write(" = ").write(initializer);
    }
}

fn member_modifiers(writer: &mut CodeWriter, scope: Option<Scope>, is_static: bool) {
    if let Some(scope) = scope {
        writer.write(scope.as_str()).space();
    }
    writer.conditional_write(is_static, "static ");
}

/// Writes `{ statements }`, or `;` when there is no body to print.
fn body(writer: &mut CodeWriter, statements: &[String], has_body: bool) {
    if !has_body {
        writer.write(";");
        return;
    }
    writer.block(|writer| {
        for statement in statements {
            writer.write_line(statement);
        }
    });
}

pub struct PropertyPrinter;

impl StructurePrinter<PropertyStructure> for PropertyPrinter {
    fn print_text(&self, writer: &mut CodeWriter, structure: &PropertyStructure) {
        JsDocPrinter.print_text(writer, &structure.docs);
        member_modifiers(writer, structure.scope, structure.is_static);
        writer.conditional_write(structure.is_abstract, "abstract ");
        writer.conditional_write(structure.is_readonly, "readonly ");
        writer.write(&structure.name);
        writer.conditional_write(structure.is_optional, "?");
        type_annotation(writer, structure.type_.as_deref());
        initializer(writer, structure.initializer.as_deref());
        writer.write(";");
    }
}

/// Prints methods; ambient methods and abstract ones end with `;`.
#[derive(Default)]
pub struct MethodPrinter {
    pub is_ambient: bool,
}

impl StructurePrinter<MethodStructure> for MethodPrinter {
    fn print_text(&self, writer: &mut CodeWriter, structure: &MethodStructure) {
        JsDocPrinter.print_text(writer, &structure.docs);
        member_modifiers(writer, structure.scope, structure.is_static);
        writer.conditional_write(structure.is_abstract, "abstract ");
        writer.conditional_write(structure.is_async, "async ");
        writer.write(&structure.name);
        type_parameters(writer, &structure.type_parameters);
        parameters(writer, &structure.parameters);
        type_annotation(writer, structure.return_type.as_deref());
        body(writer, &structure.statements, !self.is_ambient && !structure.is_abstract);
    }
}

#[derive(Default)]
pub struct ConstructorPrinter {
    pub is_ambient: bool,
}

impl StructurePrinter<ConstructorStructure> for ConstructorPrinter {
    fn print_text(&self, writer: &mut CodeWriter, structure: &ConstructorStructure) {
        JsDocPrinter.print_text(writer, &structure.docs);
        member_modifiers(writer, structure.scope, false);
        writer.write("constructor");
        parameters(writer, &structure.parameters);
        body(writer, &structure.statements, !self.is_ambient);
    }
}

#[derive(Default)]
pub struct GetAccessorPrinter {
    pub is_ambient: bool,
}

impl StructurePrinter<GetAccessorStructure> for GetAccessorPrinter {
    fn print_text(&self, writer: &mut CodeWriter, structure: &GetAccessorStructure) {
        JsDocPrinter.print_text(writer, &structure.docs);
        member_modifiers(writer, structure.scope, structure.is_static);
        writer.write("get ").write(&structure.name).write("()");
        type_annotation(writer, structure.return_type.as_deref());
        body(writer, &structure.statements, !self.is_ambient);
    }
}

#[derive(Default)]
pub struct SetAccessorPrinter {
    pub is_ambient: bool,
}

impl StructurePrinter<SetAccessorStructure> for SetAccessorPrinter {
    fn print_text(&self, writer: &mut CodeWriter, structure: &SetAccessorStructure) {
        JsDocPrinter.print_text(writer, &structure.docs);
        member_modifiers(writer, structure.scope, structure.is_static);
        writer.write("set ").write(&structure.name);
        parameters(writer, &structure.parameters);
        body(writer, &structure.statements, !self.is_ambient);
    }
}

/// Prints a class; members are grouped as properties, constructors,
/// accessors and methods.
pub struct ClassPrinter;

impl StructurePrinter<ClassStructure> for ClassPrinter {
    fn print_text(&self, writer: &mut CodeWriter, structure: &ClassStructure) {
        let is_ambient = structure.has_declare_keyword;
        JsDocPrinter.print_text(writer, &structure.docs);
        writer.conditional_write(structure.is_exported || structure.is_default_export, "export ");
        writer.conditional_write(structure.is_default_export, "default ");
        writer.conditional_write(structure.has_declare_keyword, "declare ");
        writer.conditional_write(structure.is_abstract, "abstract ");
        writer.write("class ").write(&structure.name);
        type_parameters(writer, &structure.type_parameters);
        if let Some(extends) = &structure.extends {
            writer.write(" extends ").write(extends);
        }
        if !structure.implements.is_empty() {
            writer.write(" implements ").write(&structure.implements.join(", "));
        }
        writer.block(|writer| {
            let mut written = false;
            let mut section = |writer: &mut CodeWriter, present: bool| {
                if present && written {
                    writer.blank_line();
                }
                written |= present;
                present
            };
            if section(writer, !structure.properties.is_empty()) {
                NewLineFormatting(PropertyPrinter).print_text(writer, &structure.properties);
            }
            if section(writer, !structure.ctors.is_empty()) {
                BlankLineFormatting(ConstructorPrinter { is_ambient })
                    .print_text(writer, &structure.ctors);
            }
            if section(writer, !structure.get_accessors.is_empty()) {
                BlankLineFormatting(GetAccessorPrinter { is_ambient })
                    .print_text(writer, &structure.get_accessors);
            }
            if section(writer, !structure.set_accessors.is_empty()) {
                BlankLineFormatting(SetAccessorPrinter { is_ambient })
                    .print_text(writer, &structure.set_accessors);
            }
            if section(writer, !structure.methods.is_empty()) {
                BlankLineFormatting(MethodPrinter { is_ambient })
                    .print_text(writer, &structure.methods);
            }
        });
    }
}

pub struct PropertySignaturePrinter;

impl StructurePrinter<PropertySignatureStructure> for PropertySignaturePrinter {
    fn print_text(&self, writer: &mut CodeWriter, structure: &PropertySignatureStructure) {
        JsDocPrinter.print_text(writer, &structure.docs);
        writer.conditional_write(structure.is_readonly, "readonly ");
        writer.write(&structure.name);
        writer.conditional_write(structure.is_optional, "?");
        type_annotation(writer, structure.type_.as_deref());
        writer.write(";");
    }
}

pub struct MethodSignaturePrinter;

impl StructurePrinter<MethodSignatureStructure> for MethodSignaturePrinter {
    fn print_text(&self, writer: &mut CodeWriter, structure: &MethodSignatureStructure) {
        JsDocPrinter.print_text(writer, &structure.docs);
        writer.write(&structure.name);
        type_parameters(writer, &structure.type_parameters);
        parameters(writer, &structure.parameters);
        type_annotation(writer, structure.return_type.as_deref());
        writer.write(";");
    }
}

pub struct InterfacePrinter;

impl StructurePrinter<InterfaceStructure> for InterfacePrinter {
    fn print_text(&self, writer: &mut CodeWriter, structure: &InterfaceStructure) {
        JsDocPrinter.print_text(writer, &structure.docs);
        writer.conditional_write(structure.is_exported, "export ");
        writer.conditional_write(structure.has_declare_keyword, "declare ");
        writer.write("interface ").write(&structure.name);
        type_parameters(writer, &structure.type_parameters);
        if !structure.extends.is_empty() {
            writer.write(" extends ").write(&structure.extends.join(", "));
        }
        writer.block(|writer| {
            NewLineFormatting(PropertySignaturePrinter).print_text(writer, &structure.properties);
            writer.new_line_if_last_not();
            NewLineFormatting(MethodSignaturePrinter).print_text(writer, &structure.methods);
        });
    }
}

#[derive(Default)]
pub struct FunctionPrinter {
    pub is_ambient: bool,
}

impl StructurePrinter<FunctionStructure> for FunctionPrinter {
    fn print_text(&self, writer: &mut CodeWriter, structure: &FunctionStructure) {
        JsDocPrinter.print_text(writer, &structure.docs);
        writer.conditional_write(structure.is_exported || structure.is_default_export, "export ");
        writer.conditional_write(structure.is_default_export, "default ");
        writer.conditional_write(structure.has_declare_keyword, "declare ");
        writer.conditional_write(structure.is_async, "async ");
        writer.write("function ").write(&structure.name);
        type_parameters(writer, &structure.type_parameters);
        parameters(writer, &structure.parameters);
        type_annotation(writer, structure.return_type.as_deref());
        let is_ambient = self.is_ambient || structure.has_declare_keyword;
        body(writer, &structure.statements, !is_ambient);
    }
}

pub struct EnumMemberPrinter;

impl StructurePrinter<EnumMemberStructure> for EnumMemberPrinter {
    fn print_text(&self, writer: &mut CodeWriter, structure: &EnumMemberStructure) {
        JsDocPrinter.print_text(writer, &structure.docs);
        writer.write(&structure.name);
        initializer(writer, structure.initializer.as_deref());
    }
}

pub struct EnumPrinter;

impl StructurePrinter<EnumStructure> for EnumPrinter {
    fn print_text(&self, writer: &mut CodeWriter, structure: &EnumStructure) {
        JsDocPrinter.print_text(writer, &structure.docs);
        writer.conditional_write(structure.is_exported, "export ");
        writer.conditional_write(structure.has_declare_keyword, "declare ");
        writer.conditional_write(structure.is_const, "const ");
        writer.write("enum ").write(&structure.name);
        writer.block(|writer| {
            for (index, member) in structure.members.iter().enumerate() {
                if index > 0 {
                    writer.write(",").new_line();
                }
                EnumMemberPrinter.print_text(writer, member);
            }
        });
    }
}

pub struct ImportPrinter;

impl StructurePrinter<ImportStructure> for ImportPrinter {
    fn print_text(&self, writer: &mut CodeWriter, structure: &ImportStructure) {
        writer.write("import ");
        let mut clauses = Vec::new();
        if let Some(default_import) = &structure.default_import {
            clauses.push(default_import.clone());
        }
        if let Some(namespace_import) = &structure.namespace_import {
            clauses.push(format!("* as {namespace_import}"));
        }
        if !structure.named_imports.is_empty() {
            let named = structure
                .named_imports
                .iter()
                .map(|specifier| match &specifier.alias {
                    Some(alias) => format!("{} as {alias}", specifier.name),
                    None => specifier.name.clone(),
                })
                .collect::<Vec<_>>()
                .join(", ");
            clauses.push(format!("{{ {named} }}"));
        }
        if !clauses.is_empty() {
            writer.write(&clauses.join(", ")).write(" from ");
        }
        writer.quote(&structure.module_specifier).write(";");
    }
}

#[cfg(test)]
mod tests {
    use expect_test::{Expect, expect};

    use super::*;
    use crate::settings::{IndentationText, QuoteKind};
    use crate::structures::ImportSpecifierStructure;

    #[track_caller]
    fn check<S: ?Sized>(printer: impl StructurePrinter<S>, structure: &S, expect: Expect) {
        expect.assert_eq(&printer.print(ManipulationSettings::default(), structure));
    }

    #[test]
    fn classes_group_members() {
        let class = ClassStructure::new("Point")
            .exported()
            .with_extends("Base")
            .implements("Shape")
            .property(PropertyStructure::new("x").with_type("number").readonly())
            .property(PropertyStructure::new("y").with_type("number").with_initializer("0"))
            .ctor(ConstructorStructure::new().parameter(
                ParameterStructure::new("x").with_type("number").with_scope(Scope::Private),
            ))
            .method(
                MethodStructure::new("norm")
                    .with_return_type("number")
                    .statement("return Math.hypot(this.x, this.y);"),
            )
            .method(MethodStructure::new("reset").with_docs(vec!["Moves to the origin.".to_owned()]));

        check(
            ClassPrinter,
            &class,
            expect![[r#"
                export class Point extends Base implements Shape {
                    readonly x: number;
                    y: number = 0;

                    constructor(private x: number) {
                    }

                    norm(): number {
                        return Math.hypot(this.x, this.y);
                    }

                    /**
                     * Moves to the origin.
                     */
                    reset() {
                    }
                }"#]],
        );
    }

    #[test]
    fn ambient_classes_have_no_bodies() {
        let class = ClassStructure::new("A")
            .declare()
            .ctor(ConstructorStructure::new())
            .get_accessor(GetAccessorStructure::new("size").with_return_type("number"))
            .set_accessor(
                SetAccessorStructure::new("size")
                    .parameter(ParameterStructure::new("value").with_type("number")),
            )
            .method(MethodStructure::new("m").static_());

        check(
            ClassPrinter,
            &class,
            expect![[r#"
                declare class A {
                    constructor();

                    get size(): number;

                    set size(value: number);

                    static m();
                }"#]],
        );
    }

    #[test]
    fn interfaces_and_enums() {
        let interface = InterfaceStructure::new("Named")
            .extends("Base")
            .property(PropertySignatureStructure::new("name").with_type("string").optional())
            .method(
                MethodSignatureStructure::new("rename")
                    .parameter(ParameterStructure::new("to").with_type("string"))
                    .with_return_type("void"),
            );
        check(
            InterfacePrinter,
            &interface,
            expect![[r#"
                interface Named extends Base {
                    name?: string;
                    rename(to: string): void;
                }"#]],
        );

        let enum_ = EnumStructure::new("Color")
            .const_()
            .member(EnumMemberStructure::new("Red"))
            .member(EnumMemberStructure::new("Green").with_initializer("2"));
        check(
            EnumPrinter,
            &enum_,
            expect![[r#"
                const enum Color {
                    Red,
                    Green = 2
                }"#]],
        );
    }

    #[test]
    fn functions_and_type_parameters() {
        let function = FunctionStructure::new("identity")
            .exported()
            .type_parameter(TypeParameterStructure::new("T").with_constraint("object"))
            .parameter(ParameterStructure::new("value").with_type("T"))
            .parameter(ParameterStructure::new("rest").rest().with_type("T[]"))
            .with_return_type("T")
            .statement("return value;");
        check(
            FunctionPrinter::default(),
            &function,
            expect![[r#"
                export function identity<T extends object>(value: T, ...rest: T[]): T {
                    return value;
                }"#]],
        );
    }

    #[test]
    fn imports_use_the_configured_quote() {
        let import = ImportStructure::new("./shapes")
            .with_default_import("Shapes")
            .named_import(ImportSpecifierStructure::new("Point").with_alias("P"));
        let settings = ManipulationSettings {
            quote: QuoteKind::Single,
            indentation: IndentationText::TwoSpaces,
            ..ManipulationSettings::default()
        };
        assert_eq!(
            ImportPrinter.print(settings, &import),
            "import Shapes, { Point as P } from './shapes';"
        );
        assert_eq!(
            ImportPrinter.print(ManipulationSettings::default(), &ImportStructure::new("side")),
            "import \"side\";"
        );
    }

    #[test]
    fn list_formatting() {
        let properties =
            [PropertyStructure::new("a"), PropertyStructure::new("b").static_()];
        check(
            BlankLineFormatting(PropertyPrinter),
            &properties[..],
            expect![[r#"
                a;

                static b;"#]],
        );
        check(
            NewLineFormatting(PropertyPrinter),
            &properties[..],
            expect![[r#"
                a;
                static b;"#]],
        );
    }
}
