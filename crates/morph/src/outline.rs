use morph_project::{
    AstNode as _, CodeWriter, ManipulationSettings, NamedNode as _, Node, NodeVariant, Result,
    SourceFile, StatementedNode as _,
};

/// The declarations of `file` as an indented summary, with the types the
/// checker resolves for properties, variables and signatures.
pub(crate) fn render(file: SourceFile<'_>) -> Result<String> {
    let settings = file.syntax().project().manipulation_settings();
    let mut writer = CodeWriter::new(settings);
    for statement in file.statements()? {
        if let Some(text) = declaration(statement, settings)? {
            writer.write(&text).new_line_if_last_not();
        }
    }
    Ok(writer.into_text())
}

fn declaration(node: Node<'_>, settings: ManipulationSettings) -> Result<Option<String>> {
    let mut writer = CodeWriter::new(settings);
    match node.variant() {
        NodeVariant::Class(class) => {
            writer.write(&format!("class {}", class.name()?));
            if let Some(base) = class.extends()? {
                writer.write(&format!(" extends {}", base.syntax().text()?));
            }
            write_body(&mut writer, class.members()?, settings)?;
        }
        NodeVariant::Interface(interface) => {
            writer.write(&format!("interface {}", interface.name()?));
            let extends = interface
                .extends()?
                .into_iter()
                .map(|base| base.syntax().text())
                .collect::<Result<Vec<_>>>()?;
            if !extends.is_empty() {
                writer.write(&format!(" extends {}", extends.join(", ")));
            }
            let members = interface.members_with_comments()?;
            write_body(&mut writer, members, settings)?;
        }
        NodeVariant::Enum(enumeration) => {
            writer.write(&format!("enum {}", enumeration.name()?));
            let members = enumeration.members()?.into_iter().map(|member| member.syntax());
            write_body(&mut writer, members.collect(), settings)?;
        }
        NodeVariant::Namespace(namespace) => {
            writer.write(&format!("namespace {}", namespace.name()?));
            write_body(&mut writer, namespace.statements()?, settings)?;
        }
        NodeVariant::Function(function) => {
            writer.write(&format!("function {}{}", function.name()?, signature(node, true)?));
        }
        NodeVariant::Method(method) => {
            writer.write(&format!("{}{}", method.name()?, signature(node, true)?));
        }
        NodeVariant::MethodSignature(method) => {
            writer.write(&format!("{}{}", method.name()?, signature(node, true)?));
        }
        NodeVariant::Constructor(_) => {
            writer.write(&format!("constructor{}", signature(node, false)?));
        }
        NodeVariant::GetAccessor(accessor) => {
            writer.write(&format!("get {}{}", accessor.name()?, signature(node, true)?));
        }
        NodeVariant::SetAccessor(accessor) => {
            writer.write(&format!("set {}{}", accessor.name()?, signature(node, false)?));
        }
        NodeVariant::Property(property) => {
            writer.write(&typed(&property.name()?, node)?);
        }
        NodeVariant::PropertySignature(property) => {
            writer.write(&typed(&property.name()?, node)?);
        }
        NodeVariant::Parameter(parameter) => {
            writer.write(&typed(&parameter.name()?, node)?);
        }
        NodeVariant::EnumMember(member) => {
            writer.write(&member.name()?);
        }
        NodeVariant::TypeAlias(alias) => {
            writer.write(&format!("type {} = {}", alias.name()?, node.type_of()?.text()));
        }
        NodeVariant::VariableStatement(statement) => {
            let keyword = statement.declaration_kind()?.as_str();
            for variable in statement.declarations()? {
                let text = typed(&variable.name()?, variable.syntax())?;
                writer.write_line(&format!("{keyword} {text}"));
            }
        }
        NodeVariant::Import(import) => {
            let names = import
                .named_imports()?
                .into_iter()
                .map(|specifier| specifier.name())
                .collect::<Result<Vec<_>>>()?;
            writer.write("import ");
            if !names.is_empty() {
                writer.write(&format!("{{ {} }} from ", names.join(", ")));
            }
            writer.quote(&import.module_specifier_value()?);
        }
        _ => return Ok(None),
    }
    Ok(Some(writer.into_text()))
}

fn write_body(
    writer: &mut CodeWriter,
    members: Vec<Node<'_>>,
    settings: ManipulationSettings,
) -> Result<()> {
    let mut lines = Vec::new();
    for member in members {
        if let Some(text) = declaration(member, settings)? {
            lines.push(text);
        }
    }
    writer.block(|writer| {
        for line in &lines {
            writer.write(line).new_line_if_last_not();
        }
    });
    Ok(())
}

fn typed(name: &str, node: Node<'_>) -> Result<String> {
    Ok(format!("{name}: {}", node.type_of()?.text()))
}

/// `(name: type, ...)`, followed by `: return` when `returns` is set.
fn signature(node: Node<'_>, returns: bool) -> Result<String> {
    let Some(signature) = node.signature()? else { return Ok(String::new()) };
    let mut parameters = Vec::new();
    for parameter in signature.parameters()? {
        parameters.push(format!("{}: {}", parameter.name(), parameter.declared_type()?.text()));
    }

    let mut text = format!("({})", parameters.join(", "));
    if returns {
        text.push_str(": ");
        text.push_str(&signature.return_type()?.text());
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use expect_test::{Expect, expect};
    use morph_project::{CreateSourceFileOptions, ManipulationSettings, Project, QuoteKind};

    use super::render;

    #[track_caller]
    fn check(text: &str, settings: ManipulationSettings, expect: Expect) {
        let project = Project::with_settings(settings);
        let file = project
            .create_source_file("/test.ts", text, CreateSourceFileOptions::default())
            .unwrap();
        expect.assert_eq(&render(file).unwrap());
    }

    #[test]
    fn classes_and_interfaces() {
        check(
            r#"class Base {}
class A extends Base {
    x: string;
    constructor(a: number) {}
    m(b: string): number;
}
interface I {
    // skipped
    y: boolean;
}
enum E { X, Y }
"#,
            ManipulationSettings::default(),
            expect![[r#"
                class Base {
                }
                class A extends Base {
                    x: string
                    constructor(a: number)
                    m(b: string): number
                }
                interface I {
                    y: boolean
                }
                enum E {
                    X
                    Y
                }"#]],
        );
    }

    #[test]
    fn imports_use_the_configured_quotes() {
        let settings = ManipulationSettings { quote: QuoteKind::Single, ..Default::default() };
        check(
            "import { A, B } from \"./a\";\nconst x: number = 1;\n",
            settings,
            expect![[r#"
                import { A, B } from './a'
                const x: number"#]],
        );
    }
}
