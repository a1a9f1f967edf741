use morph_project::{Node, Result};

/// One line per node with its trimmed range. Tokens are left out, comments
/// are printed with their text.
pub(crate) fn render(root: Node<'_>) -> Result<String> {
    let mut lines = Vec::new();
    walk(root, 0, &mut lines)?;
    Ok(lines.join("\n"))
}

fn walk(node: Node<'_>, depth: usize, lines: &mut Vec<String>) -> Result<()> {
    let indent = depth * 2;
    let (kind, range) = (node.kind(), node.range()?);

    if node.is_comment() {
        lines.push(format!("{:indent$}{kind:?}@{range:?} {:?}", "", node.text()?));
        return Ok(());
    }
    if kind.is_token() {
        return Ok(());
    }

    lines.push(format!("{:indent$}{kind:?}@{range:?}", ""));
    for child in node.children_with_comments()? {
        walk(child, depth + 1, lines)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use expect_test::{Expect, expect};
    use morph_project::{AstNode as _, CreateSourceFileOptions, Project};

    use super::render;

    #[track_caller]
    fn check(text: &str, expect: Expect) {
        let project = Project::new();
        let file = project
            .create_source_file("/test.ts", text, CreateSourceFileOptions::default())
            .unwrap();
        expect.assert_eq(&render(file.syntax()).unwrap());
    }

    #[test]
    fn comments_between_nodes() {
        check(
            "class A {\n    x: string;\n}\n// tail\n",
            expect![[r#"
                SOURCE_FILE@0..35
                  CLASS_DECLARATION@0..26
                    PROPERTY_DECLARATION@14..24
                      KEYWORD_TYPE@17..23
                  SINGLE_LINE_COMMENT@27..34 "// tail""#]],
        );
    }
}
