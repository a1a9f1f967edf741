use camino::Utf8PathBuf;
use morph_project::{
    AstNode as _, CreateSourceFileOptions, Error, ErrorCategory, NamedNode as _, Project,
    SourceFile, StatementedNode as _,
};

fn create<'p>(project: &'p Project, path: &str, text: &str) -> SourceFile<'p> {
    project.create_source_file(path, text, CreateSourceFileOptions::default()).unwrap()
}

#[test]
fn files_are_created_once() {
    let project = Project::new();
    let file = create(&project, "/a.ts", "class A {}");

    let error =
        project.create_source_file("/a.ts", "", CreateSourceFileOptions::default()).unwrap_err();
    assert!(matches!(error, Error::FileAlreadyExists { .. }));
    assert_eq!(error.category(), ErrorCategory::InvalidManipulationRequest);
    assert_eq!(file.full_text().unwrap(), "class A {}");
    assert_eq!(project.source_files(), [file]);
}

#[test]
fn overwriting_forgets_the_old_wrappers() {
    let project = Project::new();
    let old = create(&project, "/a.ts", "class A {}");
    let class = old.class_or_err("A").unwrap();

    let new = project
        .create_source_file("/a.ts", "class B {}", CreateSourceFileOptions { overwrite: true })
        .unwrap();

    assert_ne!(new, old);
    assert!(old.syntax().is_forgotten());
    assert!(class.syntax().is_forgotten());
    assert_eq!(new.classes().unwrap().len(), 1);
    assert_eq!(project.source_file("/a.ts"), Some(new));
}

#[test]
fn removed_files_are_gone() {
    let project = Project::new();
    let file = create(&project, "/a.ts", "class A {}");
    let class = file.class_or_err("A").unwrap();

    project.remove_source_file("/a.ts").unwrap();

    let error = class.name().unwrap_err();
    assert!(matches!(error, Error::InvalidatedNode { .. }));
    assert_eq!(error.category(), ErrorCategory::InvalidatedNodeAccess);
    assert!(file.syntax().is_forgotten());
    assert!(project.source_files().is_empty());

    let error = project.source_file_or_err("/a.ts").unwrap_err();
    assert_eq!(error.to_string(), "no source file exists at `/a.ts`");
    assert!(project.remove_source_file("/a.ts").is_err());
}

#[test]
fn files_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_owned()).unwrap();
    let path = root.join("src/a.ts");
    std::fs::create_dir_all(root.join("src")).unwrap();
    std::fs::write(&path, "class A {}\n").unwrap();

    let project = Project::new();
    let file = project.add_source_file_at_path(&path).unwrap();
    assert_eq!(project.add_source_file_at_path(&path).unwrap(), file);

    file.class_or_err("A").unwrap().set_name("B").unwrap();
    project.save().unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "class B {}\n");

    let error = project.add_source_file_at_path(root.join("missing.ts")).unwrap_err();
    assert_eq!(error.category(), ErrorCategory::Io);
}
