use std::fs;

use hcommander::action::{ActionCatalog, CatalogError};
use hcommander::prelude::*;

const CATALOG: &str = "\
Label,Name,fn,Selection
Center Pivot,center,center_pivot(),xform
Merge Selected,merge,\"merge(nodes, keep=True)\",+
Toggle Wireframe,wire,toggle_wireframe(),
";

#[test]
fn load_and_find() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hcommander.csv");
    fs::write(&path, CATALOG).unwrap();

    let catalog = ActionCatalog::load(&path).unwrap();
    assert_eq!(catalog.len(), 3);

    let names = |selected: &[&str]| -> Vec<String> {
        catalog.find(selected).into_iter().map(|a| a.name.clone()).collect()
    };
    assert_eq!(names(&["xform"]), ["center", "merge", "wire"]);
    assert_eq!(names(&["box"]), ["merge", "wire"]);
    assert_eq!(names(&[]), ["wire"]);
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ActionCatalog::load(dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, CatalogError::Io(_)));
}

#[test]
fn failed_reload_keeps_previous_actions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hcommander.csv");
    fs::write(&path, CATALOG).unwrap();
    let mut catalog = ActionCatalog::load(&path).unwrap();

    fs::write(&path, "Label,Name\nBroken,broken\n").unwrap();
    let err = catalog.reload(&path).unwrap_err();
    assert_eq!(err.to_string(), "catalog has no `fn` column");
    assert_eq!(catalog.len(), 3);

    fs::write(&path, "Label,Name,fn,Selection\nHome,home,home(),\n").unwrap();
    catalog.reload(&path).unwrap();
    assert_eq!(catalog.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(), ["home"]);
}

#[test]
fn actions_match_by_label_or_name() {
    let catalog = ActionCatalog::parse(CATALOG).unwrap();
    let index = CandidateIndex::build(
        catalog
            .iter()
            .map(|a| Arc::new(Candidate::from(a.clone())) as Arc<dyn PaletteItem>),
    );
    let engine = PaletteEngine::builder().query("wire").build();
    let ranked = engine.run(&index, &RankBuilder::default());
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].item.id(), "wire");
    assert_eq!(ranked[0].which_match, 1);

    let engine = PaletteEngine::builder().query("mgs").build();
    let ranked = engine.run(&index, &RankBuilder::default());
    assert_eq!(ranked[0].item.id(), "merge");
    assert_eq!(ranked[0].which_match, 0);
}

#[test]
fn keymap_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hotkeys.csv");
    fs::write(
        &path,
        "Key Name,Selection,OBJECT,SOP\n\
         h.W,xform,,fn:wire_selected()\n\
         h.W,,op:geo,op:attribwrangle\n",
    )
    .unwrap();

    let keymap = KeyMap::load(&path).unwrap();
    assert_eq!(
        keymap.lookup("Sop", "h.W", &["xform"]),
        Some(&KeyAction::Invoke("wire_selected()".into()))
    );
    assert_eq!(
        keymap.lookup("Sop", "h.W", &["box"]),
        Some(&KeyAction::CreateNode("attribwrangle".into()))
    );
    assert_eq!(keymap.lookup("Object", "h.W", &["xform"]), Some(&KeyAction::CreateNode("geo".into())));
}
